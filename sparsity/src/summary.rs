//! Shape statistics of a pattern

use sparsity_core::SparsityStructure;

/// Summary of a compressed pattern's shape
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternSummary {
    pub n_rows: usize,
    pub n_cols: usize,
    pub nnz: usize,
    pub max_entries_per_row: usize,
    pub bandwidth: usize,
    pub empty_rows: usize,
    pub diagonal_first: bool,
    /// Stored entries over `n_rows * n_cols`, zero for empty patterns
    pub density: f64,
}

impl PatternSummary {
    /// Collect statistics from any compressed structure
    pub fn from_structure<S: SparsityStructure + ?Sized>(pattern: &S) -> Self {
        let n_rows = pattern.n_rows();
        let n_cols = pattern.n_cols();
        let nnz = pattern.n_nonzero_elements();
        let cells = n_rows as f64 * n_cols as f64;

        Self {
            n_rows,
            n_cols,
            nnz,
            max_entries_per_row: pattern.max_entries_per_row(),
            bandwidth: pattern.bandwidth(),
            empty_rows: (0..n_rows).filter(|&row| pattern.row_length(row) == 0).count(),
            diagonal_first: pattern.stores_diagonal_first(),
            density: if cells > 0.0 { nnz as f64 / cells } else { 0.0 },
        }
    }

    /// Render as pretty-printed JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for PatternSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "rows:                {}", self.n_rows)?;
        writeln!(f, "columns:             {}", self.n_cols)?;
        writeln!(f, "nonzeros:            {}", self.nnz)?;
        writeln!(f, "max entries per row: {}", self.max_entries_per_row)?;
        writeln!(f, "bandwidth:           {}", self.bandwidth)?;
        writeln!(f, "empty rows:          {}", self.empty_rows)?;
        writeln!(f, "diagonal first:      {}", self.diagonal_first)?;
        write!(f, "density:             {:.6}", self.density)
    }
}

//! Compressed, immutable sparsity pattern
//!
//! Row `r` occupies `column_indices[row_start[r]..row_start[r + 1]]`. Rows
//! are sorted ascending, except that under the diagonal policy the diagonal
//! entry leads its row. The linear position of an entry in
//! `column_indices` is its nonzero index.

use alloc::vec;
use alloc::vec::Vec;

use crate::validation::validate_compressed_layout;
use crate::{PatternBuilder, PatternConfig, Result, SparsityStructure};

/// Compressed sparsity pattern
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPattern"))]
pub struct SparsityPattern {
    n_rows: usize,
    n_cols: usize,
    row_start: Vec<usize>,
    column_indices: Vec<u32>,
    diagonal_first: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    max_entries_per_row: usize,
}

impl SparsityPattern {
    /// Assemble a pattern from parts produced by the builder
    pub(crate) fn from_compressed_parts(
        n_rows: usize,
        n_cols: usize,
        row_start: Vec<usize>,
        column_indices: Vec<u32>,
        diagonal_first: bool,
        max_entries_per_row: usize,
    ) -> Self {
        Self {
            n_rows,
            n_cols,
            row_start,
            column_indices,
            diagonal_first,
            max_entries_per_row,
        }
    }

    /// Create a pattern from raw compressed arrays, validating the layout
    pub fn from_raw_parts(
        n_rows: usize,
        n_cols: usize,
        row_start: Vec<usize>,
        column_indices: Vec<u32>,
        diagonal_first: bool,
    ) -> Result<Self> {
        validate_compressed_layout(n_rows, n_cols, &row_start, &column_indices, diagonal_first)?;
        let max_entries_per_row = row_start
            .windows(2)
            .map(|bounds| bounds[1] - bounds[0])
            .max()
            .unwrap_or(0);

        Ok(Self {
            n_rows,
            n_cols,
            row_start,
            column_indices,
            diagonal_first,
            max_entries_per_row,
        })
    }

    /// Build and compress a pattern from one collection of columns per row
    ///
    /// See [`PatternBuilder::copy_from`]. The result is index-identical to
    /// adding the same entries one by one and compressing.
    pub fn copy_from<I, R>(n_rows: usize, n_cols: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = usize>,
    {
        PatternBuilder::copy_from(n_rows, n_cols, rows)?.compress()
    }

    /// Build and compress from row-wise column collections with explicit configuration
    pub fn copy_from_with_config<I, R>(
        n_rows: usize,
        n_cols: usize,
        rows: I,
        config: PatternConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = usize>,
    {
        PatternBuilder::copy_from_with_config(n_rows, n_cols, rows, config)?.compress()
    }

    /// Row offsets, `n_rows + 1` entries
    pub fn row_start(&self) -> &[usize] {
        &self.row_start
    }

    /// Split into (row offsets, column indices)
    pub fn into_raw_parts(self) -> (Vec<usize>, Vec<u32>) {
        (self.row_start, self.column_indices)
    }

    /// Bytes held by this pattern
    pub fn memory_consumption(&self) -> usize {
        core::mem::size_of::<Self>()
            + self.row_start.capacity() * core::mem::size_of::<usize>()
            + self.column_indices.capacity() * core::mem::size_of::<u32>()
    }
}

impl Default for SparsityPattern {
    fn default() -> Self {
        Self {
            n_rows: 0,
            n_cols: 0,
            row_start: vec![0],
            column_indices: Vec::new(),
            diagonal_first: false,
            max_entries_per_row: 0,
        }
    }
}

impl SparsityStructure for SparsityPattern {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_cols(&self) -> usize {
        self.n_cols
    }

    fn row_offset(&self, row: usize) -> usize {
        self.row_start[row]
    }

    fn column_indices(&self) -> &[u32] {
        &self.column_indices
    }

    fn stores_diagonal_first(&self) -> bool {
        self.diagonal_first
    }

    fn n_nonzero_elements(&self) -> usize {
        self.column_indices.len()
    }

    fn max_entries_per_row(&self) -> usize {
        self.max_entries_per_row
    }
}

/// Unvalidated pattern fields as they arrive from a deserializer
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPattern {
    n_rows: usize,
    n_cols: usize,
    row_start: Vec<usize>,
    column_indices: Vec<u32>,
    diagonal_first: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPattern> for SparsityPattern {
    type Error = crate::PatternError;

    fn try_from(raw: RawPattern) -> Result<Self> {
        Self::from_raw_parts(
            raw.n_rows,
            raw.n_cols,
            raw.row_start,
            raw.column_indices,
            raw.diagonal_first,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal(n: usize) -> SparsityPattern {
        let mut builder = PatternBuilder::new(n, n, 3).unwrap();
        for row in 0..n {
            if row > 0 {
                builder.add(row, row - 1).unwrap();
            }
            if row + 1 < n {
                builder.add(row, row + 1).unwrap();
            }
        }
        builder.compress().unwrap()
    }

    #[test]
    fn test_default_is_empty() {
        let pattern = SparsityPattern::default();
        assert!(pattern.is_empty());
        assert_eq!(pattern.n_nonzero_elements(), 0);
        assert_eq!(pattern.row_start(), &[0]);
        assert_eq!(pattern.bandwidth(), 0);
        assert_eq!(pattern.matrix_position(0), None);
    }

    #[test]
    fn test_tridiagonal_queries() {
        let pattern = tridiagonal(6);
        assert_eq!(pattern.n_nonzero_elements(), 6 * 3 - 2);
        assert_eq!(pattern.bandwidth(), 1);
        assert_eq!(pattern.max_entries_per_row(), 3);
        assert_eq!(pattern.row(0), &[0, 1]);
        assert_eq!(pattern.row(3), &[3, 2, 4]);
        assert_eq!(pattern.index_of(3, 4), Some(pattern.row_start()[3] + 2));
        assert!(!pattern.exists(0, 5));

        let total: usize = (0..pattern.n_rows()).map(|row| pattern.row_length(row)).sum();
        assert_eq!(total, pattern.n_nonzero_elements());
        assert_eq!(pattern.row_start()[pattern.n_rows()], total);
    }

    #[test]
    fn test_index_position_inverse() {
        let pattern = tridiagonal(9);
        for index in 0..pattern.n_nonzero_elements() {
            let (row, col) = pattern.matrix_position(index).unwrap();
            assert_eq!(pattern.index_of(row, col), Some(index));
        }
        for row in 0..pattern.n_rows() {
            for col in 0..pattern.n_cols() {
                if let Some(index) = pattern.index_of(row, col) {
                    assert_eq!(pattern.matrix_position(index), Some((row, col)));
                }
            }
        }
    }

    #[test]
    fn test_from_raw_parts() {
        let pattern = tridiagonal(4);
        let diagonal_first = pattern.stores_diagonal_first();
        let (row_start, columns) = pattern.clone().into_raw_parts();
        let rebuilt =
            SparsityPattern::from_raw_parts(4, 4, row_start, columns, diagonal_first).unwrap();
        assert_eq!(rebuilt, pattern);

        assert!(SparsityPattern::from_raw_parts(2, 2, vec![0, 2, 1], vec![0, 1], false).is_err());
    }

    #[test]
    fn test_memory_consumption_covers_buffers() {
        let small = tridiagonal(4);
        let large = tridiagonal(40);
        assert!(large.memory_consumption() > small.memory_consumption());
        assert!(
            large.memory_consumption()
                >= large.row_start().len() * core::mem::size_of::<usize>()
                    + large.n_nonzero_elements() * core::mem::size_of::<u32>()
        );
    }

    #[test]
    fn test_copy_from_matches_incremental_build() {
        let pattern = tridiagonal(5);
        let rows = (0..5).map(|row| pattern.row(row).iter().rev().map(|&c| c as usize));
        let copied = SparsityPattern::copy_from(5, 5, rows).unwrap();
        assert_eq!(copied.row_start(), pattern.row_start());
        assert_eq!(copied.column_indices(), pattern.column_indices());
    }
}

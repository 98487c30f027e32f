//! Construction options for sparsity patterns

/// Configuration applied when a pattern is created
///
/// The only knob today is the diagonal storage policy. With
/// `diagonal_first` enabled, square patterns reserve a slot for and insert
/// the diagonal entry of every row at construction, and keep it as the first
/// entry of the row after compression. The remaining columns of the row
/// follow in ascending order. Non-square patterns ignore the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternConfig {
    /// Store the diagonal entry first in square patterns
    pub diagonal_first: bool,
}

impl PatternConfig {
    /// Create config with the default diagonal policy
    pub const fn new() -> Self {
        Self {
            diagonal_first: true,
        }
    }

    /// Set the diagonal storage policy
    pub const fn with_diagonal_first(mut self, diagonal_first: bool) -> Self {
        self.diagonal_first = diagonal_first;
        self
    }

    /// Whether a pattern of the given shape stores its diagonal first
    pub const fn applies_to(&self, n_rows: usize, n_cols: usize) -> bool {
        self.diagonal_first && n_rows == n_cols
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self::new()
    }
}

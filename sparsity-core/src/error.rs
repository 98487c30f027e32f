//! Error types for sparsity pattern operations

/// Errors that can occur while building, querying or decoding a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// Row index outside the declared number of rows
    RowOutOfRange { row: usize, n_rows: usize },
    /// Column index outside the declared number of columns
    ColumnOutOfRange { col: usize, n_cols: usize },
    /// No free slot left in the row's reservation
    CapacityExceeded { row: usize, capacity: usize },
    /// Operation requires a square pattern
    NotSquare { n_rows: usize, n_cols: usize },
    /// Supplied data does not match the declared dimensions
    DimensionMismatch { expected: usize, found: usize },
    /// A column appears twice in one row during compression
    DuplicateEntry { row: usize, col: usize },
    /// Dimensions do not fit the 32-bit column index storage or cannot be allocated
    DimensionTooLarge,
    /// Truncated or inconsistent binary image
    Malformed(&'static str),
    /// Binary image written by a newer format version
    UnsupportedVersion(u8),
}

/// Coarse classification of [`PatternError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Row, column or linear index outside the pattern
    Range,
    /// Row reservation exhausted
    Capacity,
    /// Operation not valid for the pattern's shape or state
    State,
    /// Serialized data could not be trusted
    Data,
}

impl PatternError {
    /// Classify this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            PatternError::RowOutOfRange { .. } | PatternError::ColumnOutOfRange { .. } => {
                ErrorCategory::Range
            }
            PatternError::CapacityExceeded { .. } => ErrorCategory::Capacity,
            PatternError::NotSquare { .. }
            | PatternError::DimensionMismatch { .. }
            | PatternError::DuplicateEntry { .. }
            | PatternError::DimensionTooLarge => ErrorCategory::State,
            PatternError::Malformed(_) | PatternError::UnsupportedVersion(_) => {
                ErrorCategory::Data
            }
        }
    }
}

impl core::fmt::Display for PatternError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PatternError::RowOutOfRange { row, n_rows } => {
                write!(f, "Row {row} out of range for pattern with {n_rows} rows")
            }
            PatternError::ColumnOutOfRange { col, n_cols } => {
                write!(f, "Column {col} out of range for pattern with {n_cols} columns")
            }
            PatternError::CapacityExceeded { row, capacity } => {
                write!(f, "Row {row} is full ({capacity} entries reserved)")
            }
            PatternError::NotSquare { n_rows, n_cols } => {
                write!(f, "Pattern must be square, got {n_rows}x{n_cols}")
            }
            PatternError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}")
            }
            PatternError::DuplicateEntry { row, col } => {
                write!(f, "Duplicate entry ({row}, {col})")
            }
            PatternError::DimensionTooLarge => {
                write!(f, "Dimensions exceed 32-bit index range or available memory")
            }
            PatternError::Malformed(reason) => write!(f, "Malformed pattern data: {reason}"),
            PatternError::UnsupportedVersion(version) => {
                write!(f, "Unsupported format version {version}")
            }
        }
    }
}

impl core::error::Error for PatternError {}

/// Result type for sparsity pattern operations
pub type Result<T> = core::result::Result<T, PatternError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            PatternError::RowOutOfRange { row: 3, n_rows: 2 }.category(),
            ErrorCategory::Range
        );
        assert_eq!(
            PatternError::CapacityExceeded { row: 0, capacity: 1 }.category(),
            ErrorCategory::Capacity
        );
        assert_eq!(
            PatternError::NotSquare { n_rows: 2, n_cols: 3 }.category(),
            ErrorCategory::State
        );
        assert_eq!(
            PatternError::Malformed("truncated").category(),
            ErrorCategory::Data
        );
    }

    #[test]
    fn test_error_display() {
        let err = PatternError::CapacityExceeded { row: 4, capacity: 5 };
        assert_eq!(err.to_string(), "Row 4 is full (5 entries reserved)");
        assert_eq!(
            PatternError::Malformed("row offsets not monotone").to_string(),
            "Malformed pattern data: row offsets not monotone"
        );
    }
}

//! Structural validation of compressed row layouts
//!
//! Used when a layout arrives from outside the builder: decoded block
//! images, memory-mapped files and raw-parts constructors.

use crate::{PatternError, Result};

/// Integer types usable as row offsets
pub trait RowOffset: Copy {
    /// Convert to a native offset, `None` if it does not fit
    fn to_offset(self) -> Option<usize>;
}

impl RowOffset for usize {
    fn to_offset(self) -> Option<usize> {
        Some(self)
    }
}

impl RowOffset for u64 {
    fn to_offset(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

/// Validate a compressed row layout
///
/// Checks offset count and monotonicity, that the final offset covers the
/// whole column buffer, column ranges, strict ordering within each row and,
/// with `diagonal_first`, that every row leads with its diagonal entry.
pub fn validate_compressed_layout<R: RowOffset>(
    n_rows: usize,
    n_cols: usize,
    row_start: &[R],
    columns: &[u32],
    diagonal_first: bool,
) -> Result<()> {
    if n_cols > u32::MAX as usize {
        return Err(PatternError::DimensionTooLarge);
    }
    if row_start.len() != n_rows + 1 {
        return Err(PatternError::Malformed("row offset count does not match row count"));
    }
    if diagonal_first && n_rows != n_cols {
        return Err(PatternError::Malformed("diagonal flag on non-square pattern"));
    }
    if row_start[0].to_offset() != Some(0) {
        return Err(PatternError::Malformed("first row offset is not zero"));
    }
    if row_start[n_rows].to_offset() != Some(columns.len()) {
        return Err(PatternError::Malformed("last row offset does not match entry count"));
    }

    for row in 0..n_rows {
        let start = row_start[row]
            .to_offset()
            .ok_or(PatternError::Malformed("row offset overflows"))?;
        let end = row_start[row + 1]
            .to_offset()
            .ok_or(PatternError::Malformed("row offset overflows"))?;
        if end < start || end > columns.len() {
            return Err(PatternError::Malformed("row offsets not monotone"));
        }

        let entries = &columns[start..end];
        if entries.iter().any(|&col| col as usize >= n_cols) {
            return Err(PatternError::Malformed("column index out of range"));
        }

        let sorted = if diagonal_first {
            match entries.split_first() {
                Some((&first, rest)) if first as usize == row => {
                    if rest.binary_search(&first).is_ok() {
                        return Err(PatternError::Malformed("diagonal entry stored twice"));
                    }
                    rest
                }
                _ => return Err(PatternError::Malformed("row does not start with its diagonal")),
            }
        } else {
            entries
        };

        if sorted.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(PatternError::Malformed("columns not strictly increasing"));
        }
    }

    Ok(())
}

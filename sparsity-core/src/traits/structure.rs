//! Structural queries over compressed row layouts
//!
//! Implemented by the owned [`SparsityPattern`](crate::SparsityPattern) and by
//! zero-copy views over serialized images. Everything beyond the five
//! required accessors is derived from the row offsets and column buffer.

use crate::{PatternError, Result};

/// Read access to a compressed sparsity pattern
///
/// Entries are numbered `0..n_nonzero_elements()` in row order and, within a
/// row, in stored order. [`index_of`](Self::index_of) and
/// [`matrix_position`](Self::matrix_position) convert between that linear
/// index and a (row, column) position.
pub trait SparsityStructure {
    /// Number of rows
    fn n_rows(&self) -> usize;

    /// Number of columns
    fn n_cols(&self) -> usize;

    /// Offset of the first entry of `row` in the column buffer
    ///
    /// `row_offset(n_rows())` is the total number of entries.
    fn row_offset(&self, row: usize) -> usize;

    /// The flat column buffer of all rows
    fn column_indices(&self) -> &[u32];

    /// Whether each row stores its diagonal entry first
    fn stores_diagonal_first(&self) -> bool;

    /// Number of stored entries
    fn n_nonzero_elements(&self) -> usize {
        self.row_offset(self.n_rows())
    }

    /// Whether both dimensions are zero
    fn is_empty(&self) -> bool {
        self.n_rows() == 0 && self.n_cols() == 0
    }

    /// Column indices of one row in stored order
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows()`. See [`try_row`](Self::try_row).
    fn row(&self, row: usize) -> &[u32] {
        &self.column_indices()[self.row_offset(row)..self.row_offset(row + 1)]
    }

    /// Column indices of one row, or `RowOutOfRange`
    fn try_row(&self, row: usize) -> Result<&[u32]> {
        if row >= self.n_rows() {
            return Err(PatternError::RowOutOfRange {
                row,
                n_rows: self.n_rows(),
            });
        }
        Ok(self.row(row))
    }

    /// Number of entries in a row
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows()`.
    fn row_length(&self, row: usize) -> usize {
        self.row_offset(row + 1) - self.row_offset(row)
    }

    /// Length of the longest row
    fn max_entries_per_row(&self) -> usize {
        (0..self.n_rows())
            .map(|row| self.row_length(row))
            .max()
            .unwrap_or(0)
    }

    /// Column of the `k`-th stored entry of `row`
    fn column_number(&self, row: usize, k: usize) -> Option<usize> {
        self.try_row(row).ok()?.get(k).map(|&col| col as usize)
    }

    /// Linear index of the entry at (row, col), `None` if not stored
    ///
    /// Binary search within the row. With the diagonal-first policy the
    /// diagonal is answered directly and skipped by the search.
    fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.n_rows() || col >= self.n_cols() {
            return None;
        }

        let start = self.row_offset(row);
        let entries = self.row(row);
        let skip = if self.stores_diagonal_first() && !entries.is_empty() {
            if row == col {
                return Some(start);
            }
            1
        } else {
            0
        };

        entries[skip..]
            .binary_search(&(col as u32))
            .ok()
            .map(|k| start + skip + k)
    }

    /// Whether an entry is stored at (row, col)
    fn exists(&self, row: usize, col: usize) -> bool {
        self.index_of(row, col).is_some()
    }

    /// Position (row, col) of the entry with linear index `index`
    ///
    /// Locates the row by bisection over the row offsets, so empty rows are
    /// skipped correctly. `None` if `index >= n_nonzero_elements()`.
    fn matrix_position(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.n_nonzero_elements() {
            return None;
        }

        // Upper bound: first row whose offset exceeds the index
        let mut low = 0;
        let mut high = self.n_rows();
        while low < high {
            let mid = low + (high - low) / 2;
            if self.row_offset(mid) <= index {
                low = mid + 1;
            } else {
                high = mid;
            }
        }

        let col = *self.column_indices().get(index)?;
        Some((low - 1, col as usize))
    }

    /// Largest distance |row - col| over all stored entries
    fn bandwidth(&self) -> usize {
        (0..self.n_rows())
            .flat_map(|row| self.row(row).iter().map(move |&col| row.abs_diff(col as usize)))
            .max()
            .unwrap_or(0)
    }

    /// Iterate over (row, col) of every entry in linear index order
    fn iter(&self) -> Entries<'_, Self> {
        Entries {
            structure: self,
            row: 0,
            index: 0,
        }
    }
}

/// Iterator over the (row, col) positions of a structure
pub struct Entries<'a, S: SparsityStructure + ?Sized> {
    structure: &'a S,
    row: usize,
    index: usize,
}

impl<S: SparsityStructure + ?Sized> Iterator for Entries<'_, S> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let columns = self.structure.column_indices();
        if self.index >= self.structure.n_nonzero_elements() {
            return None;
        }
        while self.structure.row_offset(self.row + 1) <= self.index {
            self.row += 1;
        }

        let position = (self.row, columns[self.index] as usize);
        self.index += 1;
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.structure.n_nonzero_elements() - self.index;
        (remaining, Some(remaining))
    }
}

impl<S: SparsityStructure + ?Sized> ExactSizeIterator for Entries<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Minimal borrowed layout for exercising the provided methods
    struct Layout<'a> {
        n_rows: usize,
        n_cols: usize,
        row_start: &'a [usize],
        columns: &'a [u32],
        diagonal_first: bool,
    }

    impl SparsityStructure for Layout<'_> {
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
            self.columns
        }
        fn stores_diagonal_first(&self) -> bool {
            self.diagonal_first
        }
    }

    #[test]
    fn test_lookup_with_empty_rows() {
        // Row 1 is empty
        let layout = Layout {
            n_rows: 3,
            n_cols: 4,
            row_start: &[0, 2, 2, 5],
            columns: &[1, 3, 0, 2, 3],
            diagonal_first: false,
        };

        assert_eq!(layout.n_nonzero_elements(), 5);
        assert_eq!(layout.row_length(1), 0);
        assert_eq!(layout.index_of(2, 2), Some(3));
        assert_eq!(layout.index_of(1, 1), None);
        assert_eq!(layout.index_of(0, 4), None);
        assert_eq!(layout.matrix_position(2), Some((2, 0)));
        assert_eq!(layout.matrix_position(5), None);
        assert_eq!(layout.bandwidth(), 3);
        assert_eq!(layout.max_entries_per_row(), 3);
        assert_eq!(layout.column_number(2, 1), Some(2));
        assert_eq!(
            layout.try_row(3),
            Err(PatternError::RowOutOfRange { row: 3, n_rows: 3 })
        );

        let entries: Vec<_> = layout.iter().collect();
        assert_eq!(entries, vec![(0, 1), (0, 3), (2, 0), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_lookup_diagonal_first() {
        let layout = Layout {
            n_rows: 2,
            n_cols: 2,
            row_start: &[0, 2, 3],
            columns: &[0, 1, 1],
            diagonal_first: true,
        };

        assert_eq!(layout.index_of(0, 0), Some(0));
        assert_eq!(layout.index_of(0, 1), Some(1));
        assert_eq!(layout.index_of(1, 1), Some(2));
        assert_eq!(layout.index_of(1, 0), None);
        for index in 0..layout.n_nonzero_elements() {
            let (row, col) = layout.matrix_position(index).unwrap();
            assert_eq!(layout.index_of(row, col), Some(index));
        }
    }
}

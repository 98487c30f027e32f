//! Uncompressed sparsity pattern under construction
//!
//! Every row owns a fixed reservation of slots in one flat buffer. Unused
//! slots hold [`INVALID_ENTRY`]; `add` fills the first free slot of a row,
//! so the occupied slots of a row are always a prefix of its reservation.
//! [`PatternBuilder::compress`] consumes the builder and produces the
//! immutable [`SparsityPattern`].
//!
//! ```compile_fail
//! use sparsity_core::PatternBuilder;
//!
//! let mut builder = PatternBuilder::new(4, 4, 3).unwrap();
//! let pattern = builder.compress().unwrap();
//! builder.add(0, 1).unwrap(); // builder was moved into compress()
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::format::constants::INVALID_ENTRY;
use crate::{PatternConfig, PatternError, Result, SparsityPattern, SparsityStructure};

/// Mutable, uncompressed sparsity pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBuilder {
    n_rows: usize,
    n_cols: usize,
    /// Reservation boundaries, `n_rows + 1` entries
    row_start: Vec<usize>,
    /// Reserved slots of all rows, [`INVALID_ENTRY`] when unused
    slots: Vec<u32>,
    diagonal_first: bool,
}

impl PatternBuilder {
    /// Create a pattern reserving `max_entries_per_row` slots in every row
    pub fn new(n_rows: usize, n_cols: usize, max_entries_per_row: usize) -> Result<Self> {
        Self::new_with_config(n_rows, n_cols, max_entries_per_row, PatternConfig::default())
    }

    /// Create a uniformly reserved pattern with explicit configuration
    pub fn new_with_config(
        n_rows: usize,
        n_cols: usize,
        max_entries_per_row: usize,
        config: PatternConfig,
    ) -> Result<Self> {
        Self::reserve(
            n_rows,
            n_cols,
            core::iter::repeat(max_entries_per_row).take(n_rows),
            config,
        )
    }

    /// Create a pattern with an individual reservation per row
    pub fn with_row_lengths(n_rows: usize, n_cols: usize, row_lengths: &[usize]) -> Result<Self> {
        Self::with_row_lengths_and_config(n_rows, n_cols, row_lengths, PatternConfig::default())
    }

    /// Create a per-row reserved pattern with explicit configuration
    pub fn with_row_lengths_and_config(
        n_rows: usize,
        n_cols: usize,
        row_lengths: &[usize],
        config: PatternConfig,
    ) -> Result<Self> {
        if row_lengths.len() != n_rows {
            return Err(PatternError::DimensionMismatch {
                expected: n_rows,
                found: row_lengths.len(),
            });
        }
        Self::reserve(n_rows, n_cols, row_lengths.iter().copied(), config)
    }

    /// Start a new pattern from a compressed square one, with room to grow
    ///
    /// Copies every entry of `original` into rows reserving
    /// `max_entries_per_row` slots, then adds the side diagonals
    /// `(r, r - i)` and `(r, r + i)` for `1 <= i <= extra_off_diagonals`
    /// wherever they fall inside the pattern. The diagonal policy of
    /// `original` carries over.
    pub fn extend(
        original: &SparsityPattern,
        max_entries_per_row: usize,
        extra_off_diagonals: usize,
    ) -> Result<Self> {
        let n = original.n_rows();
        if n != original.n_cols() {
            return Err(PatternError::NotSquare {
                n_rows: n,
                n_cols: original.n_cols(),
            });
        }

        let config = PatternConfig::new().with_diagonal_first(original.stores_diagonal_first());
        let mut builder = Self::new_with_config(n, n, max_entries_per_row, config)?;
        for row in 0..n {
            for &col in original.row(row) {
                builder.add(row, col as usize)?;
            }
            for offset in 1..=extra_off_diagonals.min(row) {
                builder.add(row, row - offset)?;
            }
            for offset in 1..=extra_off_diagonals.min(n - row - 1) {
                builder.add(row, row + offset)?;
            }
        }

        tracing::trace!(
            n_rows = n,
            max_entries_per_row,
            extra_off_diagonals,
            "extended sparsity pattern"
        );
        Ok(builder)
    }

    /// Build a pattern from one collection of column indices per row
    ///
    /// The outer sequence gives the rows in order; order and repetition
    /// within a row do not matter. Reservations are sized exactly, so the
    /// result can be compressed directly but has no spare capacity.
    pub fn copy_from<I, R>(n_rows: usize, n_cols: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = usize>,
    {
        Self::copy_from_with_config(n_rows, n_cols, rows, PatternConfig::default())
    }

    /// Build a pattern from row-wise column collections with explicit configuration
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
        check_columns(n_cols)?;
        let diagonal_first = config.applies_to(n_rows, n_cols);
        // Grown as rows arrive; `n_rows` is not trusted until the count matches
        let mut row_start = vec![0];
        let mut slots = Vec::new();

        let mut found = 0;
        for columns in rows {
            let row = found;
            found += 1;
            if row >= n_rows {
                continue;
            }

            let begin = slots.len();
            if diagonal_first {
                slots.push(row as u32);
            }
            for col in columns {
                if col >= n_cols {
                    return Err(PatternError::ColumnOutOfRange { col, n_cols });
                }
                if !(diagonal_first && col == row) {
                    slots.push(col as u32);
                }
            }

            let skip = usize::from(diagonal_first);
            slots[begin + skip..].sort_unstable();
            let unique = dedup_sorted(&mut slots[begin + skip..]);
            slots.truncate(begin + skip + unique);
            row_start.push(slots.len());
        }

        if found != n_rows {
            return Err(PatternError::DimensionMismatch {
                expected: n_rows,
                found,
            });
        }

        Ok(Self {
            n_rows,
            n_cols,
            row_start,
            slots,
            diagonal_first,
        })
    }

    fn reserve<I>(n_rows: usize, n_cols: usize, capacities: I, config: PatternConfig) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        check_columns(n_cols)?;
        let diagonal_first = config.applies_to(n_rows, n_cols);

        let mut row_start = Vec::new();
        row_start
            .try_reserve_exact(n_rows.checked_add(1).ok_or(PatternError::DimensionTooLarge)?)
            .map_err(|_| PatternError::DimensionTooLarge)?;
        row_start.push(0usize);
        let mut total = 0usize;
        for capacity in capacities {
            // A row never holds more than n_cols entries; the diagonal always needs a slot
            let capacity = capacity.min(n_cols);
            let capacity = if diagonal_first {
                capacity.max(1)
            } else {
                capacity
            };
            total = total
                .checked_add(capacity)
                .ok_or(PatternError::DimensionTooLarge)?;
            row_start.push(total);
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(total)
            .map_err(|_| PatternError::DimensionTooLarge)?;
        slots.resize(total, INVALID_ENTRY);
        if diagonal_first {
            for row in 0..n_rows {
                slots[row_start[row]] = row as u32;
            }
        }

        Ok(Self {
            n_rows,
            n_cols,
            row_start,
            slots,
            diagonal_first,
        })
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Whether both dimensions are zero
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 && self.n_cols == 0
    }

    /// Whether the diagonal entry is stored first in every row
    pub fn stores_diagonal_first(&self) -> bool {
        self.diagonal_first
    }

    /// Occupied slots of a row, in insertion order
    fn used(&self, row: usize) -> &[u32] {
        let slots = &self.slots[self.row_start[row]..self.row_start[row + 1]];
        let len = slots
            .iter()
            .position(|&col| col == INVALID_ENTRY)
            .unwrap_or(slots.len());
        &slots[..len]
    }

    /// Number of entries recorded so far
    pub fn n_nonzero_elements(&self) -> usize {
        (0..self.n_rows).map(|row| self.used(row).len()).sum()
    }

    /// Number of entries recorded in a row
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows()`.
    pub fn row_length(&self, row: usize) -> usize {
        self.used(row).len()
    }

    /// Number of slots reserved for a row
    ///
    /// # Panics
    ///
    /// Panics if `row >= n_rows()`.
    pub fn row_capacity(&self, row: usize) -> usize {
        self.row_start[row + 1] - self.row_start[row]
    }

    /// Largest row reservation
    pub fn max_entries_per_row(&self) -> usize {
        (0..self.n_rows)
            .map(|row| self.row_capacity(row))
            .max()
            .unwrap_or(0)
    }

    /// Whether (row, col) has been recorded
    pub fn exists(&self, row: usize, col: usize) -> bool {
        row < self.n_rows && self.used(row).iter().any(|&c| c as usize == col)
    }

    /// Largest distance |row - col| over the recorded entries
    pub fn bandwidth(&self) -> usize {
        (0..self.n_rows)
            .flat_map(|row| self.used(row).iter().map(move |&col| row.abs_diff(col as usize)))
            .max()
            .unwrap_or(0)
    }

    /// Bytes held by the reservation buffers
    pub fn memory_consumption(&self) -> usize {
        core::mem::size_of::<Self>()
            + self.row_start.capacity() * core::mem::size_of::<usize>()
            + self.slots.capacity() * core::mem::size_of::<u32>()
    }

    /// Record the entry (row, col)
    ///
    /// Adding an entry twice is a no-op. Fails if either index is out of
    /// range or the row has no free slot left.
    pub fn add(&mut self, row: usize, col: usize) -> Result<()> {
        if row >= self.n_rows {
            return Err(PatternError::RowOutOfRange {
                row,
                n_rows: self.n_rows,
            });
        }
        if col >= self.n_cols {
            return Err(PatternError::ColumnOutOfRange {
                col,
                n_cols: self.n_cols,
            });
        }

        let target = col as u32;
        let (start, end) = (self.row_start[row], self.row_start[row + 1]);
        for slot in &mut self.slots[start..end] {
            if *slot == target {
                return Ok(());
            }
            if *slot == INVALID_ENTRY {
                *slot = target;
                return Ok(());
            }
        }

        Err(PatternError::CapacityExceeded {
            row,
            capacity: end - start,
        })
    }

    /// Record several columns of one row
    pub fn add_entries<I>(&mut self, row: usize, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        columns.into_iter().try_for_each(|col| self.add(row, col))
    }

    /// Close the recorded entries under transposition
    ///
    /// For every recorded (row, col) also records (col, row), through the
    /// same capacity checks as [`add`](Self::add).
    pub fn symmetrize(&mut self) -> Result<()> {
        if self.n_rows != self.n_cols {
            return Err(PatternError::NotSquare {
                n_rows: self.n_rows,
                n_cols: self.n_cols,
            });
        }

        let mut added = 0usize;
        for row in 0..self.n_rows {
            // Rows other than `row` may grow while this one is scanned
            for k in self.row_start[row]..self.row_start[row + 1] {
                let col = self.slots[k];
                if col == INVALID_ENTRY {
                    break;
                }
                let col = col as usize;
                if col != row && !self.exists(col, row) {
                    self.add(col, row)?;
                    added += 1;
                }
            }
        }

        tracing::trace!(n_rows = self.n_rows, added, "symmetrized sparsity pattern");
        Ok(())
    }

    /// Compact the pattern into its compressed, immutable form
    ///
    /// Sorts every row (after a leading diagonal under the diagonal policy),
    /// drops unused slots and rebuilds the row offsets. The builder is
    /// consumed, so no entry can be added afterwards.
    pub fn compress(self) -> Result<SparsityPattern> {
        let nnz = self.n_nonzero_elements();
        let mut row_start = Vec::with_capacity(self.n_rows + 1);
        let mut columns = Vec::with_capacity(nnz);
        let mut max_entries_per_row = 0;
        row_start.push(0);

        let skip = usize::from(self.diagonal_first);
        for row in 0..self.n_rows {
            let begin = columns.len();
            columns.extend_from_slice(self.used(row));

            let tail_start = (begin + skip).min(columns.len());
            let tail = &mut columns[tail_start..];
            tail.sort_unstable();
            if let Some(pair) = tail.windows(2).find(|pair| pair[0] == pair[1]) {
                return Err(PatternError::DuplicateEntry {
                    row,
                    col: pair[0] as usize,
                });
            }

            max_entries_per_row = max_entries_per_row.max(columns.len() - begin);
            row_start.push(columns.len());
        }

        let pattern = SparsityPattern::from_compressed_parts(
            self.n_rows,
            self.n_cols,
            row_start,
            columns,
            self.diagonal_first,
            max_entries_per_row,
        );

        tracing::debug!(
            n_rows = pattern.n_rows(),
            n_cols = pattern.n_cols(),
            nnz = pattern.n_nonzero_elements(),
            max_entries_per_row,
            "compressed sparsity pattern"
        );
        Ok(pattern)
    }
}

impl Default for PatternBuilder {
    fn default() -> Self {
        Self {
            n_rows: 0,
            n_cols: 0,
            row_start: vec![0],
            slots: Vec::new(),
            diagonal_first: false,
        }
    }
}

fn check_columns(n_cols: usize) -> Result<()> {
    if n_cols > u32::MAX as usize {
        return Err(PatternError::DimensionTooLarge);
    }
    Ok(())
}

/// Move the distinct values of a sorted slice to its front, returning their count
fn dedup_sorted(values: &mut [u32]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let mut unique = 1;
    for k in 1..values.len() {
        if values[k] != values[unique - 1] {
            values[unique] = values[k];
            unique += 1;
        }
    }
    unique
}

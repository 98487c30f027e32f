//! Pattern block image header
//!
//! Fixed 64-byte little-endian header preceding the row offsets and column
//! indices of a serialized pattern.

use super::constants::{flags, ALIGNMENT_BOUNDARY, INDEX_WIDTH, ROW_START_WIDTH};
use crate::{PatternError, Result};

/// Header of a serialized sparsity pattern
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternHeader {
    /// Magic bytes: "SPAT"
    pub magic: [u8; 4],
    /// Format version
    pub version: u8,
    /// Structure flags (diagonal first, sorted indices)
    pub structure_flags: u8,
    /// Bytes per stored column index
    pub index_width: u8,
    /// Reserved, always zero
    pub reserved_0: u8,
    /// Number of rows
    pub n_rows: u64,
    /// Number of columns
    pub n_cols: u64,
    /// Number of stored entries
    pub nnz: u64,
    /// Length of the longest row
    pub max_entries_per_row: u64,
    /// Offset of the row offset array from the image start
    pub row_start_offset: u64,
    /// Offset of the column index array from the image start
    pub column_indices_offset: u64,
    /// Reserved space for future extensions
    pub reserved: [u8; 8],
}

impl PatternHeader {
    /// Magic bytes for pattern images
    pub const MAGIC: [u8; 4] = *b"SPAT";

    /// Current format version
    pub const VERSION: u8 = 1;

    /// Size of the header in bytes
    pub const SIZE: usize = 64;

    /// Create a header with every size field zeroed
    pub const fn new() -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            structure_flags: flags::SORTED_INDICES,
            index_width: INDEX_WIDTH,
            reserved_0: 0,
            n_rows: 0,
            n_cols: 0,
            nnz: 0,
            max_entries_per_row: 0,
            row_start_offset: 0,
            column_indices_offset: 0,
            reserved: [0; 8],
        }
    }

    /// Create a header describing a pattern of the given shape
    ///
    /// Array offsets are laid out directly after the header, each aligned to
    /// [`ALIGNMENT_BOUNDARY`].
    pub fn describe(
        n_rows: usize,
        n_cols: usize,
        nnz: usize,
        max_entries_per_row: usize,
        diagonal_first: bool,
    ) -> Self {
        let row_start_offset = align_up(Self::SIZE);
        let column_indices_offset = align_up(row_start_offset + (n_rows + 1) * ROW_START_WIDTH);

        let mut header = Self::new();
        if diagonal_first {
            header.structure_flags |= flags::DIAGONAL_FIRST;
        }
        header.n_rows = n_rows as u64;
        header.n_cols = n_cols as u64;
        header.nnz = nnz as u64;
        header.max_entries_per_row = max_entries_per_row as u64;
        header.row_start_offset = row_start_offset as u64;
        header.column_indices_offset = column_indices_offset as u64;
        header
    }

    /// Whether the diagonal entry is stored first in every row
    pub fn diagonal_first(&self) -> bool {
        self.structure_flags & flags::DIAGONAL_FIRST != 0
    }

    /// Size of the row offset array in bytes
    pub fn row_start_size(&self) -> Result<usize> {
        let count = usize::try_from(self.n_rows)
            .ok()
            .and_then(|rows| rows.checked_add(1))
            .ok_or(PatternError::Malformed("row count overflows"))?;
        count
            .checked_mul(ROW_START_WIDTH)
            .ok_or(PatternError::Malformed("row offset array size overflows"))
    }

    /// Size of the column index array in bytes
    pub fn column_indices_size(&self) -> Result<usize> {
        usize::try_from(self.nnz)
            .ok()
            .and_then(|nnz| nnz.checked_mul(self.index_width as usize))
            .ok_or(PatternError::Malformed("column index array size overflows"))
    }

    /// Total image size described by this header
    pub fn image_size(&self) -> Result<usize> {
        let column_start = usize::try_from(self.column_indices_offset)
            .map_err(|_| PatternError::Malformed("column index offset overflows"))?;
        column_start
            .checked_add(self.column_indices_size()?)
            .ok_or(PatternError::Malformed("image size overflows"))
    }

    /// Parse header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(PatternError::Malformed("truncated header"));
        }

        if bytes[0..4] != Self::MAGIC {
            return Err(PatternError::Malformed("bad magic bytes"));
        }

        let version = bytes[4];
        if version > Self::VERSION {
            return Err(PatternError::UnsupportedVersion(version));
        }

        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&bytes[56..64]);

        let header = Self {
            magic: Self::MAGIC,
            version,
            structure_flags: bytes[5],
            index_width: bytes[6],
            reserved_0: bytes[7],
            n_rows: read_u64(bytes, 8),
            n_cols: read_u64(bytes, 16),
            nnz: read_u64(bytes, 24),
            max_entries_per_row: read_u64(bytes, 32),
            row_start_offset: read_u64(bytes, 40),
            column_indices_offset: read_u64(bytes, 48),
            reserved,
        };
        header.validate()?;
        Ok(header)
    }

    /// Convert header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes[5] = self.structure_flags;
        bytes[6] = self.index_width;
        bytes[7] = self.reserved_0;
        bytes[8..16].copy_from_slice(&self.n_rows.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.n_cols.to_le_bytes());
        bytes[24..32].copy_from_slice(&self.nnz.to_le_bytes());
        bytes[32..40].copy_from_slice(&self.max_entries_per_row.to_le_bytes());
        bytes[40..48].copy_from_slice(&self.row_start_offset.to_le_bytes());
        bytes[48..56].copy_from_slice(&self.column_indices_offset.to_le_bytes());
        bytes[56..64].copy_from_slice(&self.reserved);
        bytes
    }

    /// Check the header fields for internal consistency
    fn validate(&self) -> Result<()> {
        if self.index_width != INDEX_WIDTH {
            return Err(PatternError::Malformed("unsupported column index width"));
        }
        if self.structure_flags & !flags::KNOWN != 0 {
            return Err(PatternError::Malformed("unknown structure flags"));
        }
        if self.n_cols > u32::MAX as u64 {
            return Err(PatternError::DimensionTooLarge);
        }
        if self.diagonal_first() && self.n_rows != self.n_cols {
            return Err(PatternError::Malformed("diagonal flag on non-square pattern"));
        }
        if self.max_entries_per_row > self.n_cols || self.max_entries_per_row > self.nnz {
            return Err(PatternError::Malformed("row length exceeds pattern size"));
        }

        let row_start_offset = usize::try_from(self.row_start_offset)
            .map_err(|_| PatternError::Malformed("row offset array offset overflows"))?;
        if row_start_offset < Self::SIZE || row_start_offset % ALIGNMENT_BOUNDARY != 0 {
            return Err(PatternError::Malformed("misplaced row offset array"));
        }
        let row_end = row_start_offset
            .checked_add(self.row_start_size()?)
            .ok_or(PatternError::Malformed("row offset array overflows"))?;
        let column_start = usize::try_from(self.column_indices_offset)
            .map_err(|_| PatternError::Malformed("column index offset overflows"))?;
        if column_start < row_end || column_start % ALIGNMENT_BOUNDARY != 0 {
            return Err(PatternError::Malformed("misplaced column index array"));
        }
        self.image_size().map(|_| ())
    }
}

impl Default for PatternHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Round an offset up to the next [`ALIGNMENT_BOUNDARY`]
const fn align_up(offset: usize) -> usize {
    (offset + ALIGNMENT_BOUNDARY - 1) & !(ALIGNMENT_BOUNDARY - 1)
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = PatternHeader::describe(3, 3, 7, 3, true);
        assert_eq!(header.row_start_offset, 64);
        assert_eq!(header.column_indices_offset, 64 + 4 * 8);
        assert_eq!(header.image_size(), Ok(96 + 7 * 4));
        assert!(header.diagonal_first());

        let narrow = PatternHeader::describe(2, 2, 2, 1, false);
        assert_eq!(narrow.column_indices_offset, 64 + 3 * 8);
        assert_eq!(align_up(65), 72);
        assert_eq!(align_up(72), 72);
    }

    #[test]
    fn test_header_bytes() {
        let header = PatternHeader::describe(10, 12, 30, 4, false);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"SPAT");
        assert_eq!(PatternHeader::from_bytes(&bytes), Ok(header));
    }

    #[test]
    fn test_header_rejects_bad_input() {
        let header = PatternHeader::describe(2, 2, 2, 1, true);
        let bytes = header.to_bytes();

        assert_eq!(
            PatternHeader::from_bytes(&bytes[..40]),
            Err(PatternError::Malformed("truncated header"))
        );

        let mut bad_magic = bytes;
        bad_magic[0] = b'X';
        assert_eq!(
            PatternHeader::from_bytes(&bad_magic),
            Err(PatternError::Malformed("bad magic bytes"))
        );

        let mut newer = bytes;
        newer[4] = PatternHeader::VERSION + 1;
        assert_eq!(
            PatternHeader::from_bytes(&newer),
            Err(PatternError::UnsupportedVersion(PatternHeader::VERSION + 1))
        );

        let mut wide = bytes;
        wide[6] = 8;
        assert!(PatternHeader::from_bytes(&wide).is_err());

        let mut shifted = header;
        shifted.column_indices_offset = 64;
        assert_eq!(
            PatternHeader::from_bytes(&shifted.to_bytes()),
            Err(PatternError::Malformed("misplaced column index array"))
        );
    }

    #[test]
    fn test_header_rejects_diagonal_flag_on_rectangle() {
        let mut header = PatternHeader::describe(2, 3, 2, 1, false);
        header.structure_flags |= flags::DIAGONAL_FIRST;
        assert!(PatternHeader::from_bytes(&header.to_bytes()).is_err());
    }
}

//! Format constants and magic bytes for the pattern block image

/// Alignment boundary for the arrays following the header
pub const ALIGNMENT_BOUNDARY: usize = 8;

/// Width in bytes of one stored column index
pub const INDEX_WIDTH: u8 = 4;

/// Width in bytes of one stored row offset
pub const ROW_START_WIDTH: usize = 8;

/// Slot value marking an unused reservation in an uncompressed row
pub const INVALID_ENTRY: u32 = u32::MAX;

/// Structure flags for pattern properties
pub mod flags {
    /// Square pattern storing its diagonal entry first in every row
    pub const DIAGONAL_FIRST: u8 = 1 << 0;
    /// Column indices sorted within each row
    pub const SORTED_INDICES: u8 = 1 << 3;

    /// Every flag this format version understands
    pub const KNOWN: u8 = DIAGONAL_FIRST | SORTED_INDICES;
}

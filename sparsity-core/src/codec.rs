//! Block image encoding and decoding
//!
//! Image layout: the 64-byte [`PatternHeader`], the row offsets as
//! little-endian u64 at `row_start_offset`, then the column indices as
//! little-endian u32 at `column_indices_offset`. Both array offsets are
//! 8-byte aligned; gaps are zero padding.

use alloc::vec::Vec;

use crate::format::constants::{ALIGNMENT_BOUNDARY, ROW_START_WIDTH};
use crate::validation::validate_array_bounds;
use crate::{PatternError, PatternHeader, Result, SparsityPattern, SparsityStructure};

/// Borrowed sections of an encoded pattern image
#[derive(Debug, Clone, Copy)]
pub struct ImageSections<'a> {
    /// Parsed and validated header
    pub header: PatternHeader,
    /// Row offset bytes, `(n_rows + 1) * 8` long
    pub row_start: &'a [u8],
    /// Column index bytes, `nnz * 4` long
    pub column_indices: &'a [u8],
}

/// Split an encoded image into header and array sections
///
/// Only the header and the section bounds are checked here; the array
/// contents are validated by the caller.
pub fn split_image(bytes: &[u8]) -> Result<ImageSections<'_>> {
    let header = PatternHeader::from_bytes(bytes)?;
    if bytes.len() < header.image_size()? {
        return Err(PatternError::Malformed("truncated pattern image"));
    }

    // Offsets were range-checked against usize by the header validation
    let row_start_offset = header.row_start_offset as usize;
    let column_indices_offset = header.column_indices_offset as usize;
    let row_start = &bytes[row_start_offset..row_start_offset + header.row_start_size()?];
    let column_indices =
        &bytes[column_indices_offset..column_indices_offset + header.column_indices_size()?];

    Ok(ImageSections {
        header,
        row_start,
        column_indices,
    })
}

impl SparsityPattern {
    /// Header describing this pattern's block image
    pub fn header(&self) -> PatternHeader {
        PatternHeader::describe(
            self.n_rows(),
            self.n_cols(),
            self.n_nonzero_elements(),
            self.max_entries_per_row(),
            self.stores_diagonal_first(),
        )
    }

    /// Size in bytes of this pattern's block image
    pub fn encoded_len(&self) -> usize {
        self.header().column_indices_offset as usize
            + self.n_nonzero_elements() * core::mem::size_of::<u32>()
    }

    /// Encode into a freshly allocated block image
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut bytes);
        bytes
    }

    /// Append the block image to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let base = out.len();
        let header = self.header();
        out.extend_from_slice(&header.to_bytes());

        pad_to(out, base, header.row_start_offset as usize);
        for &offset in self.row_start() {
            out.extend_from_slice(&(offset as u64).to_le_bytes());
        }

        pad_to(out, base, header.column_indices_offset as usize);
        for &col in self.column_indices() {
            out.extend_from_slice(&col.to_le_bytes());
        }
    }

    /// Decode and validate a block image
    ///
    /// Trailing bytes after the image are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let sections = split_image(bytes)?;
        let header = sections.header;

        let row_start = decode_row_start(sections.row_start)?;
        let column_indices = decode_column_indices(sections.column_indices)?;

        let n_rows = usize::try_from(header.n_rows).map_err(|_| PatternError::DimensionTooLarge)?;
        let n_cols = header.n_cols as usize;
        let pattern = Self::from_raw_parts(
            n_rows,
            n_cols,
            row_start,
            column_indices,
            header.diagonal_first(),
        )?;
        if pattern.max_entries_per_row() as u64 != header.max_entries_per_row {
            return Err(PatternError::Malformed("row length does not match header"));
        }
        Ok(pattern)
    }
}

fn pad_to(out: &mut Vec<u8>, base: usize, offset: usize) {
    debug_assert!(out.len() - base <= offset && offset % ALIGNMENT_BOUNDARY == 0);
    out.resize(base + offset, 0);
}

fn decode_row_start(bytes: &[u8]) -> Result<Vec<usize>> {
    let count = validate_array_bounds::<u64>(bytes.len())?;
    let mut row_start = Vec::with_capacity(count);
    for chunk in bytes.chunks_exact(ROW_START_WIDTH) {
        let mut word = [0u8; ROW_START_WIDTH];
        word.copy_from_slice(chunk);
        let offset = usize::try_from(u64::from_le_bytes(word))
            .map_err(|_| PatternError::Malformed("row offset overflows"))?;
        row_start.push(offset);
    }
    Ok(row_start)
}

fn decode_column_indices(bytes: &[u8]) -> Result<Vec<u32>> {
    let count = validate_array_bounds::<u32>(bytes.len())?;
    let mut columns = Vec::with_capacity(count);
    for chunk in bytes.chunks_exact(core::mem::size_of::<u32>()) {
        let mut word = [0u8; 4];
        word.copy_from_slice(chunk);
        columns.push(u32::from_le_bytes(word));
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PatternBuilder, PatternConfig};
    use alloc::vec;

    fn sample() -> SparsityPattern {
        let mut builder = PatternBuilder::new(4, 4, 3).unwrap();
        builder.add(0, 3).unwrap();
        builder.add(1, 0).unwrap();
        builder.add(3, 1).unwrap();
        builder.add(3, 2).unwrap();
        builder.compress().unwrap()
    }

    #[test]
    fn test_image_layout() {
        let pattern = sample();
        let bytes = pattern.to_bytes();
        assert_eq!(bytes.len(), pattern.encoded_len());
        assert_eq!(&bytes[0..4], b"SPAT");

        // Four rows: five u64 offsets right after the header
        assert_eq!(&bytes[64..72], &0u64.to_le_bytes());
        assert_eq!(&bytes[96..104], &8u64.to_le_bytes());
        // Row 0 is [0, 3]
        assert_eq!(&bytes[104..108], &0u32.to_le_bytes());
        assert_eq!(&bytes[108..112], &3u32.to_le_bytes());
    }

    #[test]
    fn test_decode_restores_pattern() {
        let pattern = sample();
        assert_eq!(SparsityPattern::from_bytes(&pattern.to_bytes()), Ok(pattern));

        let rectangular = SparsityPattern::copy_from_with_config(
            2,
            5,
            [vec![4, 1], vec![]],
            PatternConfig::default(),
        )
        .unwrap();
        let decoded = SparsityPattern::from_bytes(&rectangular.to_bytes()).unwrap();
        assert_eq!(decoded, rectangular);
        assert!(!decoded.stores_diagonal_first());

        let empty = SparsityPattern::default();
        assert_eq!(SparsityPattern::from_bytes(&empty.to_bytes()), Ok(empty));
    }

    #[test]
    fn test_decode_rejects_truncation() {
        let bytes = sample().to_bytes();
        for len in [0, 10, 63, 64, 100, bytes.len() - 1] {
            assert!(SparsityPattern::from_bytes(&bytes[..len]).is_err(), "len {len}");
        }
    }

    #[test]
    fn test_decode_rejects_corrupt_arrays() {
        let pattern = sample();
        let header = pattern.header();
        let column_start = header.column_indices_offset as usize;

        let mut out_of_range = pattern.to_bytes();
        out_of_range[column_start + 4..column_start + 8].copy_from_slice(&9u32.to_le_bytes());
        assert_eq!(
            SparsityPattern::from_bytes(&out_of_range),
            Err(PatternError::Malformed("column index out of range"))
        );

        let mut bad_offsets = pattern.to_bytes();
        bad_offsets[80..88].copy_from_slice(&1u64.to_le_bytes());
        assert_eq!(
            SparsityPattern::from_bytes(&bad_offsets),
            Err(PatternError::Malformed("row offsets not monotone"))
        );

        let mut bad_max = pattern.to_bytes();
        bad_max[32..40].copy_from_slice(&2u64.to_le_bytes());
        assert_eq!(
            SparsityPattern::from_bytes(&bad_max),
            Err(PatternError::Malformed("row length does not match header"))
        );
    }

    #[test]
    fn test_split_image_sections() {
        let pattern = sample();
        let bytes = pattern.to_bytes();
        let sections = split_image(&bytes).unwrap();
        assert_eq!(sections.header, pattern.header());
        assert_eq!(sections.row_start.len(), 5 * 8);
        assert_eq!(sections.column_indices.len(), pattern.n_nonzero_elements() * 4);
    }
}

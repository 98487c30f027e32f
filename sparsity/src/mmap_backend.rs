//! Memory-mapped pattern files
//!
//! A pattern file holds exactly one block image and nothing after it.
//! [`PatternFile::open`] maps
//! the file and validates the whole layout once; afterwards
//! [`PatternFile::view`] answers structural queries straight from the
//! mapped pages without copying.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};
use sparsity_core::format::constants::ROW_START_WIDTH;
use sparsity_core::validation::validate_compressed_layout;
use sparsity_core::{
    split_backend, split_image, ImageSections, PatternError, PatternHeader, SparsityPattern,
    SparsityStructure, StorageBackend,
};

use crate::{BlockIo, Result};

/// Read-only memory-mapped pattern file
pub struct PatternFile {
    mmap: Mmap,
    header: PatternHeader,
    path: PathBuf,
}

impl PatternFile {
    /// Write `pattern` as a block image to a new file at `path`
    pub fn write<P: AsRef<Path>>(path: P, pattern: &SparsityPattern) -> Result<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        pattern.block_write(&mut out)?;
        out.flush()?;

        tracing::info!(
            path = %path.display(),
            n_rows = pattern.n_rows(),
            nnz = pattern.n_nonzero_elements(),
            "wrote pattern file"
        );
        Ok(())
    }

    /// Map and validate an existing pattern file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;

        // SAFETY: read-only mapping; the view validates every byte it relies on
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        let mut file = Self {
            mmap,
            header: PatternHeader::default(),
            path,
        };
        let header = PatternView::from_backend(&file)?.header;
        file.header = header;
        tracing::info!(
            path = %file.path.display(),
            n_rows = header.n_rows,
            n_cols = header.n_cols,
            nnz = header.nnz,
            "opened pattern file"
        );

        Ok(file)
    }

    /// Header of the mapped image
    pub fn header(&self) -> &PatternHeader {
        &self.header
    }

    /// Path the file was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Zero-copy structural view of the mapped pattern
    pub fn view(&self) -> PatternView<'_> {
        PatternView::assume_valid(self.as_slice(), self.header)
    }

    /// Copy the mapped pattern into an owned [`SparsityPattern`]
    pub fn to_pattern(&self) -> Result<SparsityPattern> {
        self.view().to_pattern()
    }
}

impl StorageBackend for PatternFile {
    fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

/// Borrowed compressed pattern over an encoded block image
///
/// The byte buffer must be 8-byte aligned, which holds for memory maps.
#[derive(Debug, Clone, Copy)]
pub struct PatternView<'a> {
    header: PatternHeader,
    n_rows: usize,
    n_cols: usize,
    row_start: &'a [u64],
    column_indices: &'a [u32],
}

impl<'a> PatternView<'a> {
    /// Validate an encoded image and borrow it as a pattern
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        Self::from_sections(split_image(bytes)?)
    }

    /// Validate the image held by a storage backend and borrow it
    ///
    /// Unlike [`from_bytes`](Self::from_bytes), bytes after the image are rejected.
    pub fn from_backend<B: StorageBackend + ?Sized>(backend: &'a B) -> Result<Self> {
        Self::from_sections(split_backend(backend)?)
    }

    fn from_sections(sections: ImageSections<'a>) -> Result<Self> {
        let view = Self::cast(sections)?;
        validate_compressed_layout(
            view.n_rows,
            view.n_cols,
            view.row_start,
            view.column_indices,
            view.header.diagonal_first(),
        )?;

        let longest = (0..view.n_rows)
            .map(|row| view.row_length(row))
            .max()
            .unwrap_or(0);
        if longest as u64 != view.header.max_entries_per_row {
            return Err(PatternError::Malformed("row length does not match header").into());
        }
        Ok(view)
    }

    /// Re-borrow an image that already passed [`from_bytes`](Self::from_bytes)
    fn assume_valid(bytes: &'a [u8], header: PatternHeader) -> Self {
        let sections = PatternSections::locate(bytes, &header);
        Self {
            header,
            n_rows: header.n_rows as usize,
            n_cols: header.n_cols as usize,
            row_start: bytemuck::cast_slice(sections.row_start),
            column_indices: bytemuck::cast_slice(sections.column_indices),
        }
    }

    fn cast(sections: ImageSections<'a>) -> Result<Self> {
        let header = sections.header;
        let row_start: &[u64] = bytemuck::try_cast_slice(sections.row_start)
            .map_err(|_| PatternError::Malformed("row offset array not aligned"))?;
        let column_indices: &[u32] = bytemuck::try_cast_slice(sections.column_indices)
            .map_err(|_| PatternError::Malformed("column index array not aligned"))?;
        let n_rows = usize::try_from(header.n_rows).map_err(|_| PatternError::DimensionTooLarge)?;

        Ok(Self {
            header,
            n_rows,
            n_cols: header.n_cols as usize,
            row_start,
            column_indices,
        })
    }

    /// Header of the underlying image
    pub fn header(&self) -> &PatternHeader {
        &self.header
    }

    /// Raw row offsets as stored
    pub fn row_start(&self) -> &'a [u64] {
        self.row_start
    }

    /// Copy into an owned pattern
    pub fn to_pattern(&self) -> Result<SparsityPattern> {
        let row_start = self.row_start.iter().map(|&offset| offset as usize).collect();
        Ok(SparsityPattern::from_raw_parts(
            self.n_rows,
            self.n_cols,
            row_start,
            self.column_indices.to_vec(),
            self.header.diagonal_first(),
        )?)
    }
}

impl SparsityStructure for PatternView<'_> {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_cols(&self) -> usize {
        self.n_cols
    }

    fn row_offset(&self, row: usize) -> usize {
        self.row_start[row] as usize
    }

    fn column_indices(&self) -> &[u32] {
        self.column_indices
    }

    fn stores_diagonal_first(&self) -> bool {
        self.header.diagonal_first()
    }

    fn n_nonzero_elements(&self) -> usize {
        self.column_indices.len()
    }

    fn max_entries_per_row(&self) -> usize {
        self.header.max_entries_per_row as usize
    }
}

/// Byte ranges of a header-validated image
struct PatternSections<'a> {
    row_start: &'a [u8],
    column_indices: &'a [u8],
}

impl<'a> PatternSections<'a> {
    fn locate(bytes: &'a [u8], header: &PatternHeader) -> Self {
        let row_start = header.row_start_offset as usize;
        let row_end = row_start + (header.n_rows as usize + 1) * ROW_START_WIDTH;
        let column_start = header.column_indices_offset as usize;
        let column_end = column_start + header.nnz as usize * std::mem::size_of::<u32>();
        Self {
            row_start: &bytes[row_start..row_end],
            column_indices: &bytes[column_start..column_end],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparsity_core::PatternBuilder;
    use tempfile::tempdir;

    fn banded(n: usize) -> SparsityPattern {
        let mut builder = PatternBuilder::new(n, n, 5).unwrap();
        for row in 0..n {
            let lo = row.saturating_sub(2);
            let hi = (row + 2).min(n - 1);
            builder.add_entries(row, lo..=hi).unwrap();
        }
        builder.compress().unwrap()
    }

    #[test]
    fn test_write_open_view() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("banded.spat");
        let pattern = banded(12);

        PatternFile::write(&path, &pattern).unwrap();
        let file = PatternFile::open(&path).unwrap();
        assert_eq!(file.size(), pattern.encoded_len());
        assert_eq!(file.path(), path.as_path());

        let view = file.view();
        assert_eq!(view.n_rows(), 12);
        assert_eq!(view.n_nonzero_elements(), pattern.n_nonzero_elements());
        assert_eq!(view.bandwidth(), 2);
        assert_eq!(view.max_entries_per_row(), 5);
        for row in 0..12 {
            assert_eq!(view.row(row), pattern.row(row));
        }
        for index in 0..view.n_nonzero_elements() {
            assert_eq!(view.matrix_position(index), pattern.matrix_position(index));
        }
        assert_eq!(view.index_of(5, 7), pattern.index_of(5, 7));

        assert_eq!(file.to_pattern().unwrap(), pattern);
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.spat");
        let pattern = banded(6);

        let mut bytes = pattern.to_bytes();
        let column_start = pattern.header().column_indices_offset as usize;
        bytes[column_start..column_start + 4].copy_from_slice(&42u32.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();

        let err = PatternFile::open(&path).err().unwrap();
        assert!(matches!(err, crate::Error::Pattern(PatternError::Malformed(_))));

        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(PatternFile::open(&path).is_err());

        let mut padded = pattern.to_bytes();
        padded.extend_from_slice(&[0; 8]);
        std::fs::write(&path, &padded).unwrap();
        let err = PatternFile::open(&path).err().unwrap();
        assert!(matches!(
            err,
            crate::Error::Pattern(PatternError::Malformed("trailing bytes after pattern image"))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let err = PatternFile::open(dir.path().join("missing.spat")).err().unwrap();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}

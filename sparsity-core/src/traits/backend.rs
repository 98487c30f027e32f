//! Byte storage backends holding serialized patterns

use crate::{split_image, ImageSections, PatternError, Result};

/// Trait for backends that hold a serialized pattern image
///
/// Implemented by memory-mapped pattern files; [`split_backend`] reads the
/// header and array sections straight from the stored bytes.
pub trait StorageBackend {
    /// Get the stored bytes
    fn as_slice(&self) -> &[u8];

    /// Get the size of the data in bytes
    fn size(&self) -> usize {
        self.as_slice().len()
    }
}

/// Split the image held by a backend into its sections
pub fn split_backend<B: StorageBackend + ?Sized>(backend: &B) -> Result<ImageSections<'_>> {
    let bytes = backend.as_slice();
    let sections = split_image(bytes)?;
    if backend.size() != sections.header.image_size()? {
        return Err(PatternError::Malformed("trailing bytes after pattern image"));
    }
    Ok(sections)
}

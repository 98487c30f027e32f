//! Array bounds validation for binary images

use crate::PatternError;

/// Validate array bounds for a given element type
///
/// Returns the element count of a byte region holding `T`s.
pub const fn validate_array_bounds<T>(byte_len: usize) -> Result<usize, PatternError> {
    let element_size = core::mem::size_of::<T>();

    if byte_len % element_size != 0 {
        return Err(PatternError::Malformed("array size not a multiple of element size"));
    }

    let count = byte_len / element_size;

    // Byte offsets of every element must stay representable
    if count > usize::MAX / 8 {
        return Err(PatternError::Malformed("array too large"));
    }

    Ok(count)
}

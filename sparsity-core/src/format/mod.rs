//! Binary format definitions for the pattern block image
//!
//! Pure data structure definitions for the wire format. Encoding and
//! decoding of whole patterns lives in [`crate::codec`].

pub mod constants;
pub mod header;

pub use header::PatternHeader;

//! Validation utilities for pattern layouts and binary images
//!
//! Pure functions with no I/O dependencies: typed array bounds and the
//! structural checks a compressed layout must pass.

pub mod bounds;
pub mod layout;

pub use bounds::validate_array_bounds;
pub use layout::{validate_compressed_layout, RowOffset};

//! Sparsity - Compressed Sparsity Patterns with I/O
//!
//! This library adds the std side to [`sparsity_core`]: block image
//! read/write over `std::io`, text output, shape summaries and memory-mapped
//! pattern files with zero-copy structural queries.
//!
//! ## Architecture
//!
//! - **sparsity-core**: pattern types, binary format and validation (no I/O)
//! - **sparsity**: streams, files, text and JSON output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sparsity::{PatternBuilder, PatternFile, SparsityStructure};
//!
//! fn example() -> sparsity::Result<()> {
//!     let mut builder = PatternBuilder::new(100, 100, 3)?;
//!     for row in 1..100 {
//!         builder.add(row, row - 1)?;
//!     }
//!     builder.symmetrize()?;
//!     let pattern = builder.compress()?;
//!
//!     PatternFile::write("tridiagonal.spat", &pattern)?;
//!     let file = PatternFile::open("tridiagonal.spat")?;
//!     assert_eq!(file.view().bandwidth(), 1);
//!     Ok(())
//! }
//! ```

pub use sparsity_core::{
    // Pattern types
    Entries, PatternBuilder, SparsityPattern, SparsityStructure, StorageBackend,
    // Format definitions
    PatternConfig, PatternHeader, INVALID_ENTRY,
    // Core errors
    ErrorCategory, PatternError,
};

pub mod block_io;
pub mod error;
#[cfg(all(feature = "mmap", target_endian = "little"))]
pub mod mmap_backend;
pub mod print;
pub mod summary;

pub use block_io::BlockIo;
pub use error::{Error, Result};
pub use print::PrintPattern;
pub use summary::PatternSummary;

#[cfg(all(feature = "mmap", target_endian = "little"))]
pub use mmap_backend::{PatternFile, PatternView};

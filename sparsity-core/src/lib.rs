#![no_std]

//! Sparsity Core - Compressed Sparsity Pattern Definitions
//!
//! This crate provides the sparsity pattern types, the block image format
//! and the structural query trait shared by owned patterns and zero-copy
//! views. It needs only `alloc`.
//!
//! A pattern is built in two phases: entries are recorded in a
//! [`PatternBuilder`], which [`PatternBuilder::compress`] consumes to produce
//! an immutable, row-sorted [`SparsityPattern`].
//!
//! ```
//! use sparsity_core::{PatternBuilder, SparsityStructure};
//!
//! let mut builder = PatternBuilder::new(3, 3, 3)?;
//! builder.add(0, 2)?;
//! builder.add(2, 1)?;
//! builder.symmetrize()?;
//! let pattern = builder.compress()?;
//!
//! assert_eq!(pattern.n_nonzero_elements(), 7);
//! assert_eq!(pattern.row(2), &[2, 0, 1]);
//! let index = pattern.index_of(2, 1).unwrap();
//! assert_eq!(pattern.matrix_position(index), Some((2, 1)));
//! # Ok::<(), sparsity_core::PatternError>(())
//! ```

extern crate alloc;

pub mod builder;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod pattern;
pub mod traits;
pub mod validation;

pub use builder::PatternBuilder;
pub use codec::{split_image, ImageSections};
pub use config::PatternConfig;
pub use error::{ErrorCategory, PatternError, Result};
pub use format::constants::INVALID_ENTRY;
pub use format::PatternHeader;
pub use pattern::SparsityPattern;
pub use traits::{split_backend, Entries, SparsityStructure, StorageBackend};

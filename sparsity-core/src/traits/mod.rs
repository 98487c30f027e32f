//! Abstract interfaces shared by owned and borrowed patterns

pub mod backend;
pub mod structure;

pub use backend::{split_backend, StorageBackend};
pub use structure::{Entries, SparsityStructure};

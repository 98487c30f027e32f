//! Error type for pattern I/O

use sparsity_core::{ErrorCategory, PatternError};
use thiserror::Error;

/// Errors from building, reading or writing sparsity patterns
#[derive(Error, Debug)]
pub enum Error {
    /// Structural or format error reported by the pattern itself
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Underlying reader, writer or file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Summary or pattern JSON could not be produced or parsed
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Category of the wrapped pattern error, `None` for I/O and JSON failures
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Error::Pattern(err) => Some(err.category()),
            _ => None,
        }
    }
}

/// Result type for pattern I/O
pub type Result<T> = std::result::Result<T, Error>;

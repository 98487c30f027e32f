//! Block image I/O over `std::io`
//!
//! [`BlockIo::block_write`] emits exactly the image produced by
//! [`SparsityPattern::to_bytes`]; [`BlockIo::block_read`] consumes exactly
//! one image from the reader, so several patterns can share a stream.

use std::io::{ErrorKind, Read, Write};

use sparsity_core::{PatternError, PatternHeader, SparsityPattern, SparsityStructure};

use crate::{Error, Result};

/// Upper bound on the buffer reserved before any array bytes arrive
const INITIAL_READ_RESERVATION: usize = 1 << 20;

/// Streaming block serialization for compressed patterns
pub trait BlockIo: Sized {
    /// Write the versioned block image to `out`
    fn block_write<W: Write>(&self, out: &mut W) -> Result<()>;

    /// Read one block image and return the pattern it holds
    ///
    /// The result replaces whatever pattern the caller held before.
    fn block_read<R: Read>(input: &mut R) -> Result<Self>;
}

impl BlockIo for SparsityPattern {
    fn block_write<W: Write>(&self, out: &mut W) -> Result<()> {
        let bytes = self.to_bytes();
        out.write_all(&bytes)?;

        tracing::debug!(
            n_rows = self.n_rows(),
            n_cols = self.n_cols(),
            nnz = self.n_nonzero_elements(),
            bytes = bytes.len(),
            "wrote pattern block"
        );
        Ok(())
    }

    fn block_read<R: Read>(input: &mut R) -> Result<Self> {
        let mut header_bytes = [0u8; PatternHeader::SIZE];
        input.read_exact(&mut header_bytes).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => Error::Pattern(PatternError::Malformed("truncated header")),
            _ => Error::Io(err),
        })?;

        let header = PatternHeader::from_bytes(&header_bytes)?;
        let remaining = header.image_size()? - PatternHeader::SIZE;

        let mut bytes =
            Vec::with_capacity(PatternHeader::SIZE + remaining.min(INITIAL_READ_RESERVATION));
        bytes.extend_from_slice(&header_bytes);
        let read = input.take(remaining as u64).read_to_end(&mut bytes)?;
        if read < remaining {
            return Err(PatternError::Malformed("truncated pattern image").into());
        }

        let pattern = SparsityPattern::from_bytes(&bytes)?;
        tracing::debug!(
            n_rows = pattern.n_rows(),
            n_cols = pattern.n_cols(),
            nnz = pattern.n_nonzero_elements(),
            "read pattern block"
        );
        Ok(pattern)
    }
}

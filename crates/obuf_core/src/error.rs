//! Error types for obuf core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in buffer and lens operations.
///
/// Framing anomalies never show up here: a zero, malformed, or truncated
/// record is reported as end-of-data (`Ok(None)` or the end of an
/// iteration). Only resource and codec failures are errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backing store error.
    #[error("storage error: {0}")]
    Storage(#[from] obuf_storage::StorageError),

    /// Value codec error.
    #[error("codec error: {0}")]
    Codec(#[from] obuf_codec::CodecError),

    /// I/O error on a stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A scan error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// A file or record that does not exist is never one of these: scans treat
/// "not found" as "create it" or "it was deleted".
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The scan was cancelled through its [`Halt`](crate::Halt) handle.
    #[display("scan halted")]
    Halted,
    #[display("library index error")]
    Index,
    /// An audio file could not be read; the whole scan stops.
    #[display("cannot read tags: {}", _0.display())]
    Tags(#[error(not(source))] PathBuf),
    #[display("filesystem error: {}", _0.display())]
    Filesystem(#[error(not(source))] PathBuf),
    /// An audio extension was configured that the index has no file type for.
    #[display("unsupported audio file type: {_0}")]
    UnsupportedFileType(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Halted | Self::Index)
    }
}

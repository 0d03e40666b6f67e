//! Tag Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A tag extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for tag extraction.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file could not be opened.
    #[display("cannot open audio file: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The file was opened but is not audio the decoder understands.
    #[display("unreadable audio file: {}", _0.display())]
    Format(#[error(not(source))] PathBuf),
    /// The blocking worker running the decoder went away.
    #[display("tag reader task failed")]
    Task,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

//! Application Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An application error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for commands.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("cannot load configuration")]
    Config,
    #[display("cannot open index: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    #[display("index error")]
    Index,
    #[display("no library root: pass one on the command line or set library.root")]
    NoRoot,
    #[display("media scan failed")]
    MediaScan,
    #[display("orphan scan failed")]
    OrphanScan,
}

//! Index records and their SQLite row representations.
//!
//! Records are what the rest of the workspace works with (paths as
//! [`PathBuf`](std::path::PathBuf), sizes as `u64`). Rows are what `sqlx`
//! reads and writes; conversions between the two are fallible because SQLite
//! only knows signed integers and UTF-8 text.

mod album;
mod art;
mod artist;
mod file_type;
mod folder;
mod song;

pub use self::album::Album;
pub use self::art::Art;
pub(crate) use self::art::ArtRow;
pub use self::artist::Artist;
pub use self::file_type::FileType;
pub use self::folder::Folder;
pub(crate) use self::folder::FolderRow;
pub use self::song::Song;
pub(crate) use self::song::SongRow;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::path::Path;

/// Numeric record identity, assigned by the database on save.
///
/// Records that have not been saved yet carry an ID of `0`.
pub type Id = i64;

pub(crate) fn path_to_text(path: &Path) -> Result<String> {
    Ok(path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string())
}

pub(crate) fn size_to_row(size: u64) -> Result<i64> {
    i64::try_from(size).or_raise(|| ErrorKind::InvalidData("file size"))
}

pub(crate) fn size_from_row(size: i64) -> Result<u64> {
    u64::try_from(size).or_raise(|| ErrorKind::InvalidData("file size"))
}

use crate::error::Error;
use crate::models::{Id, path_to_text, size_from_row, size_to_row};
use std::path::PathBuf;

/// An image file, used as cover art for every song in its folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Art {
    pub id: Id,
    pub path: PathBuf,
    /// Always greater than zero: empty files cannot be served.
    pub file_size: u64,
    /// Unix timestamp (seconds).
    pub last_modified: i64,
}
impl Art {
    /// A new, unsaved art record.
    pub fn new(path: impl Into<PathBuf>, file_size: u64, last_modified: i64) -> Self {
        Self {
            id: 0,
            path: path.into(),
            file_size,
            last_modified,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ArtRow {
    pub(crate) id: i64,
    pub(crate) path: String,
    pub(crate) file_size: i64,
    pub(crate) last_modified: i64,
}
impl TryFrom<&Art> for ArtRow {
    type Error = Error;
    fn try_from(art: &Art) -> Result<Self, Self::Error> {
        Ok(Self {
            id: art.id,
            path: path_to_text(&art.path)?,
            file_size: size_to_row(art.file_size)?,
            last_modified: art.last_modified,
        })
    }
}
impl TryFrom<ArtRow> for Art {
    type Error = Error;
    fn try_from(row: ArtRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            path: PathBuf::from(row.path),
            file_size: size_from_row(row.file_size)?,
            last_modified: row.last_modified,
        })
    }
}

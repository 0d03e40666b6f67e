use crate::error::Error;
use crate::models::{Id, path_to_text};
use std::path::{Path, PathBuf};

/// A directory holding at least one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: Id,
    pub path: PathBuf,
    /// Base name of the directory, for display.
    pub title: String,
    /// `None` for folders whose parent directory is not indexed (library roots).
    pub parent_id: Option<Id>,
}
impl Folder {
    /// A new, unsaved folder for `path`, titled after its base name.
    pub fn new(path: impl Into<PathBuf>, parent_id: Option<Id>) -> Self {
        let path = path.into();
        let title = Self::title_of(&path);
        Self { id: 0, path, title, parent_id }
    }

    fn title_of(path: &Path) -> String {
        match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            // Filesystem root, or a path ending in `..`.
            None => path.to_string_lossy().into_owned(),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FolderRow {
    pub(crate) id: i64,
    pub(crate) path: String,
    pub(crate) title: String,
    pub(crate) parent_id: Option<i64>,
}
impl TryFrom<&Folder> for FolderRow {
    type Error = Error;
    fn try_from(folder: &Folder) -> Result<Self, Self::Error> {
        Ok(Self {
            id: folder.id,
            path: path_to_text(&folder.path)?,
            title: folder.title.clone(),
            parent_id: folder.parent_id,
        })
    }
}
impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Self {
            id: row.id,
            path: PathBuf::from(row.path),
            title: row.title,
            parent_id: row.parent_id,
        }
    }
}

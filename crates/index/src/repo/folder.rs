use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{Folder, FolderRow, path_to_text};
use exn::ResultExt;
use std::path::Path;

impl Repository {
    /// Get the folder indexed at exactly `path`.
    pub async fn load_folder(&self, path: impl AsRef<Path>) -> Result<Option<Folder>> {
        let row: Option<FolderRow> = sqlx::query_as(include_str!("../../queries/load_folder.sql"))
            .bind(path_to_text(path.as_ref())?)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Folder::from))
    }

    /// Insert a new folder, assigning its ID.
    ///
    /// The parent (if any) must already be saved.
    pub async fn save_folder(&self, folder: &mut Folder) -> Result<()> {
        let row = FolderRow::try_from(&*folder)?;
        folder.id = sqlx::query_scalar(include_str!("../../queries/save_folder.sql"))
            .bind(row.path)
            .bind(row.title)
            .bind(row.parent_id)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Delete a folder. Child folders lose their parent link.
    pub async fn delete_folder(&self, folder: &Folder) -> Result<bool> {
        let id = Self::saved(folder.id, "folder")?;
        self.delete_by_id(include_str!("../../queries/delete_folder.sql"), id).await
    }

    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        let rows: Vec<FolderRow> = sqlx::query_as(include_str!("../../queries/list_folders.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Folder::from).collect())
    }

    /// Folders at or below `path`.
    pub async fn folders_in_path(&self, path: impl AsRef<Path>) -> Result<Vec<Folder>> {
        let (root, prefix) = Self::subtree(path.as_ref())?;
        let rows: Vec<FolderRow> = sqlx::query_as(include_str!("../../queries/folders_in_path.sql"))
            .bind(root)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Folder::from).collect())
    }

    /// Folders neither at nor below `path`.
    pub async fn folders_not_in_path(&self, path: impl AsRef<Path>) -> Result<Vec<Folder>> {
        let (root, prefix) = Self::subtree(path.as_ref())?;
        let rows: Vec<FolderRow> = sqlx::query_as(include_str!("../../queries/folders_not_in_path.sql"))
            .bind(root)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Folder::from).collect())
    }
}

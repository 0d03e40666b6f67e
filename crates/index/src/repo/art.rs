use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{Art, ArtRow, path_to_text};
use exn::ResultExt;
use std::path::Path;

impl Repository {
    /// Get the art indexed at exactly `path`.
    pub async fn load_art(&self, path: impl AsRef<Path>) -> Result<Option<Art>> {
        let row: Option<ArtRow> = sqlx::query_as(include_str!("../../queries/load_art.sql"))
            .bind(path_to_text(path.as_ref())?)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Art::try_from).transpose()
    }

    /// Insert new art, assigning its ID.
    pub async fn save_art(&self, art: &mut Art) -> Result<()> {
        let row = ArtRow::try_from(&*art)?;
        art.id = sqlx::query_scalar(include_str!("../../queries/save_art.sql"))
            .bind(row.path)
            .bind(row.file_size)
            .bind(row.last_modified)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Delete art. Songs referencing it are left without art.
    pub async fn delete_art(&self, art: &Art) -> Result<bool> {
        let id = Self::saved(art.id, "art")?;
        self.delete_by_id(include_str!("../../queries/delete_art.sql"), id).await
    }

    pub async fn list_art(&self) -> Result<Vec<Art>> {
        let rows: Vec<ArtRow> = sqlx::query_as(include_str!("../../queries/list_art.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Art::try_from).collect()
    }

    /// Art at or below `path`.
    pub async fn art_in_path(&self, path: impl AsRef<Path>) -> Result<Vec<Art>> {
        let (root, prefix) = Self::subtree(path.as_ref())?;
        let rows: Vec<ArtRow> = sqlx::query_as(include_str!("../../queries/art_in_path.sql"))
            .bind(root)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Art::try_from).collect()
    }

    /// Art neither at nor below `path`.
    pub async fn art_not_in_path(&self, path: impl AsRef<Path>) -> Result<Vec<Art>> {
        let (root, prefix) = Self::subtree(path.as_ref())?;
        let rows: Vec<ArtRow> = sqlx::query_as(include_str!("../../queries/art_not_in_path.sql"))
            .bind(root)
            .bind(prefix)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Art::try_from).collect()
    }
}

use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::Artist;
use exn::ResultExt;

impl Repository {
    /// Get an artist by exact title.
    pub async fn load_artist(&self, title: impl AsRef<str>) -> Result<Option<Artist>> {
        sqlx::query_as(include_str!("../../queries/load_artist.sql"))
            .bind(title.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Insert a new artist, assigning its ID.
    pub async fn save_artist(&self, artist: &mut Artist) -> Result<()> {
        artist.id = sqlx::query_scalar(include_str!("../../queries/save_artist.sql"))
            .bind(&artist.title)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Delete an artist. Fails while albums or songs still reference it.
    pub async fn delete_artist(&self, artist: &Artist) -> Result<bool> {
        let id = Self::saved(artist.id, "artist")?;
        self.delete_by_id(include_str!("../../queries/delete_artist.sql"), id).await
    }

    pub async fn list_artists(&self) -> Result<Vec<Artist>> {
        sqlx::query_as(include_str!("../../queries/list_artists.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }
}

use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{Album, Id};
use exn::ResultExt;

impl Repository {
    /// Get an album by artist and exact title.
    pub async fn load_album(&self, artist_id: Id, title: impl AsRef<str>) -> Result<Option<Album>> {
        sqlx::query_as(include_str!("../../queries/load_album.sql"))
            .bind(artist_id)
            .bind(title.as_ref())
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Insert a new album, assigning its ID. The artist must already be saved.
    pub async fn save_album(&self, album: &mut Album) -> Result<()> {
        Self::saved(album.artist_id, "album artist")?;
        album.id = sqlx::query_scalar(include_str!("../../queries/save_album.sql"))
            .bind(album.artist_id)
            .bind(&album.artist)
            .bind(&album.title)
            .bind(album.year)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Delete an album. Fails while songs still reference it.
    pub async fn delete_album(&self, album: &Album) -> Result<bool> {
        let id = Self::saved(album.id, "album")?;
        self.delete_by_id(include_str!("../../queries/delete_album.sql"), id).await
    }

    pub async fn list_albums(&self) -> Result<Vec<Album>> {
        sqlx::query_as(include_str!("../../queries/list_albums.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    pub async fn albums_for_artist(&self, artist_id: Id) -> Result<Vec<Album>> {
        sqlx::query_as(include_str!("../../queries/albums_for_artist.sql"))
            .bind(artist_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }
}

#[cfg(test)]
mod tests {
    use crate::Album;
    use crate::repo::tests::{album, repository};

    #[tokio::test]
    async fn test_identity_is_artist_and_title() {
        let repo = repository().await;
        let (first, _) = album(&repo, "First", "Greatest Hits").await;
        let (second, _) = album(&repo, "Second", "Greatest Hits").await;
        let a = repo.load_album(first.id, "Greatest Hits").await.unwrap().unwrap();
        let b = repo.load_album(second.id, "Greatest Hits").await.unwrap().unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.artist, "First");
        assert_eq!(repo.albums_for_artist(first.id).await.unwrap(), vec![a]);
        assert_eq!(repo.list_albums().await.unwrap().len(), 2);
        assert!(repo.load_album(first.id, "Greatest hits").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_album_needs_saved_artist() {
        let repo = repository().await;
        let mut orphan = Album::new(0, "Nobody", "Nothing", 0);
        assert!(repo.save_album(&mut orphan).await.is_err());
    }
}

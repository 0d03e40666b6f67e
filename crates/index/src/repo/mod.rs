//! Repository over every record in the index.
//!
//! Lookups by identity return `Ok(None)` when nothing matches; scanners treat
//! that as "create it" rather than as a failure. Saves assign the new ID to
//! the record passed in. Deletes are by ID and say whether a row went away.
//!
//! Bulk "in path" queries are component-based: `/music` covers `/music` and
//! everything below `/music/`, but not `/music2`.

mod album;
mod art;
mod artist;
mod folder;
mod song;

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{Id, path_to_text};
use exn::ResultExt;
use sqlx::SqlitePool;
use std::path::{MAIN_SEPARATOR, Path};

/// Number of records of each kind in the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct Totals {
    pub folders: i64,
    pub artists: i64,
    pub albums: i64,
    pub songs: i64,
    pub art: i64,
}

/// Handle for reading and writing index records.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Bind values for the `*_in_path` queries: the subtree root itself, and
    /// the prefix every descendant path starts with.
    fn subtree(path: &Path) -> Result<(String, String)> {
        let root = path_to_text(path)?;
        let root = match root.trim_end_matches(MAIN_SEPARATOR) {
            // Filesystem root: everything is a descendant.
            "" => MAIN_SEPARATOR.to_string(),
            trimmed => trimmed.to_string(),
        };
        let prefix = match root.ends_with(MAIN_SEPARATOR) {
            true => root.clone(),
            false => format!("{root}{MAIN_SEPARATOR}"),
        };
        Ok((root, prefix))
    }

    fn saved(id: Id, record: &'static str) -> Result<Id> {
        if id <= 0 {
            exn::bail!(ErrorKind::Unsaved(record));
        }
        Ok(id)
    }

    async fn delete_by_id(&self, query: &'static str, id: Id) -> Result<bool> {
        let result = sqlx::query(query).bind(id).execute(&self.pool).await.or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Cascade
    // =========================================================================

    /// Delete every album that no song references any more.
    ///
    /// Returns the number of albums deleted. Call after songs have been
    /// purged, and before [`purge_orphan_artists`](Self::purge_orphan_artists).
    pub async fn purge_orphan_albums(&self) -> Result<u64> {
        let result = sqlx::query(include_str!("../../queries/purge_orphan_albums.sql"))
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected())
    }

    /// Delete every artist that no album or song references any more.
    ///
    /// Returns the number of artists deleted.
    pub async fn purge_orphan_artists(&self) -> Result<u64> {
        let result = sqlx::query(include_str!("../../queries/purge_orphan_artists.sql"))
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    // Counts
    // =========================================================================

    pub async fn totals(&self) -> Result<Totals> {
        sqlx::query_as(include_str!("../../queries/totals.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Album, Art, Artist, FileType, Folder, Song};
    use rstest::rstest;
    use std::path::PathBuf;

    pub(crate) async fn repository() -> Repository {
        Database::connect_in_memory().await.unwrap().repository()
    }

    pub(crate) async fn folder(repo: &Repository, path: &str, parent_id: Option<Id>) -> Folder {
        let mut folder = Folder::new(path, parent_id);
        repo.save_folder(&mut folder).await.unwrap();
        folder
    }

    pub(crate) async fn album(repo: &Repository, artist: &str, title: &str) -> (Artist, Album) {
        let artist = match repo.load_artist(artist).await.unwrap() {
            Some(artist) => artist,
            None => {
                let mut artist = Artist::new(artist);
                repo.save_artist(&mut artist).await.unwrap();
                artist
            },
        };
        let mut album = Album::new(artist.id, &artist.title, title, 2001);
        repo.save_album(&mut album).await.unwrap();
        (artist, album)
    }

    pub(crate) fn song(path: &str, folder: &Folder, album: &Album) -> Song {
        Song {
            id: 0,
            path: PathBuf::from(path),
            folder_id: folder.id,
            artist_id: album.artist_id,
            album_id: album.id,
            art_id: None,
            file_size: 4096,
            last_modified: 1_700_000_000,
            file_type: FileType::Mp3,
            title: "Track".to_string(),
            artist: album.artist.clone(),
            album: album.title.clone(),
            comment: String::new(),
            genre: String::new(),
            track: 1,
            disc: 1,
            year: album.year,
            duration: 180,
            bitrate: 320,
            channels: 2,
            sample_rate: 44_100,
        }
    }

    pub(crate) async fn art(repo: &Repository, path: &str) -> Art {
        let mut art = Art::new(path, 12_288, 1_700_000_000);
        repo.save_art(&mut art).await.unwrap();
        art
    }

    #[rstest]
    #[case("/music", "/music", "/music/")]
    #[case("/music/", "/music", "/music/")]
    #[case("/music//", "/music", "/music/")]
    #[case("/", "/", "/")]
    fn test_subtree(#[case] input: &str, #[case] root: &str, #[case] prefix: &str) {
        let (r, p) = Repository::subtree(Path::new(input)).unwrap();
        assert_eq!(r, root);
        assert_eq!(p, prefix);
    }

    #[tokio::test]
    async fn test_totals_and_cascade() {
        let repo = repository().await;
        let root = folder(&repo, "/music", None).await;
        let (_, kept) = album(&repo, "Artist A", "Kept").await;
        let (_, emptied) = album(&repo, "Artist A", "Emptied").await;
        album(&repo, "Artist B", "Gone").await;
        let mut first = song("/music/kept.mp3", &root, &kept);
        repo.save_song(&mut first).await.unwrap();
        let mut second = song("/music/emptied.mp3", &root, &emptied);
        repo.save_song(&mut second).await.unwrap();
        assert_eq!(
            repo.totals().await.unwrap(),
            Totals {
                folders: 1,
                artists: 2,
                albums: 3,
                songs: 2,
                art: 0
            }
        );

        repo.delete_song(&second).await.unwrap();
        // "Emptied" and "Gone" have no songs; only "Artist B" loses all albums.
        assert_eq!(repo.purge_orphan_albums().await.unwrap(), 2);
        assert_eq!(repo.purge_orphan_artists().await.unwrap(), 1);
        let artists = repo.list_artists().await.unwrap();
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].title, "Artist A");
        // Nothing left to purge.
        assert_eq!(repo.purge_orphan_albums().await.unwrap(), 0);
        assert_eq!(repo.purge_orphan_artists().await.unwrap(), 0);
    }
}

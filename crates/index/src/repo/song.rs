use crate::Repository;
use crate::error::{ErrorKind, Result};
use crate::models::{Id, Song, SongRow, path_to_text};
use exn::ResultExt;
use sqlx::Sqlite;
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;
use std::path::Path;

type SongQuery<'q> = QueryAs<'q, Sqlite, SongRow, SqliteArguments<'q>>;

impl Repository {
    async fn fetch_songs(&self, query: SongQuery<'_>) -> Result<Vec<Song>> {
        let rows = query.fetch_all(&self.pool).await.or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Song::try_from).collect()
    }

    /// Get the song indexed at exactly `path`.
    pub async fn load_song(&self, path: impl AsRef<Path>) -> Result<Option<Song>> {
        let row: Option<SongRow> = sqlx::query_as(include_str!("../../queries/load_song.sql"))
            .bind(path_to_text(path.as_ref())?)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Song::try_from).transpose()
    }

    /// Insert a new song, assigning its ID.
    ///
    /// Its folder, artist and album must already be saved.
    pub async fn save_song(&self, song: &mut Song) -> Result<()> {
        let row = SongRow::try_from(&*song)?;
        song.id = sqlx::query_scalar(include_str!("../../queries/save_song.sql"))
            .bind(row.path)
            .bind(row.folder_id)
            .bind(row.artist_id)
            .bind(row.album_id)
            .bind(row.art_id)
            .bind(row.file_size)
            .bind(row.last_modified)
            .bind(row.file_type)
            .bind(row.title)
            .bind(row.artist)
            .bind(row.album)
            .bind(row.comment)
            .bind(row.genre)
            .bind(row.track)
            .bind(row.disc)
            .bind(row.year)
            .bind(row.duration)
            .bind(row.bitrate)
            .bind(row.channels)
            .bind(row.sample_rate)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Overwrite every field of an existing song, keeping its ID.
    ///
    /// Returns `false` if no song has that ID.
    pub async fn update_song(&self, song: &Song) -> Result<bool> {
        let id = Self::saved(song.id, "song")?;
        let row = SongRow::try_from(song)?;
        let result = sqlx::query(include_str!("../../queries/update_song.sql"))
            .bind(id)
            .bind(row.path)
            .bind(row.folder_id)
            .bind(row.artist_id)
            .bind(row.album_id)
            .bind(row.art_id)
            .bind(row.file_size)
            .bind(row.last_modified)
            .bind(row.file_type)
            .bind(row.title)
            .bind(row.artist)
            .bind(row.album)
            .bind(row.comment)
            .bind(row.genre)
            .bind(row.track)
            .bind(row.disc)
            .bind(row.year)
            .bind(row.duration)
            .bind(row.bitrate)
            .bind(row.channels)
            .bind(row.sample_rate)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_song(&self, song: &Song) -> Result<bool> {
        let id = Self::saved(song.id, "song")?;
        self.delete_by_id(include_str!("../../queries/delete_song.sql"), id).await
    }

    pub async fn list_songs(&self) -> Result<Vec<Song>> {
        self.fetch_songs(sqlx::query_as(include_str!("../../queries/list_songs.sql"))).await
    }

    /// Songs directly inside a folder (not its sub-folders).
    pub async fn songs_for_folder(&self, folder_id: Id) -> Result<Vec<Song>> {
        self.fetch_songs(sqlx::query_as(include_str!("../../queries/songs_for_folder.sql")).bind(folder_id)).await
    }

    /// Songs of an album in disc and track order.
    pub async fn songs_for_album(&self, album_id: Id) -> Result<Vec<Song>> {
        self.fetch_songs(sqlx::query_as(include_str!("../../queries/songs_for_album.sql")).bind(album_id)).await
    }

    pub async fn songs_for_artist(&self, artist_id: Id) -> Result<Vec<Song>> {
        self.fetch_songs(sqlx::query_as(include_str!("../../queries/songs_for_artist.sql")).bind(artist_id)).await
    }

    /// Songs at or below `path`.
    pub async fn songs_in_path(&self, path: impl AsRef<Path>) -> Result<Vec<Song>> {
        let (root, prefix) = Self::subtree(path.as_ref())?;
        self.fetch_songs(sqlx::query_as(include_str!("../../queries/songs_in_path.sql")).bind(root).bind(prefix))
            .await
    }

    /// Songs neither at nor below `path`.
    pub async fn songs_not_in_path(&self, path: impl AsRef<Path>) -> Result<Vec<Song>> {
        let (root, prefix) = Self::subtree(path.as_ref())?;
        self.fetch_songs(sqlx::query_as(include_str!("../../queries/songs_not_in_path.sql")).bind(root).bind(prefix))
            .await
    }
}

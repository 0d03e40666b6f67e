use crate::error::{Error, ErrorKind};
use crate::models::{FileType, Id, path_to_text, size_from_row, size_to_row};
use exn::OptionExt;
use std::path::PathBuf;

/// An audio file and the tags read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: Id,
    pub path: PathBuf,
    pub folder_id: Id,
    pub artist_id: Id,
    pub album_id: Id,
    /// Cover art of the song's folder, if any has been found.
    pub art_id: Option<Id>,
    /// Always greater than zero: empty files cannot be streamed.
    pub file_size: u64,
    /// Unix timestamp (seconds); a newer value on disk triggers an update.
    pub last_modified: i64,
    pub file_type: FileType,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub comment: String,
    pub genre: String,
    pub track: u32,
    pub disc: u32,
    pub year: u32,
    /// Whole seconds.
    pub duration: u32,
    /// Kilobits per second.
    pub bitrate: u32,
    pub channels: u8,
    pub sample_rate: u32,
}

#[derive(sqlx::FromRow)]
pub(crate) struct SongRow {
    pub(crate) id: i64,
    pub(crate) path: String,
    pub(crate) folder_id: i64,
    pub(crate) artist_id: i64,
    pub(crate) album_id: i64,
    pub(crate) art_id: Option<i64>,
    pub(crate) file_size: i64,
    pub(crate) last_modified: i64,
    pub(crate) file_type: i64,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) album: String,
    pub(crate) comment: String,
    pub(crate) genre: String,
    pub(crate) track: u32,
    pub(crate) disc: u32,
    pub(crate) year: u32,
    pub(crate) duration: u32,
    pub(crate) bitrate: u32,
    pub(crate) channels: u8,
    pub(crate) sample_rate: u32,
}
impl TryFrom<&Song> for SongRow {
    type Error = Error;
    fn try_from(song: &Song) -> Result<Self, Self::Error> {
        Ok(Self {
            id: song.id,
            path: path_to_text(&song.path)?,
            folder_id: song.folder_id,
            artist_id: song.artist_id,
            album_id: song.album_id,
            art_id: song.art_id,
            file_size: size_to_row(song.file_size)?,
            last_modified: song.last_modified,
            file_type: song.file_type.code(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            album: song.album.clone(),
            comment: song.comment.clone(),
            genre: song.genre.clone(),
            track: song.track,
            disc: song.disc,
            year: song.year,
            duration: song.duration,
            bitrate: song.bitrate,
            channels: song.channels,
            sample_rate: song.sample_rate,
        })
    }
}
impl TryFrom<SongRow> for Song {
    type Error = Error;
    fn try_from(row: SongRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            path: PathBuf::from(row.path),
            folder_id: row.folder_id,
            artist_id: row.artist_id,
            album_id: row.album_id,
            art_id: row.art_id,
            file_size: size_from_row(row.file_size)?,
            last_modified: row.last_modified,
            file_type: FileType::from_code(row.file_type).ok_or_raise(|| ErrorKind::InvalidData("file type"))?,
            title: row.title,
            artist: row.artist,
            album: row.album,
            comment: row.comment,
            genre: row.genre,
            track: row.track,
            disc: row.disc,
            year: row.year,
            duration: row.duration,
            bitrate: row.bitrate,
            channels: row.channels,
            sample_rate: row.sample_rate,
        })
    }
}

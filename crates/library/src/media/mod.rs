mod cache;

use crate::error::{ErrorKind, Result};
use crate::walk::{Entry, holds_files, normalize, walk};
use crate::{Context, Halt, MediaKind};
use exn::{OptionExt, ResultExt};
use futures::TryStreamExt;
use std::path::Path;
use std::time::Instant;
use tunedex_index::{Album, Art, Artist, FileType, Folder, Id, Song};
use tunedex_tags::Tags;

use self::cache::Cache;

/// What a media scan added or changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaReport {
    pub art: u64,
    pub artists: u64,
    pub albums: u64,
    pub songs: u64,
    /// Existing songs rewritten because their file changed.
    pub updated: u64,
    pub folders: u64,
}
impl MediaReport {
    /// Total number of changes; zero means the index was already up to date.
    pub fn total(&self) -> u64 {
        self.art + self.artists + self.albums + self.songs + self.updated + self.folders
    }
}

/// Index everything under `root` that the index doesn't know about yet.
///
/// Walks the tree depth-first, directories before their contents. Folders are
/// only recorded once they are known to hold files; audio files become songs
/// (creating their artist and album as needed) and images become cover art
/// for every song in the same folder. Songs whose file is newer than the
/// indexed copy are updated in place.
///
/// Fails without finishing on the first unreadable audio file, store error or
/// filesystem error, or once `halt` is set; records written up to that point
/// are kept.
pub async fn media_scan(ctx: &Context, root: impl AsRef<Path>, verbose: bool, halt: &Halt) -> Result<MediaReport> {
    let root = normalize(root.as_ref())?;
    let started = Instant::now();
    match verbose {
        true => tracing::info!(root = %root.display(), "Beginning media scan"),
        false => tracing::info!(root = %root.display(), "Scanning"),
    }

    let mut scan = MediaScan::new(ctx);
    let mut entries = std::pin::pin!(walk(root));
    loop {
        halt.check()?;
        let Some(entry) = entries.try_next().await? else { break };
        scan.visit(entry).await?;
    }
    scan.link_art().await?;

    let report = scan.report;
    if verbose {
        tracing::info!(elapsed = ?started.elapsed(), "Media scan complete");
        tracing::info!(
            art = report.art,
            artists = report.artists,
            albums = report.albums,
            songs = report.songs,
            folders = report.folders,
            "Added"
        );
        tracing::info!(songs = report.updated, "Updated");
    }
    Ok(report)
}

struct MediaScan<'a> {
    ctx: &'a Context,
    cache: Cache,
    report: MediaReport,
    /// (folder, art) pairs found during the walk, linked once it finishes.
    new_art: Vec<(Id, Id)>,
}
impl<'a> MediaScan<'a> {
    fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            cache: Cache::default(),
            report: MediaReport::default(),
            new_art: Vec::new(),
        }
    }

    async fn visit(&mut self, entry: Entry) -> Result<()> {
        let Some(folder_id) = self.folder(entry.folder()).await? else {
            return Ok(());
        };
        if entry.is_dir {
            return Ok(());
        }
        match self.ctx.extensions.classify(&entry.path) {
            Some(MediaKind::Art) => self.art(folder_id, &entry).await,
            Some(MediaKind::Audio) => self.song(folder_id, &entry).await,
            None => Ok(()),
        }
    }

    // =========================================================================
    // Folders
    // =========================================================================

    /// ID of the folder at `path`, creating it if it holds any files. `None`
    /// means the directory is empty and the entry should be skipped.
    async fn folder(&mut self, path: &Path) -> Result<Option<Id>> {
        if let Some(folder) = self.cache.folder(path) {
            return Ok(Some(folder.id));
        }
        let index = &self.ctx.index;
        let folder = match index.load_folder(path).await.or_raise(|| ErrorKind::Index)? {
            Some(folder) => folder,
            None => {
                if !holds_files(path).await.or_raise(|| ErrorKind::Filesystem(path.to_path_buf()))? {
                    return Ok(None);
                }
                let parent_id = match path.parent() {
                    Some(parent) => self.parent_id(parent).await?,
                    None => None,
                };
                let mut folder = Folder::new(path, parent_id);
                index.save_folder(&mut folder).await.or_raise(|| ErrorKind::Index)?;
                tracing::debug!(id = folder.id, path = %folder.path.display(), "Folder");
                self.report.folders += 1;
                folder
            },
        };
        let id = folder.id;
        self.cache.insert_folder(folder);
        Ok(Some(id))
    }

    async fn parent_id(&self, parent: &Path) -> Result<Option<Id>> {
        if let Some(folder) = self.cache.folder(parent) {
            return Ok(Some(folder.id));
        }
        let folder = self.ctx.index.load_folder(parent).await.or_raise(|| ErrorKind::Index)?;
        Ok(folder.map(|f| f.id))
    }

    // =========================================================================
    // Art
    // =========================================================================

    async fn art(&mut self, folder_id: Id, entry: &Entry) -> Result<()> {
        let index = &self.ctx.index;
        if index.load_art(&entry.path).await.or_raise(|| ErrorKind::Index)?.is_some() {
            return Ok(());
        }
        // Empty files can't be served.
        if entry.size == 0 {
            tracing::debug!(path = %entry.path.display(), "Skipping empty art");
            return Ok(());
        }
        let mut art = Art::new(&entry.path, entry.size, entry.modified);
        index.save_art(&mut art).await.or_raise(|| ErrorKind::Index)?;
        self.report.art += 1;
        self.new_art.push((folder_id, art.id));
        Ok(())
    }

    /// Point every song in each folder that gained art at that art.
    async fn link_art(&mut self) -> Result<()> {
        let index = &self.ctx.index;
        for (folder_id, art_id) in self.new_art.drain(..) {
            for mut song in index.songs_for_folder(folder_id).await.or_raise(|| ErrorKind::Index)? {
                song.art_id = Some(art_id);
                index.update_song(&song).await.or_raise(|| ErrorKind::Index)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Songs
    // =========================================================================

    async fn song(&mut self, folder_id: Id, entry: &Entry) -> Result<()> {
        if entry.size == 0 {
            tracing::debug!(path = %entry.path.display(), "Skipping empty audio file");
            return Ok(());
        }
        let tags = self.ctx.tags.read(&entry.path).await.or_raise(|| ErrorKind::Tags(entry.path.clone()))?;
        let extension = entry.path.extension().map(|ext| ext.to_string_lossy()).unwrap_or_default();
        let file_type =
            FileType::from_extension(&extension).ok_or_raise(|| ErrorKind::UnsupportedFileType(extension.to_string()))?;
        let artist_id = self.artist(&tags.artist).await?;
        let album_id = self.album(artist_id, &tags).await?;
        let mut song = Song {
            id: 0,
            path: entry.path.clone(),
            folder_id,
            artist_id,
            album_id,
            art_id: None,
            file_size: entry.size,
            last_modified: entry.modified,
            file_type,
            duration: tags.duration_secs(),
            title: tags.title,
            artist: tags.artist,
            album: tags.album,
            comment: tags.comment,
            genre: tags.genre,
            track: tags.track,
            disc: tags.disc,
            year: tags.year,
            bitrate: tags.bitrate,
            channels: tags.channels,
            sample_rate: tags.sample_rate,
        };

        let index = &self.ctx.index;
        match index.load_song(&entry.path).await.or_raise(|| ErrorKind::Index)? {
            None => {
                index.save_song(&mut song).await.or_raise(|| ErrorKind::Index)?;
                self.report.songs += 1;
            },
            Some(existing) if song.last_modified > existing.last_modified => {
                song.id = existing.id;
                song.art_id = existing.art_id;
                index.update_song(&song).await.or_raise(|| ErrorKind::Index)?;
                tracing::debug!(id = song.id, path = %song.path.display(), "Updated song");
                self.report.updated += 1;
            },
            Some(_) => {},
        }
        Ok(())
    }

    async fn artist(&mut self, title: &str) -> Result<Id> {
        if let Some(artist) = self.cache.artist(title) {
            return Ok(artist.id);
        }
        let index = &self.ctx.index;
        let artist = match index.load_artist(title).await.or_raise(|| ErrorKind::Index)? {
            Some(artist) => artist,
            None => {
                let mut artist = Artist::new(title);
                index.save_artist(&mut artist).await.or_raise(|| ErrorKind::Index)?;
                tracing::debug!(id = artist.id, title = %artist.title, "Artist");
                self.report.artists += 1;
                artist
            },
        };
        let id = artist.id;
        self.cache.insert_artist(artist);
        Ok(id)
    }

    /// The album is created with the year of the first song seen for it.
    async fn album(&mut self, artist_id: Id, tags: &Tags) -> Result<Id> {
        if let Some(album) = self.cache.album(artist_id, &tags.album) {
            return Ok(album.id);
        }
        let index = &self.ctx.index;
        let album = match index.load_album(artist_id, &tags.album).await.or_raise(|| ErrorKind::Index)? {
            Some(album) => album,
            None => {
                let mut album = Album::new(artist_id, &tags.artist, &tags.album, tags.year);
                index.save_album(&mut album).await.or_raise(|| ErrorKind::Index)?;
                tracing::debug!(
                    id = album.id,
                    artist = %album.artist,
                    year = album.year,
                    title = %album.title,
                    "Album"
                );
                self.report.albums += 1;
                album
            },
        };
        let id = album.id;
        self.cache.insert_album(album);
        Ok(id)
    }
}

use crate::error::{ErrorKind, Result};
use crate::walk::{holds_files, normalize};
use crate::{Context, Halt};
use exn::ResultExt;
use std::io;
use std::path::Path;
use std::time::Instant;
use tokio::fs;
use tunedex_index::Repository;

/// What an orphan scan removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrphanReport {
    pub art: u64,
    pub artists: u64,
    pub albums: u64,
    pub songs: u64,
    pub folders: u64,
}
impl OrphanReport {
    /// Total number of records removed.
    pub fn total(&self) -> u64 {
        self.art + self.artists + self.albums + self.songs + self.folders
    }
}

/// Remove records whose files no longer exist.
///
/// 1. With a `base`, every art, song and folder record outside it is removed
///    without looking at the filesystem.
/// 2. Art, songs and folders inside `sub` (or `base` if there is no `sub`,
///    or the whole index if there is neither) are removed if their file is
///    gone. A folder is gone once it holds no files.
/// 3. Albums left without songs are removed, then artists left without
///    albums or songs.
///
/// Paths are compared by component: `/music` covers `/music/a.mp3` but not
/// `/music2/a.mp3`. Stops at the first store error or once `halt` is set,
/// keeping whatever was already removed.
pub async fn orphan_scan(
    ctx: &Context,
    base: Option<&Path>,
    sub: Option<&Path>,
    verbose: bool,
    halt: &Halt,
) -> Result<OrphanReport> {
    let base = base.map(normalize).transpose()?;
    let sub = sub.map(normalize).transpose()?;
    let started = Instant::now();
    let mut scan = OrphanScan::new(&ctx.index, halt);

    if let Some(base) = &base {
        if verbose {
            tracing::info!(base = %base.display(), "Orphan scanning base folder");
        }
        scan.evict(base).await?;
    }

    let scope = sub.or(base);
    let shown = scope.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "<all>".to_string());
    match verbose {
        true => tracing::info!(path = %shown, "Orphan scanning subfolder"),
        false => tracing::info!(path = %shown, "Removing"),
    }
    halt.check()?;
    scan.verify_art(scope.as_deref()).await?;
    halt.check()?;
    scan.verify_songs(scope.as_deref()).await?;
    halt.check()?;
    scan.verify_folders(scope.as_deref()).await?;
    halt.check()?;
    scan.purge().await?;

    let report = scan.report;
    if verbose {
        tracing::info!(elapsed = ?started.elapsed(), "Orphan scan complete");
        tracing::info!(
            art = report.art,
            artists = report.artists,
            albums = report.albums,
            songs = report.songs,
            folders = report.folders,
            "Removed"
        );
    }
    Ok(report)
}

struct OrphanScan<'a> {
    index: &'a Repository,
    halt: &'a Halt,
    report: OrphanReport,
    /// Set the halt flag once this many records have been removed.
    #[cfg(test)]
    halt_after: Option<u64>,
}
impl<'a> OrphanScan<'a> {
    fn new(index: &'a Repository, halt: &'a Halt) -> Self {
        Self {
            index,
            halt,
            report: OrphanReport::default(),
            #[cfg(test)]
            halt_after: None,
        }
    }

    /// One if a record was removed.
    fn removed(&self, deleted: bool) -> u64 {
        #[cfg(test)]
        if let Some(after) = self.halt_after
            && deleted
            && self.report.total() + 1 >= after
        {
            self.halt.halt();
        }
        u64::from(deleted)
    }

    /// Remove everything outside `base`. Songs go before folders, which they
    /// reference.
    async fn evict(&mut self, base: &Path) -> Result<()> {
        let index = self.index;
        self.halt.check()?;
        for art in index.art_not_in_path(base).await.or_raise(|| ErrorKind::Index)? {
            self.halt.check()?;
            self.report.art += self.removed(index.delete_art(&art).await.or_raise(|| ErrorKind::Index)?);
        }
        self.halt.check()?;
        for song in index.songs_not_in_path(base).await.or_raise(|| ErrorKind::Index)? {
            self.halt.check()?;
            self.report.songs += self.removed(index.delete_song(&song).await.or_raise(|| ErrorKind::Index)?);
        }
        self.halt.check()?;
        for folder in index.folders_not_in_path(base).await.or_raise(|| ErrorKind::Index)? {
            self.halt.check()?;
            self.report.folders += self.removed(index.delete_folder(&folder).await.or_raise(|| ErrorKind::Index)?);
        }
        Ok(())
    }

    async fn verify_art(&mut self, scope: Option<&Path>) -> Result<()> {
        let index = self.index;
        let art = match scope {
            Some(path) => index.art_in_path(path).await,
            None => index.list_art().await,
        }
        .or_raise(|| ErrorKind::Index)?;
        for art in art {
            self.halt.check()?;
            if is_missing(&art.path).await {
                self.report.art += self.removed(index.delete_art(&art).await.or_raise(|| ErrorKind::Index)?);
            }
        }
        Ok(())
    }

    async fn verify_songs(&mut self, scope: Option<&Path>) -> Result<()> {
        let index = self.index;
        let songs = match scope {
            Some(path) => index.songs_in_path(path).await,
            None => index.list_songs().await,
        }
        .or_raise(|| ErrorKind::Index)?;
        for song in songs {
            self.halt.check()?;
            if is_missing(&song.path).await {
                self.report.songs += self.removed(index.delete_song(&song).await.or_raise(|| ErrorKind::Index)?);
            }
        }
        Ok(())
    }

    async fn verify_folders(&mut self, scope: Option<&Path>) -> Result<()> {
        let index = self.index;
        let folders = match scope {
            Some(path) => index.folders_in_path(path).await,
            None => index.list_folders().await,
        }
        .or_raise(|| ErrorKind::Index)?;
        for folder in folders {
            self.halt.check()?;
            let empty = match holds_files(&folder.path).await {
                Ok(holds) => !holds,
                Err(err) if err.kind() == io::ErrorKind::NotFound => true,
                Err(err) => return Err(err).or_raise(|| ErrorKind::Filesystem(folder.path.clone())),
            };
            if empty {
                self.report.folders += self.removed(index.delete_folder(&folder).await.or_raise(|| ErrorKind::Index)?);
            }
        }
        Ok(())
    }

    /// Remove albums, then artists, that nothing refers to any more.
    async fn purge(&mut self) -> Result<()> {
        self.report.albums += self.index.purge_orphan_albums().await.or_raise(|| ErrorKind::Index)?;
        self.halt.check()?;
        self.report.artists += self.index.purge_orphan_artists().await.or_raise(|| ErrorKind::Index)?;
        Ok(())
    }
}

/// Whether the file at `path` is definitely gone. Files that can't be checked
/// are kept.
async fn is_missing(path: &Path) -> bool {
    match fs::try_exists(path).await {
        Ok(exists) => !exists,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Cannot check file; keeping its record");
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_scan;
    use crate::testing::{Library, StubReader, song};
    use std::fs as sync_fs;
    use tunedex_index::Totals;

    async fn index(library: &Library, root: &Path) {
        media_scan(&library.ctx, root, false, &Halt::new()).await.unwrap();
    }

    async fn orphans(library: &Library, base: Option<&Path>, sub: Option<&Path>) -> Result<OrphanReport> {
        orphan_scan(&library.ctx, base, sub, false, &Halt::new()).await
    }

    /// `music/ArtistA/Album1/{track1.mp3,cover.jpg}` and `music/ArtistB/Album2/track2.mp3`.
    async fn library() -> Library {
        let library = Library::new().await;
        library.write("music/ArtistA/Album1/track1.mp3", &song("ArtistA", "Album1", "One"));
        library.write("music/ArtistA/Album1/cover.jpg", "jpeg");
        library.write("music/ArtistB/Album2/track2.mp3", &song("ArtistB", "Album2", "Two"));
        index(&library, &library.root()).await;
        library
    }

    #[tokio::test]
    async fn test_unchanged_tree_removes_nothing() {
        let library = library().await;
        let root = library.root();
        assert_eq!(orphans(&library, Some(root.as_path()), None).await.unwrap(), OrphanReport::default());
        assert_eq!(orphans(&library, None, None).await.unwrap().total(), 0);
    }

    #[tokio::test]
    async fn test_base_evicts_everything_outside_it() {
        let library = library().await;
        library.write("elsewhere/Other/track.mp3", &song("ArtistC", "Album3", "Three"));
        library.write("elsewhere/Other/folder.png", "png");
        // Shares a prefix with the base, but is not inside it.
        library.write("music2/track.mp3", &song("ArtistA", "Album1", "Stray"));
        index(&library, &library.path("elsewhere")).await;
        index(&library, &library.path("music2")).await;
        let before = library.ctx.index.totals().await.unwrap();

        let root = library.root();
        let report = orphans(&library, Some(root.as_path()), None).await.unwrap();
        assert_eq!(
            report,
            OrphanReport {
                art: 1,
                artists: 1,
                albums: 1,
                songs: 2,
                folders: 3
            }
        );

        let index = &library.ctx.index;
        assert_eq!(
            index.totals().await.unwrap(),
            Totals {
                folders: before.folders - 3,
                artists: 2,
                albums: 2,
                songs: 2,
                art: 1
            }
        );
        assert!(index.folders_not_in_path(&root).await.unwrap().is_empty());
        assert!(index.songs_not_in_path(&root).await.unwrap().is_empty());
        assert!(index.art_not_in_path(&root).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_subtree_cascades() {
        let library = library().await;
        sync_fs::remove_dir_all(library.path("music/ArtistA")).unwrap();

        let root = library.root();
        let sub = library.path("music/ArtistA");
        let report = orphans(&library, Some(root.as_path()), Some(sub.as_path())).await.unwrap();
        assert_eq!(
            report,
            OrphanReport {
                art: 1,
                artists: 1,
                albums: 1,
                songs: 1,
                folders: 2
            }
        );

        let index = &library.ctx.index;
        assert!(index.load_artist("ArtistA").await.unwrap().is_none());
        assert!(index.load_artist("ArtistB").await.unwrap().is_some());
        assert!(index.load_folder(&root).await.unwrap().is_some());
        assert_eq!(index.list_songs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sub_limits_verification() {
        let library = library().await;
        sync_fs::remove_file(library.path("music/ArtistA/Album1/track1.mp3")).unwrap();
        sync_fs::remove_file(library.path("music/ArtistB/Album2/track2.mp3")).unwrap();

        let sub = library.path("music/ArtistB");
        let report = orphans(&library, None, Some(sub.as_path())).await.unwrap();
        // ArtistA's song is outside the subtree and survives, stale or not.
        assert_eq!(report.songs, 1);
        assert_eq!(report.folders, 2);
        assert_eq!(report.albums, 1);
        assert_eq!(report.artists, 1);
        assert!(library.ctx.index.load_song(library.path("music/ArtistA/Album1/track1.mp3")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_no_paths_verifies_whole_index() {
        let library = library().await;
        sync_fs::remove_file(library.path("music/ArtistA/Album1/cover.jpg")).unwrap();

        let report = orphans(&library, None, None).await.unwrap();
        assert_eq!(report, OrphanReport { art: 1, ..OrphanReport::default() });
        let song = library.ctx.index.load_song(library.path("music/ArtistA/Album1/track1.mp3")).await.unwrap();
        assert_eq!(song.unwrap().art_id, None);
    }

    #[tokio::test]
    async fn test_folder_left_with_only_directories_is_removed() {
        let library = library().await;
        sync_fs::remove_file(library.path("music/ArtistB/Album2/track2.mp3")).unwrap();

        let report = orphans(&library, None, None).await.unwrap();
        // The directories are still on disk, but hold no files.
        assert!(library.path("music/ArtistB/Album2").is_dir());
        assert_eq!(report.songs, 1);
        assert_eq!(report.folders, 2);
    }

    #[tokio::test]
    async fn test_halt_stops_before_any_deletion() {
        let library = library().await;
        sync_fs::remove_dir_all(library.path("music/ArtistA")).unwrap();
        let before = library.ctx.index.totals().await.unwrap();

        let halt = Halt::new();
        halt.halt();
        let root = library.root();
        let err = orphan_scan(&library.ctx, Some(root.as_path()), None, true, &halt).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Halted));
        assert_eq!(library.ctx.index.totals().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_halt_mid_phase_keeps_earlier_deletions() {
        let library = library().await;
        let tracks = [library.path("music/ArtistA/Album1/track1.mp3"), library.path("music/ArtistB/Album2/track2.mp3")];
        for track in &tracks {
            sync_fs::remove_file(track).unwrap();
        }

        let halt = Halt::new();
        let mut scan = OrphanScan { halt_after: Some(1), ..OrphanScan::new(&library.ctx.index, &halt) };
        let err = scan.verify_songs(None).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Halted));
        assert_eq!(scan.report, OrphanReport { songs: 1, ..OrphanReport::default() });

        let index = &library.ctx.index;
        let left = index.list_songs().await.unwrap();
        assert_eq!(left.len(), 1);
        assert!(tracks.contains(&left[0].path));
        assert_eq!(index.list_albums().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_media_then_orphan_round_trip() {
        let library = Library::with_reader(StubReader::default()).await;
        let track = library.write("music/a/track.mp3", &song("A", "B", "C"));
        index(&library, &library.root()).await;
        sync_fs::remove_file(&track).unwrap();

        let root = library.root();
        let report = orphan_scan(&library.ctx, Some(root.as_path()), None, true, &Halt::new()).await.unwrap();
        assert_eq!(report.total(), 5);
        assert_eq!(library.ctx.index.totals().await.unwrap(), Totals::default());
    }
}

//! Fixtures shared by the scan tests.
//!
//! Audio files in test trees are plain text of `key=value` lines that
//! [`StubReader`] turns into [`Tags`], so no real audio is needed. Empty
//! files, and files containing the line `broken`, fail to read.

use crate::{Context, Halt};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tunedex_index::Database;
use tunedex_tags::error::{ErrorKind as TagErrorKind, Result as TagResult};
use tunedex_tags::{TagReader, Tags};

#[derive(Default)]
pub(crate) struct StubReader {
    reads: AtomicUsize,
    /// Set the halt flag once this many files have been read.
    halt_after: Option<(usize, Halt)>,
}
impl StubReader {
    pub(crate) fn halting_after(reads: usize, halt: Halt) -> Self {
        Self { reads: AtomicUsize::new(0), halt_after: Some((reads, halt)) }
    }
}

#[async_trait]
impl TagReader for StubReader {
    async fn read(&self, path: &Path) -> TagResult<Tags> {
        let reads = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, halt)) = &self.halt_after
            && reads >= *after
        {
            halt.halt();
        }
        let Ok(contents) = fs::read_to_string(path) else {
            exn::bail!(TagErrorKind::Io(path.to_path_buf()));
        };
        if contents.is_empty() {
            exn::bail!(TagErrorKind::Format(path.to_path_buf()));
        }
        let mut tags = Tags {
            duration: Duration::from_secs(200),
            bitrate: 320,
            channels: 2,
            sample_rate: 44_100,
            ..Tags::default()
        };
        for line in contents.lines() {
            let Some((key, value)) = line.split_once('=') else {
                if line.trim() == "broken" {
                    exn::bail!(TagErrorKind::Format(path.to_path_buf()));
                }
                continue;
            };
            match key.trim() {
                "title" => tags.title = value.trim().to_string(),
                "artist" => tags.artist = value.trim().to_string(),
                "album" => tags.album = value.trim().to_string(),
                "year" => tags.year = value.trim().parse().unwrap_or_default(),
                "track" => tags.track = value.trim().parse().unwrap_or_default(),
                _ => {},
            }
        }
        Ok(tags)
    }
}

/// Contents of a stub audio file.
pub(crate) fn song(artist: &str, album: &str, title: &str) -> String {
    format!("artist={artist}\nalbum={album}\ntitle={title}\nyear=2004\ntrack=1\n")
}

/// A music directory on disk plus an empty in-memory index.
pub(crate) struct Library {
    dir: TempDir,
    pub(crate) ctx: Context,
}
impl Library {
    pub(crate) async fn new() -> Self {
        Self::with_reader(StubReader::default()).await
    }

    pub(crate) async fn with_reader(reader: StubReader) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("music")).unwrap();
        let index = Database::connect_in_memory().await.unwrap().repository();
        Self { dir, ctx: Context::new(index, Arc::new(reader)) }
    }

    /// The library root, `music/` inside the temporary directory.
    pub(crate) fn root(&self) -> PathBuf {
        self.path("music")
    }

    pub(crate) fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file (creating its parents) relative to the temporary directory.
    pub(crate) fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    pub(crate) fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Move a file's modification time forward.
    pub(crate) fn touch(&self, path: &Path, ahead: Duration) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + ahead).unwrap();
    }
}

//! Depth-first walk of a directory tree.

use crate::error::{ErrorKind, Result};
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tokio::fs;

/// A file or directory found by [`walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) path: PathBuf,
    pub(crate) is_dir: bool,
    /// Bytes; zero for directories.
    pub(crate) size: u64,
    /// Unix timestamp (seconds).
    pub(crate) modified: i64,
}
impl Entry {
    fn new(path: PathBuf, metadata: &Metadata) -> Self {
        let is_dir = metadata.is_dir();
        Self {
            path,
            is_dir,
            size: match is_dir {
                true => 0,
                false => metadata.len(),
            },
            modified: metadata.modified().map(|t| OffsetDateTime::from(t).unix_timestamp()).unwrap_or_default(),
        }
    }

    /// The directory this entry belongs to: itself if it is one.
    pub(crate) fn folder(&self) -> &Path {
        match self.is_dir {
            true => &self.path,
            false => self.path.parent().unwrap_or(&self.path),
        }
    }
}

/// Absolute form of `path` with `.` components, repeated separators and any
/// trailing separator removed. Symlinks are not resolved, so the result
/// matches the paths the index already holds for the same tree.
pub(crate) fn normalize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).or_raise(|| ErrorKind::Filesystem(path.to_path_buf()))?;
    Ok(absolute.components().collect())
}

/// Yield `root` and everything below it, each directory before its contents
/// and siblings ordered by file name.
///
/// The root may be a symlink; below it, symlinks, special files and names
/// that aren't valid UTF-8 are skipped. The stream ends after the first
/// error.
pub(crate) fn walk(root: PathBuf) -> impl Stream<Item = Result<Entry>> {
    stream! {
        let root = match fs::metadata(&root).await {
            Ok(metadata) if metadata.is_dir() || metadata.is_file() => Entry::new(root, &metadata),
            Ok(_) => return,
            Err(err) => {
                yield Err(err).or_raise(|| ErrorKind::Filesystem(root.clone()));
                return;
            },
        };
        let mut stack = vec![root];
        while let Some(entry) = stack.pop() {
            let dir = entry.is_dir.then(|| entry.path.clone());
            yield Ok(entry);
            // Listed only once the consumer asks for the next entry, so a
            // halted scan doesn't read ahead.
            let Some(dir) = dir else { continue };
            match children(&dir).await {
                // Reversed so the first child is popped first.
                Ok(children) => stack.extend(children.into_iter().rev()),
                Err(err) => {
                    yield Err(err);
                    return;
                },
            }
        }
    }
}

async fn children(dir: &Path) -> Result<Vec<Entry>> {
    let raise = || ErrorKind::Filesystem(dir.to_path_buf());
    let mut entries = fs::read_dir(dir).await.or_raise(raise)?;
    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await.or_raise(raise)? {
        // The index stores paths as text.
        if entry.file_name().to_str().is_none() {
            tracing::warn!(path = %entry.path().display(), "Skipping path that isn't valid UTF-8");
            continue;
        }
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            // Deleted since the directory was listed.
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err).or_raise(|| ErrorKind::Filesystem(entry.path())),
        };
        if metadata.is_dir() || metadata.is_file() {
            children.push(Entry::new(entry.path(), &metadata));
        }
    }
    children.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(children)
}

/// Whether `dir` holds at least one non-directory entry, at any depth.
/// Entries [`walk`] skips for their name are ignored.
///
/// Fails with [`io::ErrorKind::NotFound`] only if `dir` itself is missing;
/// sub-directories that vanish mid-check count as empty.
pub(crate) async fn holds_files(dir: &Path) -> io::Result<bool> {
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        let mut entries = match fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound && current != dir => continue,
            Err(err) => return Err(err),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_str().is_none() {
                continue;
            }
            match entry.file_type().await?.is_dir() {
                true => stack.push(entry.path()),
                false => return Ok(true),
            }
        }
    }
    Ok(false)
}

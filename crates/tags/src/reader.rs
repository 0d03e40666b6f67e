use crate::error::{ErrorKind, Result};
use crate::{TagReader, Tags};
use async_trait::async_trait;
use exn::ResultExt;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// [`TagReader`] backed by `lofty`, supporting ID3, Vorbis comments, MP4
/// atoms and FLAC metadata blocks.
///
/// Decoding is synchronous, so each read runs on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyReader;

impl LoftyReader {
    fn read_blocking(path: &Path) -> Result<Tags> {
        let probe = Probe::open(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        let file = probe.read().or_raise(|| ErrorKind::Format(path.to_path_buf()))?;
        let properties = file.properties();
        let mut tags = Tags {
            duration: properties.duration(),
            bitrate: properties.audio_bitrate().unwrap_or_default(),
            channels: properties.channels().unwrap_or_default(),
            sample_rate: properties.sample_rate().unwrap_or_default(),
            ..Tags::default()
        };
        // Files commonly carry more than one tag format (ID3v1 next to ID3v2);
        // the primary one is the most complete.
        let Some(tag) = file.primary_tag().or_else(|| file.first_tag()) else {
            tracing::debug!(path = %path.display(), "No tags found in audio file");
            return Ok(tags);
        };
        tags.title = text(tag.title());
        tags.artist = text(tag.artist());
        tags.album = text(tag.album());
        tags.comment = text(tag.comment());
        tags.genre = text(tag.genre());
        tags.year = tag.year().unwrap_or_default();
        tags.track = tag.track().unwrap_or_default();
        tags.disc = tag.disk().unwrap_or_default();
        Ok(tags)
    }
}

fn text(value: Option<Cow<'_, str>>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

#[async_trait]
impl TagReader for LoftyReader {
    async fn read(&self, path: &Path) -> Result<Tags> {
        let path: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::read_blocking(&path)).await.or_raise(|| ErrorKind::Task)?
    }
}

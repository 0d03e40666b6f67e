//! Keeps the library index in step with the files on disk.
//!
//! Two entry points, usually run one after the other:
//!
//! - [`media_scan`] walks a directory tree and records every folder, song,
//!   artist, album and piece of cover art it hasn't seen before, updating
//!   songs whose files changed since the last scan.
//! - [`orphan_scan`] removes records whose files are gone, then the albums
//!   and artists that no longer have any songs.
//!
//! Both are cancelled cooperatively through a [`Halt`] handle. Whatever was
//! written before the halt stays written; a halted scan is simply re-run.

pub mod error;
mod extensions;
mod halt;
mod media;
mod orphan;
#[cfg(test)]
mod testing;
mod walk;

pub use crate::extensions::{Extensions, MediaKind};
pub use crate::halt::Halt;
pub use crate::media::{MediaReport, media_scan};
pub use crate::orphan::{OrphanReport, orphan_scan};

use std::sync::Arc;
use tunedex_index::Repository;
use tunedex_tags::TagReader;

/// Everything a scan needs besides its arguments.
#[derive(Clone)]
pub struct Context {
    pub index: Repository,
    pub tags: Arc<dyn TagReader>,
    pub extensions: Extensions,
}
impl Context {
    /// A context recognising the default audio and art extensions.
    pub fn new(index: Repository, tags: Arc<dyn TagReader>) -> Self {
        Self { index, tags, extensions: Extensions::default() }
    }

    pub fn with_extensions(self, extensions: Extensions) -> Self {
        Self { extensions, ..self }
    }
}

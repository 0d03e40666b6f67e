//! Audio tag extraction.
//!
//! The scanner only needs a path in and a [`Tags`] out; [`TagReader`] is the
//! seam that lets tests swap the real decoder for something that doesn't need
//! binary fixtures.

pub mod error;
mod reader;
mod tags;

pub use crate::reader::LoftyReader;
pub use crate::tags::Tags;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait TagReader: Send + Sync {
    /// Read the tags and audio properties of the file at `path`.
    ///
    /// A readable file without any tags is not an error: every text field is
    /// left empty and every number zero.
    async fn read(&self, path: &Path) -> Result<Tags>;
}

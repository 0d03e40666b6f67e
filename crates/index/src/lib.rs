//! SQLite index of the music library.
//!
//! The index is a cache of what the scanner has observed on disk; the files
//! themselves are the source of truth. Deleting the database and re-running a
//! media scan rebuilds it.
//!
//! # Records
//! - **Folders**: directories holding at least one file, keyed by path and
//!   linked to their parent folder.
//! - **Artists** and **Albums**: keyed by title, and by (artist, title).
//! - **Songs**: audio files keyed by path, referencing their folder, artist,
//!   album and (optionally) the cover art of their folder.
//! - **Art**: image files keyed by path.

mod db;
pub mod error;
pub mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::{Album, Art, Artist, FileType, Folder, Id, Song};
pub use crate::repo::{Repository, Totals};

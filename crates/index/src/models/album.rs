use crate::models::Id;

/// An album, identified by its artist and exact title.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Album {
    pub id: Id,
    pub artist_id: Id,
    /// Artist title, copied for display.
    pub artist: String,
    pub title: String,
    pub year: u32,
}
impl Album {
    /// A new, unsaved album belonging to an already-saved artist.
    pub fn new(artist_id: Id, artist: impl Into<String>, title: impl Into<String>, year: u32) -> Self {
        Self {
            id: 0,
            artist_id,
            artist: artist.into(),
            title: title.into(),
            year,
        }
    }
}

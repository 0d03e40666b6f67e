use crate::models::Id;

/// An artist, identified by the exact title found in song tags.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Artist {
    pub id: Id,
    pub title: String,
}
impl Artist {
    /// A new, unsaved artist.
    pub fn new(title: impl Into<String>) -> Self {
        Self { id: 0, title: title.into() }
    }
}

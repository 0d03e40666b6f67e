use std::time::Duration;

/// Metadata read from an audio file.
///
/// Missing tags are represented by empty strings and zeroes rather than
/// `Option`s; that is how they end up stored in the index anyway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub comment: String,
    pub genre: String,
    pub year: u32,
    pub track: u32,
    pub disc: u32,
    pub duration: Duration,
    /// Kilobits per second.
    pub bitrate: u32,
    pub channels: u8,
    /// Hertz.
    pub sample_rate: u32,
}
impl Tags {
    /// Duration rounded down to whole seconds, saturating at `u32::MAX`.
    pub fn duration_secs(&self) -> u32 {
        u32::try_from(self.duration.as_secs()).unwrap_or(u32::MAX)
    }
}

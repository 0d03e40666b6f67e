use derive_more::Display;

/// Audio container formats the index knows how to describe.
///
/// The numeric code is what gets stored against each song; it must never be
/// renumbered once released.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    #[display("flac")]
    Flac = 1,
    #[display("mp3")]
    Mp3 = 2,
    #[display("ogg")]
    Ogg = 3,
    #[display("m4a")]
    M4a = 4,
}

impl FileType {
    pub const ALL: [FileType; 4] = [Self::Flac, Self::Mp3, Self::Ogg, Self::M4a];

    /// Look up a file type by extension (without the leading dot),
    /// ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|file_type| extension.eq_ignore_ascii_case(file_type.extension()))
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|file_type| file_type.code() == code)
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::M4a => "m4a",
        }
    }
}

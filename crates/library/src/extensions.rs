use std::collections::BTreeSet;
use std::path::Path;

const DEFAULT_AUDIO_EXTENSIONS: [&str; 4] = ["flac", "mp3", "ogg", "m4a"];
const DEFAULT_ART_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// What a scan does with a file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Art,
}

/// File extensions (without the dot) that scans pick up. Matching ignores
/// case; everything else on disk is left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    audio: BTreeSet<String>,
    art: BTreeSet<String>,
}
impl Default for Extensions {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIO_EXTENSIONS, DEFAULT_ART_EXTENSIONS)
    }
}
impl Extensions {
    pub fn new<A, B>(audio: impl IntoIterator<Item = A>, art: impl IntoIterator<Item = B>) -> Self
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let normalize = |ext: &str| ext.trim_start_matches('.').to_ascii_lowercase();
        Self {
            audio: audio.into_iter().map(|ext| normalize(ext.as_ref())).collect(),
            art: art.into_iter().map(|ext| normalize(ext.as_ref())).collect(),
        }
    }

    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        // Audio wins if an extension was configured as both.
        match (self.audio.contains(&extension), self.art.contains(&extension)) {
            (true, _) => Some(MediaKind::Audio),
            (false, true) => Some(MediaKind::Art),
            (false, false) => None,
        }
    }
}

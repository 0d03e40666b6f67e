//! Configuration for tunedex.
//!
//! Values are merged from, lowest priority first:
//!
//! 1. Built-in defaults.
//! 2. A config file: TOML, YAML or JSON depending on its extension. Either
//!    given explicitly, or `config.toml` in the platform config directory if
//!    one exists there.
//! 3. Environment variables prefixed `TUNEDEX_`, with `__` separating nested
//!    keys (`TUNEDEX_LIBRARY__ROOT=/srv/music`).
//!
//! ```toml
//! database = "/var/lib/tunedex/index.sqlite3"
//! verbose = true
//!
//! [library]
//! root = "/srv/music"
//! audio_extensions = ["flac", "mp3", "ogg", "m4a"]
//! art_extensions = ["jpg", "jpeg", "png"]
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "TUNEDEX_";
const APPLICATION: &str = "tunedex";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub library: LibraryConfig,
    /// SQLite database holding the index.
    pub database: PathBuf,
    /// Log per-scan counts and timings.
    pub verbose: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            library: LibraryConfig::default(),
            database: Self::default_database(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory to scan. Commands that take a path on the command line
    /// don't need it.
    pub root: Option<PathBuf>,
    /// Extensions (without the dot) indexed as songs.
    pub audio_extensions: Vec<String>,
    /// Extensions (without the dot) indexed as cover art.
    pub art_extensions: Vec<String>,
}
impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: None,
            audio_extensions: ["flac", "mp3", "ogg", "m4a"].map(String::from).to_vec(),
            art_extensions: ["jpg", "jpeg", "png"].map(String::from).to_vec(),
        }
    }
}

impl Config {
    /// Load and validate configuration from every source.
    ///
    /// `file` must exist if given. Without it, the default config file is
    /// read if present.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(file)?)
    }

    /// The merged sources, before extraction.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        let file = match file {
            Some(file) if !file.is_file() => exn::bail!(ErrorKind::Missing(file.to_path_buf())),
            Some(file) => Some(file.to_path_buf()),
            None => Self::default_file().filter(|file| file.is_file()),
        };
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "Reading config file");
            let extension = file.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(&file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(&file)),
                Some("json") => figment.merge(Json::file(&file)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(file)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// `config.toml` in the platform config directory.
    pub fn default_file() -> Option<PathBuf> {
        ProjectDirs::from("", "", APPLICATION).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn default_database() -> PathBuf {
        match ProjectDirs::from("", "", APPLICATION) {
            Some(dirs) => dirs.data_dir().join("tunedex.sqlite3"),
            None => PathBuf::from("tunedex.sqlite3"),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(root) = &self.library.root
            && !root.is_absolute()
        {
            exn::bail!(ErrorKind::Invalid(format!("library.root must be absolute: {}", root.display())));
        }
        let audio = normalized(&self.library.audio_extensions);
        let art = normalized(&self.library.art_extensions);
        if audio.is_empty() {
            exn::bail!(ErrorKind::Invalid("library.audio_extensions is empty".to_string()));
        }
        if art.is_empty() {
            exn::bail!(ErrorKind::Invalid("library.art_extensions is empty".to_string()));
        }
        if let Some(both) = audio.intersection(&art).next() {
            exn::bail!(ErrorKind::Invalid(format!("extension is both audio and art: {both}")));
        }
        Ok(())
    }
}

fn normalized(extensions: &[String]) -> BTreeSet<String> {
    extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

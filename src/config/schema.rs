use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub catalog: CatalogSettings,
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Where the album folders are served from.
    pub base_url: String,
    /// Listing and metadata request timeout (milliseconds), body included.
    /// Also bounds connecting for audio downloads.
    pub timeout_ms: u64,
    /// Whole-download timeout for audio files; unbounded when unset.
    pub audio_timeout_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5500/".to_string(),
            timeout_ms: 10_000,
            audio_timeout_ms: None,
            user_agent: concat!("encore/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// How a folder's tracks are listed.
    pub tracks: TrackListing,
    /// How album folders are discovered.
    pub albums: AlbumListing,
    /// Album folders to show when `albums = "static"`.
    pub folders: Vec<String>,
    /// Folder holding one sub-folder per album.
    pub root: String,
    /// File extensions treated as audio by the directory-listing strategy
    /// (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            tracks: TrackListing::Manifest,
            albums: AlbumListing::DirectoryListing,
            folders: Vec::new(),
            root: "songs".to_string(),
            extensions: vec!["mp3".into()],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackListing {
    #[serde(alias = "json", alias = "songs-json")]
    Manifest,
    #[serde(alias = "directory_listing", alias = "listing", alias = "scrape")]
    DirectoryListing,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlbumListing {
    #[serde(alias = "list", alias = "fixed")]
    Static,
    #[serde(alias = "directory_listing", alias = "listing", alias = "scrape")]
    DirectoryListing,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume slider position at startup (0-100).
    pub initial_volume: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { initial_volume: 100 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start the next track (wrapping) when one finishes.
    pub auto_advance: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Seek bar step for `H` / `L`, in percent of the track.
    pub seek_step: u8,
    /// Volume slider step for `-` / `+`.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the playlist sidebar starts expanded.
    pub sidebar_open: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ encore ~ ".to_string(),
            sidebar_open: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub enabled: bool,
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. Defaults to `<state dir>/encore/encore.log`.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}

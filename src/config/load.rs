use std::{env, path::PathBuf};

use url::Url;

use super::schema::{AlbumListing, Settings};

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `ENCORE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ENCORE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("catalog.folders")
                .with_list_parse_key("catalog.extensions"),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if let Err(e) = Url::parse(&self.server.base_url) {
            return Err(format!("server.base_url is not a valid URL: {e}"));
        }
        if self.audio.initial_volume > 100 {
            return Err("audio.initial_volume must be between 0 and 100".to_string());
        }
        if self.controls.seek_step == 0 || self.controls.volume_step == 0 {
            return Err("controls.seek_step and controls.volume_step must be >= 1".to_string());
        }
        if self.catalog.albums == AlbumListing::Static && self.catalog.folders.is_empty() {
            return Err("catalog.folders must not be empty when catalog.albums = \"static\"".to_string());
        }
        Ok(())
    }

    /// Log file to write to, if logging is enabled.
    pub fn log_file(&self) -> Option<PathBuf> {
        if !self.log.enabled {
            return None;
        }
        self.log
            .file
            .clone()
            .or_else(|| default_state_dir().map(|d| d.join("encore.log")))
    }
}

/// Resolve the config path from `ENCORE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/encore/config.toml`
/// or `~/.config/encore/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("encore").join("config.toml"))
}

/// `$XDG_STATE_HOME/encore` or `~/.local/state/encore`.
pub fn default_state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("state"))
    } else {
        None
    };

    state_home.map(|d| d.join("encore"))
}

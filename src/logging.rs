//! File logging through `tracing-subscriber`.
//!
//! The terminal belongs to the TUI, so log lines go to a file instead of
//! stderr. `RUST_LOG` overrides the configured level.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Settings;

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Returns the log file in use, or `None` when
/// logging is disabled or the file cannot be opened.
pub fn init_logging(settings: &Settings) -> Option<PathBuf> {
    let path = settings.log_file()?;
    let file = match open_log_file(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("encore: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&settings.log.level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    match installed {
        Ok(()) => Some(path),
        Err(_) => None,
    }
}

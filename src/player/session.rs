use crate::catalog::{decode_reference, track_from_source};

use super::time::format_time;
use super::token::LoadToken;

/// Transport state of the single audio output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Icon shown on a playlist row and on the main transport button.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowIcon {
    Play,
    Pause,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VolumeIcon {
    Volume,
    Mute,
}

/// What the seek bar and the two time labels show.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    /// Seek bar position, 0-100.
    pub seek_value: f64,
    pub current: String,
    pub total: String,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            seek_value: 0.0,
            current: "00:00".to_string(),
            total: "00:00".to_string(),
        }
    }
}

/// Everything the player knows about what is loaded and how it sounds.
#[derive(Debug)]
pub struct PlayerSession {
    pub(super) folder: Option<String>,
    pub(super) playlist: Vec<String>,
    /// `/<folder>/<encoded track>` of the loaded (or loading) track.
    pub(super) source: Option<String>,
    pub(super) transport: Transport,
    /// Load request not yet confirmed by the output.
    pub(super) pending: Option<LoadToken>,
    /// Load request whose audio is currently in the output.
    pub(super) loaded: Option<LoadToken>,
    /// Volume slider, 0-100.
    pub(super) volume: u8,
    pub(super) muted: bool,
    pub(super) position: f64,
    /// NaN while unknown.
    pub(super) duration: f64,
    pub(super) progress: Progress,
}

impl PlayerSession {
    pub(super) fn new(volume: u8) -> Self {
        Self {
            folder: None,
            playlist: Vec::new(),
            source: None,
            transport: Transport::Stopped,
            pending: None,
            loaded: None,
            volume: volume.min(100),
            muted: false,
            position: 0.0,
            duration: f64::NAN,
            progress: Progress::default(),
        }
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn playlist(&self) -> &[String] {
        &self.playlist
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn loaded(&self) -> Option<LoadToken> {
        self.loaded
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Volume actually sent to the output, 0.0-1.0.
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            f32::from(self.volume) / 100.0
        }
    }

    /// Index of the loaded track in the playlist.
    ///
    /// The source suffix after `/<folder>/` is decoded and compared against the
    /// decoded playlist entries.
    pub fn current_index(&self) -> Option<usize> {
        let folder = self.folder.as_deref()?;
        let source = self.source.as_deref()?;
        let current = track_from_source(folder, source)?;
        self.playlist
            .iter()
            .position(|t| decode_reference(t) == current.as_str())
    }

    /// Icon of playlist row `index`: "pause" only on the playing track.
    pub fn row_icon(&self, index: usize) -> RowIcon {
        if self.transport == Transport::Playing && self.current_index() == Some(index) {
            RowIcon::Pause
        } else {
            RowIcon::Play
        }
    }

    /// Icon of the main transport button.
    pub fn main_icon(&self) -> RowIcon {
        if self.transport == Transport::Playing {
            RowIcon::Pause
        } else {
            RowIcon::Play
        }
    }

    pub fn volume_icon(&self) -> VolumeIcon {
        if self.effective_volume() == 0.0 {
            VolumeIcon::Mute
        } else {
            VolumeIcon::Volume
        }
    }

    pub(super) fn reset_position(&mut self) {
        self.position = 0.0;
        self.progress.seek_value = 0.0;
    }

    pub(super) fn update_progress(&mut self, position: f64, duration: f64) {
        self.position = position;
        self.duration = duration;
        if duration.is_nan() {
            return;
        }
        self.progress.seek_value = if duration.is_finite() && duration > 0.0 {
            (position / duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.progress.current = format_time(position);
        self.progress.total = format_time(duration);
    }
}

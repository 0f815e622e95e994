//! Commands, events and the shared playback snapshot of the audio thread.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::player::LoadToken;

#[derive(Debug)]
pub enum AudioCmd {
    /// Fetch `source` from the server and start it, unless `token` is stale
    /// by the time the bytes arrive.
    Load { token: LoadToken, source: String },
    /// Resume the loaded track.
    Play,
    Pause,
    /// Drop the loaded track.
    Stop,
    /// Jump to an absolute position in the loaded track.
    Seek(Duration),
    /// Output volume, 0.0-1.0.
    SetVolume(f32),
    /// Stop playback and leave the thread.
    Quit,
}

/// What the audio thread reports back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Started { token: LoadToken },
    Failed { token: LoadToken, reason: String },
    /// The loaded track played to its end.
    Ended { token: LoadToken },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Load request whose audio is in the sink.
    pub token: Option<LoadToken>,
    pub position: Duration,
    /// `None` until the container or decoder reports a length.
    pub duration: Option<Duration>,
}

impl PlaybackInfo {
    pub fn position_secs(&self) -> f64 {
        self.position.as_secs_f64()
    }

    /// Duration in seconds, NaN while unknown.
    pub fn duration_secs(&self) -> f64 {
        self.duration.map_or(f64::NAN, |d| d.as_secs_f64())
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

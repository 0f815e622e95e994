//! Transport controller: play/pause/next/previous/seek/volume over one output.

use std::time::Duration;

use crate::catalog::{source_for, track_from_source};

use super::session::{PlayerSession, Transport};
use super::token::{LoadToken, LoadTokens};

/// The audio output the controller drives.
///
/// Calls are fire-and-forget; the output reports back through
/// [`TransportController::on_started`], [`TransportController::on_failed`] and
/// [`TransportController::on_ended`].
pub trait AudioOutput {
    /// Fetch and start `source`, unless `token` has been superseded by then.
    fn load(&self, token: LoadToken, source: &str);
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn seek(&self, position: Duration);
    /// Output volume, 0.0-1.0.
    fn set_volume(&self, volume: f32);
}

pub struct TransportController<O: AudioOutput> {
    session: PlayerSession,
    output: O,
    tokens: LoadTokens,
}

impl<O: AudioOutput> TransportController<O> {
    /// `tokens` must be shared with the output so it can drop superseded loads.
    pub fn new(output: O, tokens: LoadTokens, initial_volume: u8) -> Self {
        let session = PlayerSession::new(initial_volume);
        output.set_volume(session.effective_volume());
        Self {
            session,
            output,
            tokens,
        }
    }

    pub fn session(&self) -> &PlayerSession {
        &self.session
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Replace the playlist wholesale with `tracks` from `folder`.
    ///
    /// Whatever is playing keeps playing; it just no longer belongs to the
    /// visible playlist unless the folder is the same.
    pub fn replace_playlist(&mut self, folder: String, tracks: Vec<String>) {
        tracing::info!(folder = %folder, count = tracks.len(), "playlist replaced");
        self.session.folder = Some(folder);
        self.session.playlist = tracks;
    }

    /// Select `track` from the current folder.
    ///
    /// Selecting the track that is already playing pauses it. Anything else
    /// stops the output, rewinds and requests a fresh load.
    pub fn select_track(&mut self, track: &str) {
        let Some(folder) = self.session.folder.clone() else {
            tracing::warn!(track, "track selected without a folder");
            return;
        };
        let source = source_for(&folder, track);

        if self.session.source.as_deref() == Some(source.as_str())
            && self.session.transport == Transport::Playing
        {
            self.output.pause();
            self.session.transport = Transport::Paused;
            return;
        }

        if self.session.source.is_some() {
            self.output.stop();
        }
        self.session.reset_position();
        self.session.transport = Transport::Stopped;
        self.session.loaded = None;

        let token = self.tokens.issue();
        self.session.pending = Some(token);
        self.session.source = Some(source.clone());
        tracing::debug!(?token, %source, "requesting load");
        self.output.load(token, &source);
    }

    /// Main play/pause button.
    ///
    /// Returns `false` when nothing is loaded, leaving the choice of what to
    /// start to the caller.
    pub fn toggle_play_pause(&mut self) -> bool {
        match self.session.transport {
            Transport::Playing => {
                self.output.pause();
                self.session.transport = Transport::Paused;
                true
            }
            Transport::Paused => {
                self.output.play();
                self.session.transport = Transport::Playing;
                true
            }
            Transport::Stopped => {
                if self.session.pending.is_some() {
                    return true;
                }
                let track = match (self.session.folder.as_deref(), self.session.source.as_deref()) {
                    (Some(folder), Some(source)) => track_from_source(folder, source),
                    _ => None,
                };
                match track {
                    Some(track) => {
                        self.select_track(&track);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    pub fn next(&mut self) {
        self.step(true);
    }

    pub fn previous(&mut self) {
        self.step(false);
    }

    fn step(&mut self, forward: bool) {
        let len = self.session.playlist.len();
        if self.session.folder.is_none() || len == 0 {
            return;
        }
        let target = match self.session.current_index() {
            Some(i) if forward => (i + 1) % len,
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        let track = self.session.playlist[target].clone();
        self.select_track(&track);
    }

    /// Manual scrub to `value` percent of the current duration. Ignored while
    /// stopped, since nothing is left in the output to seek.
    pub fn seek_percent(&mut self, value: f64) {
        let duration = self.session.duration;
        if self.session.transport == Transport::Stopped
            || !duration.is_finite()
            || duration <= 0.0
            || value.is_nan()
        {
            return;
        }
        let value = value.clamp(0.0, 100.0);
        let position = value / 100.0 * duration;
        self.output.seek(Duration::from_secs_f64(position));
        self.session.position = position;
        self.session.progress.seek_value = value;
    }

    /// Periodic playback progress, in seconds. `duration` is NaN while unknown.
    pub fn on_progress(&mut self, position: f64, duration: f64) {
        self.session.update_progress(position, duration);
    }

    /// Volume slider moved to `value` (0-100). Moving the slider un-mutes.
    pub fn set_volume(&mut self, value: u8) {
        self.session.volume = value.min(100);
        self.session.muted = false;
        self.output.set_volume(self.session.effective_volume());
    }

    /// Mute toggle; the slider value is kept and restored on un-mute.
    pub fn toggle_mute(&mut self) {
        self.session.muted = !self.session.muted;
        self.output.set_volume(self.session.effective_volume());
    }

    /// The output started playing the request identified by `token`.
    pub fn on_started(&mut self, token: LoadToken) {
        if self.session.pending != Some(token) {
            tracing::debug!(?token, "ignoring start of a superseded load");
            return;
        }
        self.session.pending = None;
        self.session.loaded = Some(token);
        self.session.transport = Transport::Playing;
        tracing::info!(source = ?self.session.source, "playback started");
    }

    /// The output could not start the request identified by `token`.
    pub fn on_failed(&mut self, token: LoadToken, reason: &str) {
        if self.session.pending != Some(token) {
            tracing::debug!(?token, reason, "ignoring failure of a superseded load");
            return;
        }
        self.session.pending = None;
        self.session.transport = Transport::Stopped;
        tracing::warn!(source = ?self.session.source, reason, "could not start playback");
    }

    /// The loaded track played to its end. Returns whether `token` was the
    /// loaded track; a track only ends once.
    pub fn on_ended(&mut self, token: LoadToken) -> bool {
        if self.session.loaded != Some(token) {
            return false;
        }
        self.session.loaded = None;
        self.session.transport = Transport::Stopped;
        true
    }
}

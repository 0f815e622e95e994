use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::catalog::Fetch;
use crate::player::{AudioOutput, LoadToken, LoadTokens};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioEvent, PlaybackHandle, PlaybackInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<AudioEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. `tokens` must be the same counter the
    /// transport controller issues load tokens from.
    pub fn new(fetcher: Arc<dyn Fetch>, tokens: LoadTokens) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events) = mpsc::channel::<AudioEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle =
            spawn_audio_thread(rx, events_tx, playback_info.clone(), fetcher, tokens);

        Self {
            tx,
            events,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    /// Next pending event from the audio thread, without blocking.
    pub fn try_event(&self) -> Option<AudioEvent> {
        self.events.try_recv().ok()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    fn send_or_log(&self, cmd: AudioCmd) {
        if let Err(err) = self.send(cmd) {
            tracing::warn!(cmd = ?err.0, "audio thread is gone");
        }
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn quit(&self) {
        let _ = self.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl AudioOutput for AudioPlayer {
    fn load(&self, token: LoadToken, source: &str) {
        self.send_or_log(AudioCmd::Load {
            token,
            source: source.to_string(),
        });
    }

    fn play(&self) {
        self.send_or_log(AudioCmd::Play);
    }

    fn pause(&self) {
        self.send_or_log(AudioCmd::Pause);
    }

    fn stop(&self) {
        self.send_or_log(AudioCmd::Stop);
    }

    fn seek(&self, position: Duration) {
        self.send_or_log(AudioCmd::Seek(position));
    }

    fn set_volume(&self, volume: f32) {
        self.send_or_log(AudioCmd::SetVolume(volume));
    }
}

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::catalog::Fetch;
use crate::error::PlaybackError;
use crate::player::{LoadToken, LoadTokens};

use super::sink::create_sink;
use super::types::{AudioCmd, AudioEvent, PlaybackHandle, PlaybackInfo};

const TICK: Duration = Duration::from_millis(100);

/// Bytes fetched by a worker for one load request.
struct Fetched {
    token: LoadToken,
    result: Result<Vec<u8>, PlaybackError>,
}

/// The track currently in the sink.
struct Loaded {
    token: LoadToken,
    sink: Sink,
    ended: bool,
}

/// Fetch `source` for `token`, or `None` if a newer load was requested first.
pub(super) fn fetch_source(
    fetcher: &dyn Fetch,
    tokens: &LoadTokens,
    token: LoadToken,
    source: &str,
) -> Option<Result<Vec<u8>, PlaybackError>> {
    if !tokens.is_current(token) {
        return None;
    }
    let result = fetcher.get_bytes(source).map_err(PlaybackError::from);
    tokens.is_current(token).then_some(result)
}

fn open_stream() -> Result<OutputStream, PlaybackError> {
    let mut stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| PlaybackError::NoOutput(e.to_string()))?;
    // rodio logs to stderr when the stream is dropped, which garbles the TUI.
    stream.log_on_drop(false);
    Ok(stream)
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    playback_info: PlaybackHandle,
    fetcher: Arc<dyn Fetch>,
    tokens: LoadTokens,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match open_stream() {
            Ok(stream) => Some(stream),
            Err(err) => {
                tracing::error!(%err, "audio output unavailable, playback disabled");
                None
            }
        };

        let (fetched_tx, fetched_rx) = mpsc::channel::<Fetched>();
        let mut loaded: Option<Loaded> = None;
        let mut volume = 1.0_f32;

        let publish = |f: &dyn Fn(&mut PlaybackInfo)| {
            if let Ok(mut info) = playback_info.lock() {
                f(&mut info);
            }
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { token, source } => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        publish(&|info| *info = PlaybackInfo::default());

                        let fetcher = fetcher.clone();
                        let tokens = tokens.clone();
                        let tx = fetched_tx.clone();
                        thread::spawn(move || {
                            match fetch_source(fetcher.as_ref(), &tokens, token, &source) {
                                Some(result) => {
                                    let _ = tx.send(Fetched { token, result });
                                }
                                None => tracing::debug!(?token, %source, "load superseded"),
                            }
                        });
                    }
                    AudioCmd::Play => {
                        if let Some(l) = loaded.as_ref() {
                            l.sink.play();
                        }
                    }
                    AudioCmd::Pause => {
                        if let Some(l) = loaded.as_ref() {
                            l.sink.pause();
                        }
                    }
                    AudioCmd::Stop => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        publish(&|info| *info = PlaybackInfo::default());
                    }
                    AudioCmd::Seek(position) => {
                        if let Some(l) = loaded.as_mut() {
                            match l.sink.try_seek(position) {
                                Ok(()) => {
                                    // Seeking an exhausted sink succeeds but plays nothing.
                                    l.ended = l.ended && l.sink.empty();
                                    publish(&|info| info.position = position);
                                }
                                Err(err) => tracing::warn!(?position, %err, "seek failed"),
                            }
                        }
                    }
                    AudioCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        if let Some(l) = loaded.as_ref() {
                            l.sink.set_volume(volume);
                        }
                    }
                    AudioCmd::Quit => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            while let Ok(Fetched { token, result }) = fetched_rx.try_recv() {
                if !tokens.is_current(token) {
                    tracing::debug!(?token, "dropping superseded audio");
                    continue;
                }
                let started = result.and_then(|bytes| match stream.as_ref() {
                    Some(stream) => create_sink(stream, bytes, volume),
                    None => Err(PlaybackError::NoOutput("no stream".to_string())),
                });
                let event = match started {
                    Ok((sink, duration)) => {
                        sink.play();
                        if let Some(old) = loaded.replace(Loaded {
                            token,
                            sink,
                            ended: false,
                        }) {
                            old.sink.stop();
                        }
                        publish(&|info| {
                            *info = PlaybackInfo {
                                token: Some(token),
                                position: Duration::ZERO,
                                duration,
                            }
                        });
                        AudioEvent::Started { token }
                    }
                    Err(err) => AudioEvent::Failed {
                        token,
                        reason: err.to_string(),
                    },
                };
                let _ = events.send(event);
            }

            if let Some(l) = loaded.as_mut() {
                let position = l.sink.get_pos();
                publish(&|info| info.position = position);
                if !l.ended && !l.sink.is_paused() && l.sink.empty() {
                    l.ended = true;
                    let _ = events.send(AudioEvent::Ended { token: l.token });
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryFetcher;

    #[test]
    fn fetch_returns_bytes_for_the_current_token() {
        let fetcher = MemoryFetcher::default().with("/songs/A/x.mp3", vec![1u8, 2, 3]);
        let tokens = LoadTokens::new();
        let t = tokens.issue();

        let bytes = fetch_source(&fetcher, &tokens, t, "/songs/A/x.mp3")
            .expect("token is current")
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn superseded_tokens_are_not_fetched() {
        let fetcher = MemoryFetcher::default().with("/songs/A/x.mp3", vec![1u8]);
        let tokens = LoadTokens::new();
        let stale = tokens.issue();
        tokens.issue();

        assert!(fetch_source(&fetcher, &tokens, stale, "/songs/A/x.mp3").is_none());
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn fetch_failures_become_playback_errors() {
        let fetcher = MemoryFetcher::default();
        let tokens = LoadTokens::new();
        let t = tokens.issue();

        let result = fetch_source(&fetcher, &tokens, t, "/songs/A/missing.mp3").unwrap();
        assert!(matches!(result, Err(PlaybackError::Fetch(_))));
    }
}

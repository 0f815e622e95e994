//! Turning fetched bytes into a playing `rodio` sink.

use std::io::Cursor;
use std::time::Duration;

use lofty::prelude::*;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

/// Length of the audio in `bytes` according to its container headers.
pub(super) fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    let duration = tagged.properties().duration();
    (!duration.is_zero()).then_some(duration)
}

pub(super) fn decode(bytes: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, PlaybackError> {
    Ok(Decoder::new(Cursor::new(bytes))?)
}

/// A paused sink on `stream` holding `bytes`, plus the best known duration.
pub(super) fn create_sink(
    stream: &OutputStream,
    bytes: Vec<u8>,
    volume: f32,
) -> Result<(Sink, Option<Duration>), PlaybackError> {
    let probed = probe_duration(&bytes);
    let source = decode(bytes)?;
    let duration = probed.or_else(|| source.total_duration());

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}

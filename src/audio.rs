//! Audio output: a dedicated thread owning the `rodio` stream and sink.
//!
//! The UI talks to it through [`AudioPlayer`], which implements
//! [`crate::player::AudioOutput`], and hears back through [`AudioEvent`]s and
//! the shared [`PlaybackHandle`].

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, AudioEvent, PlaybackHandle, PlaybackInfo};

#[cfg(test)]
mod tests;

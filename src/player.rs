//! Player session state and the transport controller driving the audio output.
//!
//! The controller owns the only [`PlayerSession`]; the UI reads it by
//! reference and never mutates it directly.

mod session;
mod time;
mod token;
mod transport;

pub use session::{PlayerSession, Progress, RowIcon, Transport, VolumeIcon};
pub use time::format_time;
pub use token::{LoadToken, LoadTokens};
pub use transport::{AudioOutput, TransportController};

//! Application module: the view model the TUI renders and the runtime drives.
//!
//! `App` holds album cards, playlist rows, cursors and the search state.
//! Playback state lives in [`crate::player::PlayerSession`], not here.

mod filter;
mod model;

pub use filter::{album_matches, matches_query, row_matches};
pub use model::*;

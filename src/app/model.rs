//! Application model types: `App`, `Focus` and `TrackRow`.

use crate::catalog::{Album, TrackName};
use crate::config::UiSettings;

use super::filter::{album_matches, row_matches};

/// Which pane receives cursor keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Albums,
    Tracks,
}

/// One playlist row: the raw reference plus its parsed display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    pub raw: String,
    pub name: TrackName,
}

impl TrackRow {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            name: TrackName::from_reference(raw),
        }
    }
}

/// The main application model.
pub struct App {
    pub albums: Vec<Album>,
    /// Still waiting on album metadata.
    pub albums_loading: bool,
    pub rows: Vec<TrackRow>,
    /// Folder the rows came from.
    pub playlist_folder: Option<String>,
    pub playlist_loading: bool,

    /// Index into `albums`.
    pub album_cursor: usize,
    /// Index into `rows`.
    pub track_cursor: usize,
    pub focus: Focus,

    pub search_mode: bool,
    /// Text being typed in the search box.
    pub search_input: String,
    /// Query currently applied to both panes.
    pub query: String,

    pub sidebar_open: bool,
    pub header_text: String,
    /// Last notice for the footer (load failures and the like).
    pub status: Option<String>,
}

impl App {
    pub fn new(ui: &UiSettings) -> Self {
        Self {
            albums: Vec::new(),
            albums_loading: true,
            rows: Vec::new(),
            playlist_folder: None,
            playlist_loading: false,

            album_cursor: 0,
            track_cursor: 0,
            focus: Focus::Albums,

            search_mode: false,
            search_input: String::new(),
            query: String::new(),

            sidebar_open: ui.sidebar_open,
            header_text: ui.header_text.clone(),
            status: None,
        }
    }

    /// Append an album card as soon as its metadata arrives.
    pub fn push_album(&mut self, album: Album) {
        self.albums.push(album);
        self.ensure_cursors_visible();
    }

    /// Replace the playlist rows with `tracks` from `folder`.
    pub fn set_playlist_rows(&mut self, folder: &str, tracks: &[String]) {
        self.rows = tracks.iter().map(|t| TrackRow::new(t)).collect();
        self.playlist_folder = Some(folder.to_string());
        self.playlist_loading = false;
        self.track_cursor = 0;
    }

    /// Indices of album cards matching the applied query.
    pub fn visible_albums(&self) -> Vec<usize> {
        self.albums
            .iter()
            .enumerate()
            .filter(|(_, a)| album_matches(a, &self.query))
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of playlist rows matching the applied query.
    pub fn visible_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| row_matches(r, &self.query))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn selected_album(&self) -> Option<&Album> {
        if self.visible_albums().contains(&self.album_cursor) {
            self.albums.get(self.album_cursor)
        } else {
            None
        }
    }

    pub fn selected_row(&self) -> Option<&TrackRow> {
        if self.visible_rows().contains(&self.track_cursor) {
            self.rows.get(self.track_cursor)
        } else {
            None
        }
    }

    /// Move the focused cursor to the next visible entry, wrapping around.
    pub fn next(&mut self) {
        match self.focus {
            Focus::Albums => {
                self.album_cursor = step(&self.visible_albums(), self.album_cursor, true);
            }
            Focus::Tracks => {
                self.track_cursor = step(&self.visible_rows(), self.track_cursor, true);
            }
        }
    }

    /// Move the focused cursor to the previous visible entry, wrapping around.
    pub fn prev(&mut self) {
        match self.focus {
            Focus::Albums => {
                self.album_cursor = step(&self.visible_albums(), self.album_cursor, false);
            }
            Focus::Tracks => {
                self.track_cursor = step(&self.visible_rows(), self.track_cursor, false);
            }
        }
    }

    /// Put the track cursor on `index`, e.g. to follow playback.
    pub fn set_track_cursor(&mut self, index: usize) {
        if index < self.rows.len() {
            self.track_cursor = index;
        }
    }

    /// Switch panes. The track pane is unreachable while the sidebar is closed.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Albums if self.sidebar_open => Focus::Tracks,
            _ => Focus::Albums,
        };
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
        if !self.sidebar_open {
            self.focus = Focus::Albums;
        }
    }

    /// Start typing a query, pre-filled with the applied one.
    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
        self.search_input = self.query.clone();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    /// Apply the typed query to both panes.
    pub fn submit_search(&mut self) {
        self.search_mode = false;
        self.query = self.search_input.clone();
        self.ensure_cursors_visible();
    }

    /// Drop the typed and the applied query; everything is visible again.
    pub fn clear_search(&mut self) {
        self.search_mode = false;
        self.search_input.clear();
        self.query.clear();
        self.ensure_cursors_visible();
    }

    /// Keep each cursor on a visible entry, moving it to the first one if needed.
    fn ensure_cursors_visible(&mut self) {
        let albums = self.visible_albums();
        if !albums.contains(&self.album_cursor) {
            self.album_cursor = albums.first().copied().unwrap_or(0);
        }
        let rows = self.visible_rows();
        if !rows.contains(&self.track_cursor) {
            self.track_cursor = rows.first().copied().unwrap_or(0);
        }
    }
}

/// Neighbour of `current` in `visible`, wrapping at both ends.
/// A cursor outside `visible` lands on the first entry.
fn step(visible: &[usize], current: usize, forward: bool) -> usize {
    if visible.is_empty() {
        return current;
    }
    let len = visible.len();
    match visible.iter().position(|&i| i == current) {
        Some(p) if forward => visible[(p + 1) % len],
        Some(0) => visible[len - 1],
        Some(p) => visible[p - 1],
        None => visible[0],
    }
}

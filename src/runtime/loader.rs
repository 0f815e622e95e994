//! Background catalog loading on short-lived worker threads.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::catalog::{
    Album, AlbumDirectory, Fetch, TrackSource, album_directory_for, load_albums, load_tracks,
    track_source_for,
};
use crate::config::CatalogSettings;
use crate::player::{LoadToken, LoadTokens};

/// What the loader workers report to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    AlbumLoaded(Album),
    AlbumsDone { count: usize },
    PlaylistLoaded {
        token: LoadToken,
        folder: String,
        tracks: Vec<String>,
    },
}

pub struct CatalogLoader {
    fetcher: Arc<dyn Fetch>,
    tracks: Arc<dyn TrackSource>,
    albums: Arc<dyn AlbumDirectory>,
    root: String,
    /// Playlist loads only; audio loads have their own counter.
    tokens: LoadTokens,
    tx: Sender<CatalogEvent>,
    rx: Receiver<CatalogEvent>,
}

impl CatalogLoader {
    pub fn new(fetcher: Arc<dyn Fetch>, settings: &CatalogSettings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            fetcher,
            tracks: Arc::from(track_source_for(settings)),
            albums: Arc::from(album_directory_for(settings)),
            root: settings.root.trim_matches('/').to_string(),
            tokens: LoadTokens::new(),
            tx,
            rx,
        }
    }

    /// Folder path (under the root) holding `album`'s tracks.
    pub fn track_folder(&self, album: &Album) -> String {
        album.track_folder(&self.root)
    }

    /// Load every album card, one event per album as it arrives.
    pub fn spawn_albums(&self) -> JoinHandle<()> {
        let fetcher = self.fetcher.clone();
        let albums = self.albums.clone();
        let root = self.root.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let count = load_albums(albums.as_ref(), fetcher.as_ref(), &root, |album| {
                let _ = tx.send(CatalogEvent::AlbumLoaded(album));
            });
            let _ = tx.send(CatalogEvent::AlbumsDone { count });
        })
    }

    /// Load the track list of `folder`, superseding any playlist load still
    /// in flight.
    pub fn spawn_playlist(&self, folder: String) -> LoadToken {
        let token = self.tokens.issue();
        let fetcher = self.fetcher.clone();
        let source = self.tracks.clone();
        let tokens = self.tokens.clone();
        let tx = self.tx.clone();
        tracing::debug!(?token, %folder, "loading playlist");
        thread::spawn(move || {
            let tracks = load_tracks(source.as_ref(), fetcher.as_ref(), &folder);
            if !tokens.is_current(token) {
                tracing::debug!(?token, %folder, "playlist load superseded");
                return;
            }
            let _ = tx.send(CatalogEvent::PlaylistLoaded {
                token,
                folder,
                tracks,
            });
        });
        token
    }

    /// Whether `token` is the most recent playlist request.
    pub fn is_current(&self, token: LoadToken) -> bool {
        self.tokens.is_current(token)
    }

    pub fn try_event(&self) -> Option<CatalogEvent> {
        self.rx.try_recv().ok()
    }
}

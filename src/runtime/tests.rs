use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event_loop::{handle_audio_event, handle_catalog_event, handle_key_event};
use super::loader::{CatalogEvent, CatalogLoader};
use crate::app::{App, Focus};
use crate::audio::AudioEvent;
use crate::catalog::{Album, MemoryFetcher};
use crate::config::{AlbumListing, CatalogSettings, Settings};
use crate::player::{AudioOutput, LoadToken, LoadTokens, Transport, TransportController};

#[derive(Default)]
struct FakeOutput {
    loads: RefCell<Vec<(LoadToken, String)>>,
}

impl AudioOutput for FakeOutput {
    fn load(&self, token: LoadToken, source: &str) {
        self.loads.borrow_mut().push((token, source.to_string()));
    }
    fn play(&self) {}
    fn pause(&self) {}
    fn stop(&self) {}
    fn seek(&self, _position: Duration) {}
    fn set_volume(&self, _volume: f32) {}
}

struct Harness {
    settings: Settings,
    app: App,
    controller: TransportController<FakeOutput>,
    loader: CatalogLoader,
}

impl Harness {
    fn new() -> Self {
        let settings = Settings::default();
        let catalog = CatalogSettings {
            albums: AlbumListing::Static,
            folders: vec!["Anuv".into()],
            ..CatalogSettings::default()
        };
        Self {
            app: App::new(&settings.ui),
            controller: TransportController::new(FakeOutput::default(), LoadTokens::new(), 100),
            loader: CatalogLoader::new(Arc::new(MemoryFetcher::default()), &catalog),
            settings,
        }
    }

    fn key(&mut self, code: KeyCode) -> bool {
        handle_key_event(
            KeyEvent::new(code, KeyModifiers::NONE),
            &self.settings,
            &mut self.app,
            &mut self.controller,
            &self.loader,
        )
    }

    fn catalog(&mut self, event: CatalogEvent) {
        handle_catalog_event(event, &mut self.app, &mut self.controller, &self.loader);
    }

    fn audio(&mut self, event: AudioEvent) {
        handle_audio_event(event, &self.settings, &mut self.app, &mut self.controller);
    }

    /// Deliver a playlist as if the loader had fetched `folder`.
    fn playlist(&mut self, folder: &str, tracks: &[&str]) {
        let token = self.loader.spawn_playlist(folder.to_string());
        self.catalog(CatalogEvent::PlaylistLoaded {
            token,
            folder: folder.to_string(),
            tracks: tracks.iter().map(|t| t.to_string()).collect(),
        });
    }

    fn last_load(&self) -> (LoadToken, String) {
        self.controller
            .output()
            .loads
            .borrow()
            .last()
            .cloned()
            .expect("a load was requested")
    }

    fn start_last_load(&mut self) {
        let (token, _) = self.last_load();
        self.audio(AudioEvent::Started { token });
    }
}

#[test]
fn loaded_playlist_replaces_rows_and_autoplays_the_first_track() {
    let mut h = Harness::new();
    h.playlist("songs/Anuv", &["Baarishein - Anuv Jain.mp3", "Alag Aasmaan - Anuv Jain.mp3"]);

    assert_eq!(h.app.rows.len(), 2);
    assert_eq!(h.controller.session().playlist().len(), 2);
    let (_, source) = h.last_load();
    assert_eq!(source, "/songs/Anuv/Baarishein%20-%20Anuv%20Jain.mp3");

    h.start_last_load();
    assert_eq!(h.controller.session().transport(), Transport::Playing);

    // A different folder replaces the playlist and starts its first track.
    h.playlist("songs/Atif", &["Tere Bina - Atif Aslam.mp3"]);
    assert_eq!(h.app.rows.len(), 1);
    assert_eq!(h.controller.session().folder(), Some("songs/Atif"));
    let (_, source) = h.last_load();
    assert_eq!(source, "/songs/Atif/Tere%20Bina%20-%20Atif%20Aslam.mp3");
}

#[test]
fn superseded_playlists_are_dropped() {
    let mut h = Harness::new();
    let stale = h.loader.spawn_playlist("songs/Old".into());
    h.loader.spawn_playlist("songs/New".into());

    h.catalog(CatalogEvent::PlaylistLoaded {
        token: stale,
        folder: "songs/Old".into(),
        tracks: vec!["x.mp3".into()],
    });
    assert!(h.app.rows.is_empty());
    assert!(h.controller.output().loads.borrow().is_empty());
}

#[test]
fn empty_playlist_shows_a_notice_and_plays_nothing() {
    let mut h = Harness::new();
    h.playlist("songs/Empty", &[]);
    assert!(h.controller.output().loads.borrow().is_empty());
    assert!(h.app.status.as_deref().unwrap().contains("songs/Empty"));
}

#[test]
fn albums_are_added_as_they_arrive() {
    let mut h = Harness::new();
    h.catalog(CatalogEvent::AlbumLoaded(Album {
        folder: "Anuv".into(),
        title: "Anuv Jain".into(),
        description: String::new(),
        cover: "/songs/Anuv/cover.jpg".into(),
    }));
    assert_eq!(h.app.albums.len(), 1);
    assert!(h.app.albums_loading);

    h.catalog(CatalogEvent::AlbumsDone { count: 1 });
    assert!(!h.app.albums_loading);
    assert!(h.app.status.is_none());
}

#[test]
fn enter_on_a_track_row_plays_it_and_again_pauses_it() {
    let mut h = Harness::new();
    h.playlist("songs/Anuv", &["A - X.mp3", "B - Y.mp3"]);
    h.start_last_load();

    h.app.focus = Focus::Tracks;
    h.key(KeyCode::Char('j'));
    h.key(KeyCode::Enter);
    let (_, source) = h.last_load();
    assert_eq!(source, "/songs/Anuv/B%20-%20Y.mp3");
    h.start_last_load();
    assert_eq!(h.app.track_cursor, 1);

    h.key(KeyCode::Enter);
    assert_eq!(h.controller.session().transport(), Transport::Paused);
}

#[test]
fn space_toggles_and_falls_back_to_the_cursor_row() {
    let mut h = Harness::new();
    h.playlist("songs/Anuv", &["A - X.mp3"]);
    h.start_last_load();

    h.key(KeyCode::Char(' '));
    assert_eq!(h.controller.session().transport(), Transport::Paused);
    h.key(KeyCode::Char('p'));
    assert_eq!(h.controller.session().transport(), Transport::Playing);
}

#[test]
fn volume_keys_step_and_clamp() {
    let mut h = Harness::new();
    h.key(KeyCode::Char('+'));
    assert_eq!(h.controller.session().volume(), 100);
    h.key(KeyCode::Char('-'));
    assert_eq!(h.controller.session().volume(), 95);
    h.key(KeyCode::Char('m'));
    assert!(h.controller.session().is_muted());
    h.key(KeyCode::Char('-'));
    assert!(!h.controller.session().is_muted());
}

#[test]
fn search_keys_edit_then_apply_the_query() {
    let mut h = Harness::new();
    h.playlist("songs/Mix", &["Tum Hi Ho - Arijit Singh.mp3", "Baarishein - Anuv Jain.mp3"]);

    h.key(KeyCode::Char('/'));
    for c in "arijit".chars() {
        // Typed letters go to the search box, not to the transport.
        assert!(!h.key(KeyCode::Char(c)));
    }
    assert_eq!(h.app.visible_rows().len(), 2);
    h.key(KeyCode::Enter);
    assert_eq!(h.app.visible_rows(), vec![0]);

    h.key(KeyCode::Esc);
    assert_eq!(h.app.visible_rows().len(), 2);
}

#[test]
fn track_end_stops_unless_auto_advance_is_on() {
    let mut h = Harness::new();
    h.playlist("songs/Anuv", &["A.mp3", "B.mp3"]);
    h.start_last_load();
    let (token, _) = h.last_load();

    h.audio(AudioEvent::Ended { token });
    assert_eq!(h.controller.session().transport(), Transport::Stopped);
    assert_eq!(h.controller.output().loads.borrow().len(), 1);

    h.settings.playback.auto_advance = true;
    h.key(KeyCode::Char(' '));
    h.start_last_load();
    let (token, _) = h.last_load();
    h.audio(AudioEvent::Ended { token });
    let (_, source) = h.last_load();
    assert_eq!(source, "/songs/Anuv/B.mp3");
}

#[test]
fn seeking_a_finished_track_does_not_advance() {
    let mut h = Harness::new();
    h.playlist("songs/Anuv", &["A.mp3", "B.mp3"]);
    h.start_last_load();
    let (token, _) = h.last_load();
    h.controller.on_progress(200.0, 200.0);
    h.audio(AudioEvent::Ended { token });

    h.settings.playback.auto_advance = true;
    h.key(KeyCode::Char('L'));
    h.key(KeyCode::Char('H'));
    // The output may report the same end again after a seek on its empty sink.
    h.audio(AudioEvent::Ended { token });
    assert_eq!(h.controller.output().loads.borrow().len(), 1);
    assert_eq!(h.controller.session().transport(), Transport::Stopped);
}

#[test]
fn failed_playback_sets_a_notice() {
    let mut h = Harness::new();
    h.playlist("songs/Anuv", &["A.mp3"]);
    let (token, _) = h.last_load();
    h.audio(AudioEvent::Failed {
        token,
        reason: "status 404".into(),
    });
    assert_eq!(h.controller.session().transport(), Transport::Stopped);
    assert!(h.app.status.as_deref().unwrap().contains("404"));
}

#[test]
fn q_quits() {
    let mut h = Harness::new();
    assert!(h.key(KeyCode::Char('q')));
    assert!(!h.key(KeyCode::Char('x')));
}

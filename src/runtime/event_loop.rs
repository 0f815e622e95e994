use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Focus};
use crate::audio::{AudioEvent, AudioPlayer};
use crate::config;
use crate::player::{AudioOutput, TransportController};
use crate::runtime::loader::{CatalogEvent, CatalogLoader};
use crate::ui;

/// Main terminal event loop: handles input, drains worker events, forwards
/// playback progress and redraws. Returns `Ok(())` when quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut TransportController<AudioPlayer>,
    loader: &CatalogLoader,
) -> Result<(), Box<dyn std::error::Error>> {
    let playback = controller.output().playback_handle();

    loop {
        while let Some(ev) = loader.try_event() {
            handle_catalog_event(ev, app, controller, loader);
        }
        while let Some(ev) = controller.output().try_event() {
            handle_audio_event(ev, settings, app, controller);
        }

        // Only the loaded track's progress is meaningful.
        let snapshot = playback.lock().ok().map(|info| info.clone());
        if let Some(info) = snapshot {
            if info.token.is_some() && info.token == controller.session().loaded() {
                controller.on_progress(info.position_secs(), info.duration_secs());
            }
        }

        terminal.draw(|f| ui::draw(f, app, controller.session(), &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller, loader) {
                    break;
                }
            }
        }
    }

    controller.output().quit();
    Ok(())
}

pub(super) fn handle_catalog_event<O: AudioOutput>(
    event: CatalogEvent,
    app: &mut App,
    controller: &mut TransportController<O>,
    loader: &CatalogLoader,
) {
    match event {
        CatalogEvent::AlbumLoaded(album) => app.push_album(album),
        CatalogEvent::AlbumsDone { count } => {
            app.albums_loading = false;
            if count == 0 {
                app.status = Some("no albums found".to_string());
            }
        }
        CatalogEvent::PlaylistLoaded {
            token,
            folder,
            tracks,
        } => {
            if !loader.is_current(token) {
                tracing::debug!(?token, %folder, "dropping superseded playlist");
                return;
            }
            app.set_playlist_rows(&folder, &tracks);
            let first = tracks.first().cloned();
            controller.replace_playlist(folder.clone(), tracks);
            match first {
                Some(track) => {
                    app.status = None;
                    controller.select_track(&track);
                }
                None => {
                    tracing::warn!(%folder, "folder has no playable tracks");
                    app.status = Some(format!("no tracks in {folder}"));
                }
            }
        }
    }
}

pub(super) fn handle_audio_event<O: AudioOutput>(
    event: AudioEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut TransportController<O>,
) {
    match event {
        AudioEvent::Started { token } => {
            controller.on_started(token);
            // Follow playback while the visible playlist is the playing one.
            if app.playlist_folder.as_deref() == controller.session().folder() {
                if let Some(i) = controller.session().current_index() {
                    app.set_track_cursor(i);
                }
            }
        }
        AudioEvent::Failed { token, reason } => {
            let current = controller.session().is_loading();
            controller.on_failed(token, &reason);
            if current && !controller.session().is_loading() {
                app.status = Some(format!("could not play: {reason}"));
            }
        }
        AudioEvent::Ended { token } => {
            if controller.on_ended(token) && settings.playback.auto_advance {
                controller.next();
            }
        }
    }
}

/// Start the album under the album cursor: clear the search and fetch its
/// playlist.
fn open_selected_album(app: &mut App, loader: &CatalogLoader) {
    let Some(album) = app.selected_album().cloned() else {
        return;
    };
    app.clear_search();
    app.playlist_loading = true;
    loader.spawn_playlist(loader.track_folder(&album));
}

fn play_selected_row<O: AudioOutput>(app: &App, controller: &mut TransportController<O>) {
    if app.playlist_folder.as_deref() != controller.session().folder() {
        return;
    }
    if let Some(row) = app.selected_row() {
        controller.select_track(&row.raw);
    }
}

/// Handle one key press. Returns `true` when the user asked to quit.
pub(super) fn handle_key_event<O: AudioOutput>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut TransportController<O>,
    loader: &CatalogLoader,
) -> bool {
    if app.search_mode {
        match key.code {
            KeyCode::Esc => app.clear_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Enter => app.submit_search(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if !c.is_control() {
                    app.push_search_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    let controls = &settings.controls;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Esc => app.clear_search(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Char('b') => app.toggle_sidebar(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => match app.focus {
            Focus::Albums => open_selected_album(app, loader),
            Focus::Tracks => play_selected_row(app, controller),
        },
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            if !controller.toggle_play_pause() {
                play_selected_row(app, controller);
            }
        }
        KeyCode::Char('l') => controller.next(),
        KeyCode::Char('h') => controller.previous(),
        KeyCode::Char('L') => {
            let value = controller.session().progress().seek_value + f64::from(controls.seek_step);
            controller.seek_percent(value);
        }
        KeyCode::Char('H') => {
            let value = controller.session().progress().seek_value - f64::from(controls.seek_step);
            controller.seek_percent(value);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let volume = controller.session().volume().saturating_add(controls.volume_step);
            controller.set_volume(volume.min(100));
        }
        KeyCode::Char('-') => {
            let volume = controller.session().volume().saturating_sub(controls.volume_step);
            controller.set_volume(volume);
        }
        KeyCode::Char('m') => controller.toggle_mute(),
        _ => {}
    }
    false
}

//! UI rendering helpers for the terminal user interface.
//!
//! Everything is derived from `App` and the `PlayerSession` on every frame;
//! nothing here holds state of its own.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Focus};
use crate::catalog::TrackName;
use crate::config::ControlsSettings;
use crate::player::{PlayerSession, RowIcon, Transport, VolumeIcon};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("tab", "switch pane");
    map.insert("j/k", "up/down");
    map.insert("enter", "open album / play song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L and -/+ are filled in from config.
    map.insert("m", "mute");
    map.insert("/", "search");
    map.insert("b", "playlist");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    let order = [
        "tab", "j/k", "enter", "space/p", "h/l", "H/L", "-/+", "m", "/", "b", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{}%", controls.seek_step)),
            "-/+" => Some(format!("[-/+] volume -/+{}", controls.volume_step)),
            _ => CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}")),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn row_icon(icon: RowIcon) -> &'static str {
    match icon {
        RowIcon::Play => "▶",
        RowIcon::Pause => "⏸",
    }
}

fn volume_icon(icon: VolumeIcon) -> &'static str {
    match icon {
        VolumeIcon::Volume => "🔊",
        VolumeIcon::Mute => "🔇",
    }
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Slice of `total` entries that fits `height` rows with the selection
/// centered when possible. Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Title and artist of whatever the session has loaded.
fn now_playing_name(session: &PlayerSession) -> Option<TrackName> {
    let source = session.source()?;
    let file = source.rsplit('/').next()?;
    Some(TrackName::from_reference(file))
}

fn header_text(app: &App) -> Line<'_> {
    if app.search_mode {
        Line::from(vec![
            Span::raw("search: ").bold(),
            Span::raw(app.search_input.as_str()),
            Span::raw("_").slow_blink(),
        ])
    } else if !app.query.is_empty() {
        Line::from(vec![
            Span::raw(app.header_text.as_str()),
            Span::raw(format!("  [filter: {}]", app.query)).italic(),
        ])
    } else {
        Line::from(app.header_text.as_str())
    }
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn draw_playlist(frame: &mut Frame, area: Rect, app: &App, session: &PlayerSession) {
    let visible = app.visible_rows();
    let title = match (&app.playlist_folder, app.playlist_loading) {
        (_, true) => " playlist (loading...) ".to_string(),
        (Some(folder), false) => format!(" playlist: {folder} "),
        (None, false) => " playlist ".to_string(),
    };

    // The playlist belongs to the session only when it shows the session's folder.
    let same_folder = app.playlist_folder.as_deref() == session.folder();
    let sel_pos = visible
        .iter()
        .position(|&i| i == app.track_cursor)
        .unwrap_or(0);
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, sel) = visible_window(visible.len(), height, sel_pos);

    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .map(|&i| {
            let row = &app.rows[i];
            let icon = if same_folder {
                session.row_icon(i)
            } else {
                RowIcon::Play
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", row_icon(icon))),
                Span::raw(row.name.title.as_str()).bold(),
                Span::raw(" - "),
                Span::raw(row.name.artist.as_str()).dim(),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(focused_block(&title, app.focus == Focus::Tracks))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(sel));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_albums(frame: &mut Frame, area: Rect, app: &App) {
    let visible = app.visible_albums();
    let title = if app.albums_loading {
        " albums (loading...) "
    } else {
        " albums "
    };

    let sel_pos = visible
        .iter()
        .position(|&i| i == app.album_cursor)
        .unwrap_or(0);
    // Each card takes three lines.
    let height = (area.height.saturating_sub(2) / 3) as usize;
    let (start, end, sel) = visible_window(visible.len(), height, sel_pos);

    let items: Vec<ListItem> = visible[start..end]
        .iter()
        .map(|&i| {
            let album = &app.albums[i];
            ListItem::new(vec![
                Line::from(album.title.as_str()).bold(),
                Line::from(album.description.as_str()),
                Line::from(album.cover.as_str()).dim(),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(focused_block(title, app.focus == Focus::Albums))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(sel));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing(frame: &mut Frame, area: Rect, app: &App, session: &PlayerSession) {
    let state = if session.is_loading() {
        "Loading"
    } else {
        match session.transport() {
            Transport::Playing => "Playing",
            Transport::Paused => "Paused",
            Transport::Stopped => "Stopped",
        }
    };

    let mut spans = vec![Span::raw(format!("{} ", row_icon(session.main_icon())))];
    match now_playing_name(session) {
        Some(name) => {
            spans.push(Span::raw(name.title).bold());
            spans.push(Span::raw(" - "));
            spans.push(Span::raw(name.artist));
        }
        None => spans.push(Span::raw("nothing loaded").dim()),
    }
    spans.push(Span::raw(format!("  • {state}")));
    if let Some(status) = &app.status {
        spans.push(Span::raw(format!("  • {status}")).italic());
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(padded_block(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_gauges(frame: &mut Frame, area: Rect, session: &PlayerSession) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(area);

    let progress = session.progress();
    let seek = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" seek "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((progress.seek_value / 100.0).clamp(0.0, 1.0))
        .label(format!("{} / {}", progress.current, progress.total));
    frame.render_widget(seek, chunks[0]);

    let volume = session.volume();
    let vol = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" volume "))
        .gauge_style(Style::default().fg(if session.is_muted() {
            Color::DarkGray
        } else {
            Color::Green
        }))
        .ratio(f64::from(volume) / 100.0)
        .label(format!("{} {}", volume_icon(session.volume_icon()), volume));
    frame.render_widget(vol, chunks[1]);
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, session: &PlayerSession, controls: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(app))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    if app.sidebar_open {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        draw_playlist(frame, panes[0], app, session);
        draw_albums(frame, panes[1], app);
    } else {
        draw_albums(frame, chunks[1], app);
    }

    draw_now_playing(frame, chunks[2], app, session);
    draw_gauges(frame, chunks[3], session);

    let footer = Paragraph::new(controls_text(controls))
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_centers_the_selection() {
        assert_eq!(visible_window(5, 10, 3), (0, 5, 3));
        assert_eq!(visible_window(100, 10, 50), (45, 55, 5));
        assert_eq!(visible_window(100, 10, 98), (90, 100, 8));
        assert_eq!(visible_window(100, 10, 2), (0, 10, 2));
    }

    #[test]
    fn controls_text_uses_configured_steps() {
        let text = controls_text(&ControlsSettings {
            seek_step: 10,
            volume_step: 2,
        });
        assert!(text.contains("[H/L] seek -/+10%"));
        assert!(text.contains("[-/+] volume -/+2"));
        assert!(text.contains("[q] quit"));
    }
}

use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::logging;

mod event_loop;
mod loader;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut settings, warning) = settings::load_settings();
    let args: Vec<String> = env::args().skip(1).collect();
    settings::apply_cli_overrides(&mut settings, &args);

    let log_path = logging::init_logging(&settings);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "encore starting");
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }

    let startup::Components {
        mut app,
        mut controller,
        loader,
    } = startup::start(&settings)?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, &mut controller, &loader);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("encore stopped");
    run_result
}

//! linkdash TUI
//!
//! The dashboard: saved links drawn as a grid of tiles.
//!
//! ## Navigation
//!
//! - h/j/k/l or arrows: Move between tiles
//! - Enter / Space: Open the tile's URL (view mode) or edit it (edit mode)
//! - x / Delete: Delete the selected tile
//! - e: Toggle edit mode
//! - a: Add a link
//! - ?: Help
//! - q: Quit
//!
//! ## Link form
//!
//! - Tab: Switch between title and URL
//! - Enter: Save (only when both fields are filled)
//! - Esc: Cancel
//! - Ctrl-E: Toggle edit mode

mod app;
mod ui;

use std::fs::{File, OpenOptions};
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use linkdash_core::{Config, KeyValueStore};

use crate::output::{Output, OutputFormat};
use app::App;

/// How long to wait for a terminal event before checking timers
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Run the TUI application
pub fn run(config: &Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if LINKDASH_LOG is set)
    init_tui_logging(config);

    // Load before touching the terminal so open errors print normally
    let store = crate::commands::open_store(config, &Output::new(OutputFormat::Quiet))?;
    let mut app = App::new(store);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    if !app.is_durable() {
        eprintln!(
            "Warning: the last change was not saved: {}",
            app.dashboard.store().last_error().unwrap_or("storage error")
        );
    }

    result
}

fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        app.check_status_timeout();

        if app.take_redraw() {
            terminal.draw(|frame| {
                app.columns = ui::grid_columns(frame.area().width);
                ui::draw(frame, app);
            })?;
        }

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(_, _) => app.request_redraw(),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("Dashboard closed with {} link(s)", app.view().links.len());
    Ok(())
}

fn init_tui_logging(config: &Config) {
    // Only log if LINKDASH_LOG is set
    let Ok(log_level) = std::env::var("LINKDASH_LOG") else {
        return;
    };

    let log_path = config.log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory {:?}: {}", parent, e);
        }
    }

    let log_file: File = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "linkdash_core={},linkdash={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}

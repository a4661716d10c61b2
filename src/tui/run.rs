//! TUI main loop.
//!
//! This module provides the main entry point for running the interactive TUI.
//! It handles terminal setup, the event loop, and cleanup on exit.
//!
//! # Terminal Management
//!
//! The TUI takes over the terminal by:
//! - Enabling raw mode (unbuffered input, no echo)
//! - Entering the alternate screen buffer
//! - Hiding the cursor
//!
//! All these changes are reverted on exit, including on panic.
//!
//! # Event Loop
//!
//! 1. Pick up the latest committed snapshot of the live pipeline
//! 2. Render the current state
//! 3. Poll for a key press with a timeout and handle it
//! 4. Limit frame rate to ~60 FPS
//!
//! The matching settings are saved to the settings store on exit.

use std::fs;
use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use super::app::{Action, App};
use super::events::EventHandler;
use super::ui::render;
use crate::config::{Config, SettingsStore};
use crate::signal::install_handler;

/// Frame rate limit: 60 FPS = ~16.67ms per frame.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout: Use the frame duration for responsive rendering.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive view on `text` until the user quits.
///
/// `target` is the file written by the save key. The final matching
/// settings are stored in `store`; a failed save is logged, not returned.
///
/// # Errors
///
/// Returns `TuiError::Io` for terminal I/O errors and `TuiError::Event` for
/// event handling errors. The terminal is restored in every case.
pub fn run_tui(
    text: String,
    target: PathBuf,
    config: Config,
    store: Box<dyn SettingsStore>,
) -> TuiResult<()> {
    let mut app = App::new(text, &config, target);

    // Set up panic hook to restore terminal on panic. Panics on pipeline
    // threads are caught there and the TUI keeps running.
    let ui_thread = UiThread::current();
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if ui_thread.is_current() {
            let _ = restore_terminal();
            original_hook(panic_info);
        } else {
            log::debug!("Background thread panicked: {panic_info}");
        }
    }));

    let result = run_tui_inner(&mut app);

    // Restore the default panic hook
    let _ = panic::take_hook();

    match store.save(&app.config()) {
        Ok(()) => log::debug!("Settings saved ({})", app.settings()),
        Err(err) => log::warn!("Failed to save settings: {err}"),
    }

    result
}

fn run_tui_inner(app: &mut App) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, app);
    restore_terminal()?;
    result
}

fn event_loop(terminal: &mut Terminal, app: &mut App) -> TuiResult<()> {
    let event_handler = EventHandler::new();
    // Ctrl+C arrives as a key press in raw mode; the handler covers signals
    // sent from outside.
    let shutdown = install_handler().ok();
    let mut last_render = Instant::now();

    loop {
        if shutdown
            .as_ref()
            .is_some_and(|handler| handler.is_shutdown_requested())
        {
            log::info!("Shutdown signal received, exiting TUI");
            app.handle_action(Action::Quit);
        }

        if app.should_quit() {
            log::debug!("App requested quit");
            break;
        }

        app.refresh();
        terminal.draw(|frame| render(frame, app))?;

        if let Some(action) = event_handler.poll(POLL_TIMEOUT, app.mode())? {
            handle_action(app, action);
        }

        // Frame rate limiting
        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }

    log::info!("TUI exited normally");
    Ok(())
}

/// Handle a user action, performing file I/O the app state leaves to us.
fn handle_action(app: &mut App, action: Action) {
    let showing_error = app.error_message().is_some();
    let was_handled = app.handle_action(action);

    if action == Action::Save && !showing_error {
        save_text(app);
    } else if !was_handled {
        log::trace!("Action not handled: {action:?}");
    }
}

/// Write the current text to the target file.
fn save_text(app: &mut App) {
    match fs::write(app.target(), app.text()) {
        Ok(()) => {
            log::info!("Wrote {} bytes to {}", app.text().len(), app.target().display());
            app.mark_saved();
        }
        Err(err) => {
            let message = format!("Could not write {}: {err}", app.target().display());
            app.set_error(&message);
        }
    }
}

/// The thread that owns the terminal.
#[derive(Debug, Clone, Copy)]
struct UiThread(ThreadId);

impl UiThread {
    fn current() -> Self {
        Self(thread::current().id())
    }

    fn is_current(self) -> bool {
        thread::current().id() == self.0
    }
}

/// Set up the terminal for TUI mode.
fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal for TUI");

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    log::debug!("Restoring terminal");

    let _ = terminal::disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
    Ok(())
}

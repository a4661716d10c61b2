//! TUI event handling with crossterm.
//!
//! # Overview
//! This module reads keyboard input and translates it to actions:
//! - Scrolling (j/Down, k/Up, PgDn, PgUp)
//! - Matching settings (m, `[`, `]`, `-`, `+`, p)
//! - Actions (r remove, w save, ? help, q/Esc quit)
//!
//! Key meaning depends on the mode: inside the confirmation dialog only
//! y/Enter and n/Esc do something.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

use super::app::{Action, AppMode};

/// Error type for event handling.
#[derive(Debug, Error)]
pub enum EventError {
    /// Reading from the terminal failed.
    #[error("failed to read terminal event: {0}")]
    Read(#[from] std::io::Error),
}

/// Polls crossterm for key presses.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventHandler;

impl EventHandler {
    /// Create a new event handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wait up to `timeout` for a key press and resolve it for `mode`.
    ///
    /// Returns `Ok(None)` on timeout, for non-key events and for unbound keys.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Read`] if the terminal cannot be read.
    pub fn poll(&self, timeout: Duration, mode: AppMode) -> Result<Option<Action>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(resolve(&key, mode)),
            _ => Ok(None),
        }
    }
}

/// Resolve a key event to an action in `mode`.
///
/// Key release events are ignored (some terminals send these).
#[must_use]
pub fn resolve(key: &KeyEvent, mode: AppMode) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match mode {
        AppMode::Confirming => match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        AppMode::ShowingHelp => match key.code {
            KeyCode::Char('?') | KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        AppMode::Reviewing => match key.code {
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Char('m') => Some(Action::ToggleMode),
            KeyCode::Char('[') => Some(Action::DecreaseOffset),
            KeyCode::Char(']') => Some(Action::IncreaseOffset),
            KeyCode::Char('-') => Some(Action::DecreaseLength),
            KeyCode::Char('+' | '=') => Some(Action::IncreaseLength),
            KeyCode::Char('p') => Some(Action::CyclePolicy),
            KeyCode::Char('r') => Some(Action::Remove),
            KeyCode::Char('w') => Some(Action::Save),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
        AppMode::Quitting => None,
    }
}

/// Key hints shown in the footer for `mode`.
#[must_use]
pub fn footer_hints(mode: AppMode) -> &'static [(&'static str, &'static str)] {
    match mode {
        AppMode::Confirming => &[("y", "Remove"), ("n", "Cancel")],
        AppMode::ShowingHelp => &[("Esc", "Close")],
        AppMode::Reviewing | AppMode::Quitting => &[
            ("m", "Mode"),
            ("[ ]", "Offset"),
            ("- +", "Length"),
            ("p", "Policy"),
            ("r", "Remove"),
            ("w", "Save"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
    }
}

/// Full key reference for the help overlay.
pub const HELP_ENTRIES: &[(&str, &str)] = &[
    ("j / Down", "Scroll down"),
    ("k / Up", "Scroll up"),
    ("PgDn / PgUp", "Scroll one page"),
    ("m", "Toggle whole-line / offset-length matching"),
    ("[ / ]", "Move the window left / right"),
    ("- / +", "Shrink / grow the window"),
    ("p", "Cycle retention policy"),
    ("r", "Remove duplicates (asks for confirmation)"),
    ("w", "Write the text to the output file"),
    ("?", "Toggle this help"),
    ("q / Esc", "Quit"),
];

//! Terminal User Interface module.
//!
//! This module provides the interactive view for reviewing and removing
//! duplicate lines using ratatui with crossterm backend.
//!
//! # Overview
//!
//! The TUI module consists of:
//! - [`app`]: Application state (modes, settings, live pipeline snapshot)
//! - [`events`]: Keyboard event handling
//! - [`ui`]: Ratatui rendering
//! - [`run`]: Terminal setup and the main loop
//! - [`theme`]: Color palettes
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Events are captured from the terminal (crossterm)
//! 2. Events are translated to Actions
//! 3. Actions modify the App state, re-triggering the live pipeline
//! 4. The UI renders the latest committed snapshot
//!
//! # Example
//!
//! ```
//! use dupline::config::Config;
//! use dupline::tui::{Action, App, AppMode};
//!
//! let mut app = App::new("a\nb\na", &Config::default(), "out.txt");
//! app.wait_idle();
//!
//! app.handle_action(Action::Remove);
//! assert_eq!(app.mode(), AppMode::Confirming);
//! app.handle_action(Action::Confirm);
//! assert_eq!(app.text(), "a\nb");
//! ```

pub mod app;
pub mod events;
pub mod run;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use app::{Action, App, AppMode};
pub use events::{EventError, EventHandler};
pub use run::{run_tui, TuiError, TuiResult};
pub use theme::Theme;
pub use ui::{render, truncate_string};

//! TUI application state management.
//!
//! # Overview
//!
//! This module manages the application state for the interactive TUI, including:
//! - Current mode (Reviewing, Confirming, ShowingHelp, Quitting)
//! - The text under review and the matching settings
//! - The latest committed [`Snapshot`] of the live pipeline
//! - Scrolling and status messages
//!
//! # Architecture
//!
//! The `App` struct is the central state container for the TUI. It is designed
//! to be accessed only from the main thread. Every change of the text or of
//! the matching settings re-triggers the [`LivePipeline`]; rendering only
//! ever reads the last committed snapshot.
//!
//! # Example
//!
//! ```
//! use dupline::config::Config;
//! use dupline::tui::app::{Action, App};
//!
//! let mut app = App::new("Rex\nMilou\nRex", &Config::default(), "dogs.txt");
//! app.wait_idle();
//! assert_eq!(app.report(), "Rex [1,3]");
//!
//! app.handle_action(Action::ToggleMode);
//! assert_eq!(app.settings().length, Some(1));
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::actions::{RemovalPlan, RetentionPolicy};
use crate::cli::ThemeArg;
use crate::config::Config;
use crate::duplicates::{HighlightSpan, LivePipeline, MatchSettings, RunHandle, RunOutcome, Snapshot};
use crate::scanner::MatchMode;

use super::theme::Theme;

/// Offset used when switching to offset-length mode without one.
pub const DEFAULT_OFFSET: usize = 0;

/// Length used when switching to offset-length mode without one.
pub const DEFAULT_LENGTH: usize = 1;

/// Application mode/state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Reviewing the text and its duplicates - main mode
    #[default]
    Reviewing,
    /// Confirming a removal
    Confirming,
    /// Showing the key reference
    ShowingHelp,
    /// Application is quitting
    Quitting,
}

impl AppMode {
    /// Check if the application is done (quitting).
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Quitting)
    }
}

/// User action triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Scroll the text one line up
    ScrollUp,
    /// Scroll the text one line down
    ScrollDown,
    /// Scroll one page up
    PageUp,
    /// Scroll one page down
    PageDown,
    /// Switch between whole-line and offset-length matching
    ToggleMode,
    /// Move the window one character left
    DecreaseOffset,
    /// Move the window one character right
    IncreaseOffset,
    /// Shrink the window by one character
    DecreaseLength,
    /// Grow the window by one character
    IncreaseLength,
    /// Select the next retention policy
    CyclePolicy,
    /// Ask to remove duplicates
    Remove,
    /// Confirm the pending removal
    Confirm,
    /// Cancel a dialog or dismiss a message
    Cancel,
    /// Write the current text to the target file
    Save,
    /// Show or hide the key reference
    ToggleHelp,
    /// Quit the application
    Quit,
}

/// Application state for the interactive view.
#[derive(Debug)]
pub struct App {
    /// Current application mode
    mode: AppMode,
    /// Text under review
    text: String,
    /// Matching settings as edited
    settings: MatchSettings,
    /// Policy applied by the next removal
    policy: RetentionPolicy,
    /// Theme as configured
    theme_arg: ThemeArg,
    /// Resolved palette
    theme: Theme,
    /// File written by [`Action::Save`]
    target: PathBuf,
    /// Background pipeline
    pipeline: LivePipeline,
    /// Latest committed snapshot
    snapshot: Option<Arc<Snapshot>>,
    /// Handle of the most recent run
    pending: Option<RunHandle>,
    /// First visible line (0-based)
    scroll: usize,
    /// Number of visible rows in the UI (for paging)
    visible_rows: usize,
    /// Whether the text differs from the target file
    dirty: bool,
    /// Informational message for the status bar
    status: Option<String>,
    /// Error message to display (if any)
    error_message: Option<String>,
}

impl App {
    /// Create the app for `text` and start the first run.
    ///
    /// Offset-length settings missing an offset or length get
    /// [`DEFAULT_OFFSET`] and [`DEFAULT_LENGTH`].
    #[must_use]
    pub fn new(text: impl Into<String>, config: &Config, target: impl Into<PathBuf>) -> Self {
        let mut settings = config.match_settings();
        if settings.mode == MatchMode::OffsetLength {
            fill_window_defaults(&mut settings);
        }

        let mut app = Self {
            mode: AppMode::Reviewing,
            text: text.into(),
            settings,
            policy: config.remove_mode,
            theme_arg: config.theme,
            theme: Theme::from_arg(config.theme),
            target: target.into(),
            pipeline: LivePipeline::new(),
            snapshot: None,
            pending: None,
            scroll: 0,
            visible_rows: 20,
            dirty: false,
            status: None,
            error_message: None,
        };
        app.retrigger();
        app
    }

    // ==================== Mode Management ====================

    /// Get the current application mode.
    #[must_use]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Set the application mode.
    pub fn set_mode(&mut self, mode: AppMode) {
        log::debug!("Mode transition: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// Check if the application should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.mode.is_done()
    }

    // ==================== Accessors ====================

    /// Text under review.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current matching settings.
    #[must_use]
    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    /// Policy applied by the next removal.
    #[must_use]
    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Color palette.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// File written by the save action.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Latest committed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_deref()
    }

    /// Interactive report of the latest snapshot, empty before the first.
    #[must_use]
    pub fn report(&self) -> &str {
        self.snapshot.as_deref().map_or("", |s| s.report.as_str())
    }

    /// Highlight spans of the latest snapshot.
    #[must_use]
    pub fn highlights(&self) -> &[HighlightSpan] {
        self.snapshot.as_deref().map_or(&[], |s| s.highlights.as_slice())
    }

    /// Whether the latest snapshot reflects the current text and settings.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|s| s.generation == self.pipeline.latest_generation())
    }

    /// Whether the text has unsaved removals.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Status bar message.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// First visible line (0-based).
    #[must_use]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Update the number of visible rows (called by the renderer).
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
    }

    /// Number of lines in the latest snapshot.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.snapshot.as_deref().map_or(0, |s| s.result.lines.len())
    }

    /// Settings to persist on exit.
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            mode: self.settings.mode,
            offset: self.settings.offset,
            length: self.settings.length,
            remove_mode: self.policy,
            theme: self.theme_arg,
        }
    }

    // ==================== Pipeline ====================

    /// Pick up the latest committed snapshot and the outcome of the last run.
    pub fn refresh(&mut self) {
        if self.pending.as_ref().is_some_and(RunHandle::is_finished) {
            if let Some(handle) = self.pending.take() {
                self.record_outcome(handle.join());
            }
        }
        self.snapshot = self.pipeline.snapshot();
        self.clamp_scroll();
    }

    /// Block until the most recent run has ended, then refresh.
    pub fn wait_idle(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.record_outcome(handle.join());
        }
        self.snapshot = self.pipeline.snapshot();
        self.clamp_scroll();
    }

    fn record_outcome(&mut self, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Committed(generation) => {
                log::trace!("Generation {generation} committed");
            }
            RunOutcome::Superseded => {}
            RunOutcome::Failed(message) => {
                self.status = Some(format!("Search failed: {message}"));
            }
        }
    }

    fn retrigger(&mut self) {
        match self.pipeline.trigger(self.text.clone(), self.settings) {
            Ok(handle) => self.pending = Some(handle),
            Err(err) => self.set_error(&err.to_string()),
        }
    }

    // ==================== Settings ====================

    fn toggle_mode(&mut self) {
        self.settings.mode = self.settings.mode.toggled();
        if self.settings.mode == MatchMode::OffsetLength {
            fill_window_defaults(&mut self.settings);
        }
        self.retrigger();
    }

    fn adjust_offset(&mut self, increase: bool) {
        if self.settings.mode != MatchMode::OffsetLength {
            return;
        }
        let offset = self.settings.offset.unwrap_or(DEFAULT_OFFSET);
        let next = if increase {
            offset.saturating_add(1)
        } else {
            offset.saturating_sub(1)
        };
        if next != offset {
            self.settings.offset = Some(next);
            self.retrigger();
        }
    }

    fn adjust_length(&mut self, increase: bool) {
        if self.settings.mode != MatchMode::OffsetLength {
            return;
        }
        let length = self.settings.length.unwrap_or(DEFAULT_LENGTH);
        let next = if increase {
            length.saturating_add(1)
        } else {
            length.saturating_sub(1).max(1)
        };
        if next != length {
            self.settings.length = Some(next);
            self.retrigger();
        }
    }

    // ==================== Removal ====================

    fn request_removal(&mut self) -> bool {
        if self.mode != AppMode::Reviewing {
            return false;
        }
        if !self.is_current() {
            self.status = Some("Search in progress".to_string());
            return false;
        }
        if !self.snapshot.as_ref().is_some_and(|s| s.result.has_duplicates()) {
            self.status = Some("Nothing to remove".to_string());
            return false;
        }
        self.set_mode(AppMode::Confirming);
        true
    }

    /// Apply the pending removal and re-run the search on the surviving text.
    ///
    /// Returns the applied plan, or `None` when no removal was pending or the
    /// snapshot went stale in the meantime.
    pub fn confirm_removal(&mut self) -> Option<RemovalPlan> {
        if self.mode != AppMode::Confirming {
            return None;
        }
        self.set_mode(AppMode::Reviewing);

        if !self.is_current() {
            self.status = Some("Search in progress".to_string());
            return None;
        }
        let plan = self.pipeline.remove(self.policy)?;
        if plan.is_noop() {
            return None;
        }

        log::info!("{}", plan.summary());
        self.text = plan.to_text();
        self.dirty = true;
        self.status = Some(plan.summary());
        self.scroll = 0;
        self.retrigger();
        Some(plan)
    }

    /// Record that the text was written to the target file.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
        self.status = Some(format!("Saved {}", self.target.display()));
    }

    // ==================== Scrolling ====================

    fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta);
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.line_count().saturating_sub(1));
    }

    // ==================== Messages ====================

    /// Error message to display (if any).
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Show an error dialog.
    pub fn set_error(&mut self, message: &str) {
        log::warn!("{message}");
        self.error_message = Some(message.to_string());
    }

    /// Dismiss the error dialog.
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    // ==================== Action Handling ====================

    /// Handle a user action and update state accordingly.
    ///
    /// While an error is displayed any action only dismisses it.
    /// [`Action::Save`] is performed by the main loop.
    ///
    /// Returns true if the action was handled.
    pub fn handle_action(&mut self, action: Action) -> bool {
        log::trace!("Handling action: {:?} in mode {:?}", action, self.mode);

        if self.error_message.is_some() {
            self.clear_error();
            return true;
        }

        match action {
            Action::ScrollUp => {
                self.scroll_by(-1);
                true
            }
            Action::ScrollDown => {
                self.scroll_by(1);
                true
            }
            Action::PageUp => {
                self.scroll_by(-page(self.visible_rows));
                true
            }
            Action::PageDown => {
                self.scroll_by(page(self.visible_rows));
                true
            }
            Action::ToggleMode => {
                self.toggle_mode();
                true
            }
            Action::DecreaseOffset => {
                self.adjust_offset(false);
                true
            }
            Action::IncreaseOffset => {
                self.adjust_offset(true);
                true
            }
            Action::DecreaseLength => {
                self.adjust_length(false);
                true
            }
            Action::IncreaseLength => {
                self.adjust_length(true);
                true
            }
            Action::CyclePolicy => {
                self.policy = self.policy.next();
                self.status = Some(format!("Policy: {}", self.policy.description()));
                true
            }
            Action::Remove => self.request_removal(),
            Action::Confirm => self.confirm_removal().is_some(),
            Action::Save => true,
            Action::ToggleHelp => {
                let next = if self.mode == AppMode::ShowingHelp {
                    AppMode::Reviewing
                } else {
                    AppMode::ShowingHelp
                };
                self.set_mode(next);
                true
            }
            Action::Cancel => {
                match self.mode {
                    AppMode::Confirming | AppMode::ShowingHelp => {
                        self.set_mode(AppMode::Reviewing);
                    }
                    _ => self.status = None,
                }
                true
            }
            Action::Quit => {
                self.pipeline.cancel_pending();
                self.set_mode(AppMode::Quitting);
                true
            }
        }
    }
}

fn fill_window_defaults(settings: &mut MatchSettings) {
    settings.offset.get_or_insert(DEFAULT_OFFSET);
    settings.length.get_or_insert(DEFAULT_LENGTH);
}

fn page(rows: usize) -> isize {
    isize::try_from(rows).unwrap_or(isize::MAX)
}

//! Duplicate finder orchestrating the line pipeline.
//!
//! # Overview
//!
//! A search runs three phases over one in-memory text:
//! 1. **Indexing**: split the text into lines (see [`crate::scanner::lines`])
//! 2. **Windowing**: select the searched value of every line (see [`crate::scanner::window`])
//! 3. **Grouping**: collect values occurring on two or more lines (see [`crate::duplicates::groups`])
//!
//! The cancellation token is polled after every phase. A cancelled search
//! returns [`FinderError::Cancelled`] and produces no partial result.
//!
//! # Example
//!
//! ```
//! use dupline::duplicates::{DuplicateFinder, FinderConfig};
//! use dupline::scanner::{MatchMode, Window};
//!
//! let window = Window::from_settings(MatchMode::OffsetLength, Some(2), Some(4)).unwrap();
//! let finder = DuplicateFinder::new(FinderConfig::default().with_window(window));
//!
//! let (result, summary) = finder.find_duplicates("00aaaa00\n11aaaa11\n22bbbb22").unwrap();
//! assert_eq!(result.duplicates[0].line_numbers, vec![1, 2]);
//! assert_eq!(summary.duplicate_lines, 2);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::actions::{plan_removal, RemovalPlan, RetentionPolicy};
use crate::error::ConfigError;
use crate::progress::ProgressCallback;
use crate::scanner::{annotate, index_lines, LineRecord, Window};
use crate::signal::CancelToken;

use super::groups::{group_by_value, DuplicateGroup, GroupingStats};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Validated matching window.
    pub window: Window,
    /// Cancellation token polled between phases.
    pub cancel_token: CancelToken,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("window", &self.window)
            .field("cancel_token", &self.cancel_token)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the matching window.
    #[must_use]
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Set the cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn phase_start(&self, phase: &str, total: usize) {
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start(phase, total);
        }
    }

    fn phase_end(&self, phase: &str, processed: usize) {
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end(phase, processed);
        }
    }
}

/// Everything one search produced.
///
/// Replaced wholesale on every change of text or settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Every line of the text, in line-number order
    pub lines: Vec<LineRecord>,
    /// Duplicate groups, in first-seen-key order
    pub duplicates: Vec<DuplicateGroup>,
    /// Window the result was computed with
    pub window: Window,
}

impl SearchResult {
    /// Record of a 1-based line number.
    #[must_use]
    pub fn line(&self, line_number: usize) -> Option<&LineRecord> {
        line_number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
    }

    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// Summary statistics from one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    /// Total number of lines
    pub total_lines: usize,
    /// Lines with a non-empty searched value
    pub comparable_lines: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Lines belonging to any group
    pub duplicate_lines: usize,
    /// Lines a keep-first or keep-last removal would drop
    pub removable_lines: usize,
    /// Duration of the search
    pub scan_duration: Duration,
}

impl ScanSummary {
    fn from_stats(stats: &GroupingStats, scan_duration: Duration) -> Self {
        Self {
            total_lines: stats.total_lines,
            comparable_lines: stats.comparable_lines(),
            duplicate_groups: stats.duplicate_groups,
            duplicate_lines: stats.duplicate_lines,
            removable_lines: stats.duplicate_lines - stats.duplicate_groups,
            scan_duration,
        }
    }

    /// Percentage of comparable lines that are duplicates.
    #[must_use]
    pub fn duplicate_percentage(&self) -> f64 {
        if self.comparable_lines == 0 {
            0.0
        } else {
            (self.duplicate_lines as f64 / self.comparable_lines as f64) * 100.0
        }
    }

    /// Short status text, e.g. `2 group(s), 5 duplicate line(s) in 11 lines (45.5%)`.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "{} group(s), {} duplicate line(s) in {} lines ({:.1}%)",
            self.duplicate_groups,
            self.duplicate_lines,
            self.total_lines,
            self.duplicate_percentage()
        )
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FinderError {
    /// The search was cancelled (Ctrl+C or superseded by a newer run).
    #[error("Search cancelled")]
    Cancelled,

    /// The matching settings are invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

/// Duplicate finder running the line pipeline.
///
/// # Example
///
/// ```
/// use dupline::duplicates::DuplicateFinder;
///
/// let finder = DuplicateFinder::with_defaults();
/// let (result, summary) = finder.find_duplicates("Rex\nMilou\nRex").unwrap();
///
/// assert_eq!(result.duplicates[0].to_string(), "Rex[1,3]");
/// assert_eq!(summary.total_lines, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder comparing whole lines.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    fn check_cancelled(&self, after: &str) -> Result<(), FinderError> {
        if self.config.cancel_token.is_cancelled() {
            log::debug!("Search cancelled after {after}");
            return Err(FinderError::Cancelled);
        }
        Ok(())
    }

    /// Find all duplicate lines (or windows) of `text`.
    ///
    /// # Returns
    ///
    /// A tuple of:
    /// - `SearchResult` - Lines, duplicate groups and the window used
    /// - `ScanSummary` - Statistics about the search
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Cancelled`] if the cancellation token fires
    /// between two phases.
    pub fn find_duplicates(&self, text: &str) -> Result<(SearchResult, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let window = self.config.window;
        log::debug!("Starting duplicate search ({window}) over {} bytes", text.len());

        self.check_cancelled("start")?;

        // Phase 1: indexing
        self.config.phase_start("indexing", 0);
        let indexed = index_lines(text);
        self.config.phase_end("indexing", indexed.len());
        self.check_cancelled("indexing")?;

        // Phase 2: windowing
        self.config.phase_start("windowing", indexed.len());
        let lines = annotate(&indexed, &window);
        self.config.phase_end("windowing", lines.len());
        self.check_cancelled("windowing")?;

        // Phase 3: grouping
        self.config.phase_start("grouping", lines.len());
        let (duplicates, stats) = group_by_value(&lines);
        self.config.phase_end("grouping", duplicates.len());
        self.check_cancelled("grouping")?;

        let summary = ScanSummary::from_stats(&stats, start_time.elapsed());
        log::info!(
            "Search complete: {} duplicate groups, {} duplicate lines out of {} ({:?})",
            summary.duplicate_groups,
            summary.duplicate_lines,
            summary.total_lines,
            summary.scan_duration
        );

        Ok((
            SearchResult {
                lines,
                duplicates,
                window,
            },
            summary,
        ))
    }

    /// Search `text` and plan the removal of its duplicates under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Cancelled`] if cancelled during the search or
    /// before the plan is emitted.
    pub fn remove_duplicates(
        &self,
        text: &str,
        policy: RetentionPolicy,
    ) -> Result<(RemovalPlan, ScanSummary), FinderError> {
        let (result, summary) = self.find_duplicates(text)?;

        self.config.phase_start("removing", result.lines.len());
        let plan = plan_removal(&result, policy);
        self.config.phase_end("removing", plan.removed_count());
        self.check_cancelled("removal planning")?;

        log::info!("{}", plan.summary());
        Ok((plan, summary))
    }
}

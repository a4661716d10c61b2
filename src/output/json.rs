//! JSON output formatter for search results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     { "value": "Rex", "lines": [1, 9], "count": 2 }
//!   ],
//!   "summary": {
//!     "mode": "line",
//!     "offset": null,
//!     "length": null,
//!     "total_lines": 11,
//!     "comparable_lines": 11,
//!     "duplicate_groups": 2,
//!     "duplicate_lines": 5,
//!     "removable_lines": 3,
//!     "scan_duration_ms": 0,
//!     "exit_code": 0,
//!     "exit_code_name": "DL000"
//!   },
//!   "removal": null
//! }
//! ```
//!
//! `removal` is present when the run removed duplicates.
//!
//! # Example
//!
//! ```
//! use dupline::duplicates::DuplicateFinder;
//! use dupline::error::ExitCode;
//! use dupline::output::json::JsonOutput;
//!
//! let (result, summary) = DuplicateFinder::with_defaults()
//!     .find_duplicates("Rex\nMilou\nRex")
//!     .unwrap();
//! let output = JsonOutput::new(&result, &summary, ExitCode::Success);
//! let json = output.to_json().unwrap();
//! assert!(json.contains("\"value\":\"Rex\""));
//! ```

use std::io::Write;

use serde::Serialize;

use crate::actions::{RemovalPlan, RetentionPolicy};
use crate::duplicates::{DuplicateGroup, ScanSummary, SearchResult};
use crate::error::ExitCode;
use crate::scanner::{MatchMode, Window};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// The repeated searched value
    pub value: String,
    /// Line numbers, ascending
    pub lines: Vec<usize>,
    /// Number of occurrences
    pub count: usize,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            value: group.value.clone(),
            lines: group.line_numbers.clone(),
            count: group.count(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Matching mode used
    pub mode: MatchMode,
    /// Window offset in characters (offset/length mode only)
    pub offset: Option<usize>,
    /// Window length in characters (offset/length mode only)
    pub length: Option<usize>,
    /// Total number of lines
    pub total_lines: usize,
    /// Lines with a non-empty searched value
    pub comparable_lines: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Lines belonging to any group
    pub duplicate_lines: usize,
    /// Lines a keep-one policy would remove
    pub removable_lines: usize,
    /// Duration of the search in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DL000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a window, a scan summary and an exit code.
    #[must_use]
    pub fn new(window: &Window, summary: &ScanSummary, exit_code: ExitCode) -> Self {
        let (offset, length) = match *window {
            Window::WholeLine => (None, None),
            Window::Fixed { offset, length } => (Some(offset), Some(length)),
        };
        Self {
            mode: window.mode(),
            offset,
            length,
            total_lines: summary.total_lines,
            comparable_lines: summary.comparable_lines,
            duplicate_groups: summary.duplicate_groups,
            duplicate_lines: summary.duplicate_lines,
            removable_lines: summary.removable_lines,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Removal outcome in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRemoval {
    /// Policy applied
    pub policy: RetentionPolicy,
    /// Removed line numbers, ascending
    pub removed_lines: Vec<usize>,
    /// Surviving text, lines joined with `\n`
    pub text: String,
}

impl From<&RemovalPlan> for JsonRemoval {
    fn from(plan: &RemovalPlan) -> Self {
        Self {
            policy: plan.policy,
            removed_lines: plan.removed_line_numbers.clone(),
            text: plan.to_text(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate groups in first-seen order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Search summary statistics
    pub summary: JsonSummary,
    /// Removal outcome, if duplicates were removed
    pub removal: Option<JsonRemoval>,
}

impl JsonOutput {
    /// Create a new JSON output from a search result, summary and exit code.
    #[must_use]
    pub fn new(result: &SearchResult, summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicates: result.duplicates.iter().map(JsonDuplicateGroup::from).collect(),
            summary: JsonSummary::new(&result.window, summary, exit_code),
            removal: None,
        }
    }

    /// Attach a removal plan.
    #[must_use]
    pub fn with_removal(mut self, plan: &RemovalPlan) -> Self {
        self.removal = Some(JsonRemoval::from(plan));
        self
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}

//! Searched-window selection.
//!
//! # Overview
//!
//! Decides, for every line, which part of it is compared when looking for
//! duplicates:
//!
//! - [`MatchMode::Line`]: the whole line
//! - [`MatchMode::OffsetLength`]: a fixed window of `length` characters
//!   starting at character `offset`
//!
//! The configuration is validated once by [`Window::from_settings`]. After
//! that, selecting a window for a line never fails: a line too short for the
//! window gets an empty searched value and cannot take part in a duplicate
//! group.
//!
//! Window parameters are counted in characters; the resulting
//! [`LineRecord`] offsets are byte offsets so they can slice the text.
//!
//! # Example
//!
//! ```
//! use dupline::scanner::{annotate, index_lines, MatchMode, Window};
//!
//! let window = Window::from_settings(MatchMode::OffsetLength, Some(2), Some(4)).unwrap();
//! let records = annotate(&index_lines("00aaaa0000\n11"), &window);
//!
//! assert_eq!(records[0].searched_value(), "aaaa");
//! assert_eq!(records[1].searched_value(), ""); // too short
//! ```

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::lines::IndexedLine;
use crate::error::{closest_match, ConfigError};

/// How the searched value of a line is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Compare entire lines
    #[default]
    #[value(alias = "whole-line")]
    Line,
    /// Compare a fixed offset/length window of each line
    #[value(alias = "offsetlength")]
    #[serde(alias = "offsetlength")]
    OffsetLength,
}

impl MatchMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Line => Self::OffsetLength,
            Self::OffsetLength => Self::Line,
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::OffsetLength => write!(f, "offset-length"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" | "whole-line" => Ok(Self::Line),
            "offset-length" | "offsetlength" => Ok(Self::OffsetLength),
            _ => Err(ConfigError::UnsupportedMode {
                value: s.to_string(),
                suggestion: closest_match(s, &["line", "offset-length"]),
            }),
        }
    }
}

/// A validated matching configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Window {
    /// The whole line is the searched value.
    #[default]
    WholeLine,
    /// Characters `offset..offset + length` are the searched value.
    Fixed {
        /// Zero-based character offset
        offset: usize,
        /// Number of characters, at least 1
        length: usize,
    },
}

impl Window {
    /// Validate a mode and its optional parameters.
    ///
    /// In [`MatchMode::Line`] the offset and length are ignored.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingOffsetOrLength`] if offset/length mode lacks either value
    /// - [`ConfigError::InvalidLength`] if the length is 0
    pub fn from_settings(
        mode: MatchMode,
        offset: Option<usize>,
        length: Option<usize>,
    ) -> Result<Self, ConfigError> {
        match mode {
            MatchMode::Line => Ok(Self::WholeLine),
            MatchMode::OffsetLength => match (offset, length) {
                (Some(_), Some(0)) => Err(ConfigError::InvalidLength),
                (Some(offset), Some(length)) => Ok(Self::Fixed { offset, length }),
                _ => Err(ConfigError::MissingOffsetOrLength),
            },
        }
    }

    /// The mode this window was built from.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        match self {
            Self::WholeLine => MatchMode::Line,
            Self::Fixed { .. } => MatchMode::OffsetLength,
        }
    }

    /// Select the searched window of a line.
    ///
    /// Returns `(byte_offset, byte_length)` relative to `raw`. The length is
    /// 0 when the line has fewer than `offset + length` characters; in that
    /// case the offset is 0 if it lies past the end of the line.
    #[must_use]
    pub fn select(&self, raw: &str) -> (usize, usize) {
        match *self {
            Self::WholeLine => (0, raw.len()),
            Self::Fixed { offset, length } => {
                // Byte position of every char boundary, including the end.
                let mut boundaries = raw
                    .char_indices()
                    .map(|(i, _)| i)
                    .chain(std::iter::once(raw.len()));

                let Some(start) = boundaries.nth(offset) else {
                    return (0, 0);
                };
                match length.checked_sub(1).and_then(|n| boundaries.nth(n)) {
                    Some(end) => (start, end - start),
                    None => (start, 0),
                }
            }
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WholeLine => write!(f, "line"),
            Self::Fixed { offset, length } => {
                write!(f, "offset-length (offset={offset}, length={length})")
            }
        }
    }
}

/// A line with its searched window.
///
/// Immutable once built; a new set is produced for every search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    /// 1-based line number
    pub line_number: usize,
    /// Line content without its terminator
    pub raw_value: String,
    /// Byte offset of `raw_value` in the original text
    pub start_offset: usize,
    /// Byte offset of the searched window within `raw_value`
    pub searched_offset: usize,
    /// Byte length of the searched window (0 when it does not fit)
    pub searched_length: usize,
}

impl LineRecord {
    /// Build a record by applying `window` to an indexed line.
    #[must_use]
    pub fn new(line: &IndexedLine<'_>, window: &Window) -> Self {
        let (searched_offset, searched_length) = window.select(line.raw);
        Self {
            line_number: line.line_number,
            raw_value: line.raw.to_string(),
            start_offset: line.start_offset,
            searched_offset,
            searched_length,
        }
    }

    /// The part of the line used for comparison.
    #[must_use]
    pub fn searched_value(&self) -> &str {
        self.raw_value
            .get(self.searched_offset..self.searched_offset + self.searched_length)
            .unwrap_or("")
    }

    /// Absolute byte offset of the searched window in the original text.
    #[must_use]
    pub fn searched_start(&self) -> usize {
        self.start_offset + self.searched_offset
    }

    /// Whether the line is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.raw_value.trim().is_empty()
    }
}

/// Apply `window` to every indexed line.
#[must_use]
pub fn annotate(lines: &[IndexedLine<'_>], window: &Window) -> Vec<LineRecord> {
    lines.iter().map(|line| LineRecord::new(line, window)).collect()
}

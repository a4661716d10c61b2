//! Scanner module for turning text into comparable line records.
//!
//! This module provides functionality for:
//! - Splitting text into position-aware lines (`\r\n` and `\n` aware)
//! - Selecting the searched window of each line (whole line or offset/length)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`lines`]: Line indexing with byte offsets
//! - [`window`]: Matching mode validation and window selection
//!
//! # Example
//!
//! ```
//! use dupline::scanner::{annotate, index_lines, Window};
//!
//! let text = "Rex\nMilou\nRex";
//! let records = annotate(&index_lines(text), &Window::WholeLine);
//!
//! assert_eq!(records.len(), 3);
//! assert_eq!(records[2].searched_value(), "Rex");
//! ```

pub mod lines;
pub mod window;

// Re-export main types
pub use lines::{index_lines, IndexedLine, LineIndexer};
pub use window::{annotate, LineRecord, MatchMode, Window};

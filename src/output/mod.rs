//! Output formatters for search results.
//!
//! This module provides the output formats for search results:
//! - Plain-text reports for the batch and interactive surfaces
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```
//! use dupline::duplicates::DuplicateFinder;
//! use dupline::output::{render_report, ReportStyle};
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (result, _summary) = finder.find_duplicates("a\nb\na").unwrap();
//!
//! println!("{}", render_report(&result.duplicates, ReportStyle::Batch));
//! ```

pub mod json;
pub mod report;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError};
pub use report::{render_report, ReportStyle, NO_DUPLICATE_MESSAGE};

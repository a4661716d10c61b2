//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Grouping lines by searched value (first-seen order)
//! - Orchestrating the indexing, windowing and grouping phases
//! - Computing highlight spans for presentation
//! - Live re-evaluation with superseding runs for the interactive surface

pub mod finder;
pub mod groups;
pub mod highlight;
pub mod live;

// Re-export main types
pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary, SearchResult};
pub use groups::{group_by_value, DuplicateGroup, GroupingStats};
pub use highlight::{compute_highlights, count_by_kind, HighlightKind, HighlightSpan};
pub use live::{LivePipeline, MatchSettings, RunHandle, RunOutcome, Snapshot};

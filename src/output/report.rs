//! Plain-text duplicate reports.
//!
//! Two styles exist because the two surfaces historically differ:
//!
//! | Style | Entry | Separator | No duplicates |
//! |-------|-------|-----------|---------------|
//! | batch | `Rex[1,9]` | `\n` | `No duplicate found` |
//! | interactive | `Rex [1,9]` | `\r\n` | empty string |
//!
//! ```
//! use dupline::duplicates::DuplicateGroup;
//! use dupline::output::report::{render_report, ReportStyle};
//!
//! let groups = vec![
//!     DuplicateGroup::new("Rex", vec![1, 9]),
//!     DuplicateGroup::new("Milou", vec![3, 8, 11]),
//! ];
//! assert_eq!(render_report(&groups, ReportStyle::Batch), "Rex[1,9]\nMilou[3,8,11]");
//! assert_eq!(render_report(&[], ReportStyle::Batch), "No duplicate found");
//! ```

use crate::duplicates::DuplicateGroup;

/// Report shown by the batch surface when nothing is duplicated.
pub const NO_DUPLICATE_MESSAGE: &str = "No duplicate found";

/// Formatting style of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// Command line output
    Batch,
    /// Interactive side panel
    Interactive,
}

impl ReportStyle {
    fn separator(self) -> &'static str {
        match self {
            Self::Batch => "\n",
            Self::Interactive => "\r\n",
        }
    }

    fn empty(self) -> &'static str {
        match self {
            Self::Batch => NO_DUPLICATE_MESSAGE,
            Self::Interactive => "",
        }
    }
}

/// Render one group in the given style.
#[must_use]
pub fn render_entry(group: &DuplicateGroup, style: ReportStyle) -> String {
    match style {
        ReportStyle::Batch => format!("{}[{}]", group.value, group.line_list()),
        ReportStyle::Interactive => format!("{} [{}]", group.value, group.line_list()),
    }
}

/// Render groups in the given order.
#[must_use]
pub fn render_report(groups: &[DuplicateGroup], style: ReportStyle) -> String {
    if groups.is_empty() {
        return style.empty().to_string();
    }
    groups
        .iter()
        .map(|group| render_entry(group, style))
        .collect::<Vec<_>>()
        .join(style.separator())
}

//! Highlight spans for presenting a search result.
//!
//! Offsets are byte offsets into the original text. In whole-line mode only
//! duplicate lines are highlighted; in offset/length mode every other
//! non-blank line also shows its searched window, so the user can see what
//! is being compared.

use std::collections::HashSet;

use serde::Serialize;

use crate::scanner::MatchMode;

use super::finder::SearchResult;

/// Kind of a highlight span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightKind {
    /// The searched value occurs on another line too.
    Duplicate,
    /// The searched window of a line without duplicates.
    SearchedWindow,
}

/// A region of the text to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    /// Line the span belongs to
    pub line_number: usize,
    /// Absolute byte offset in the text
    pub start: usize,
    /// Byte length, possibly 0
    pub length: usize,
    /// What the span marks
    pub kind: HighlightKind,
}

impl HighlightSpan {
    /// Exclusive end offset.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

}

/// Compute highlight spans in line-number order.
///
/// `mode` is the presentation mode; a searched-window span is only produced
/// in [`MatchMode::OffsetLength`]. Zero-length windows of short lines are
/// still emitted so a caret can be drawn at their position.
///
/// A searched-window span is dropped when a duplicate span has the same start
/// and length. Records produced by [`annotate`](crate::scanner::annotate)
/// have strictly increasing starts, so only hand-built results hit this.
#[must_use]
pub fn compute_highlights(result: &SearchResult, mode: MatchMode) -> Vec<HighlightSpan> {
    let mut duplicate_lines = vec![false; result.lines.len() + 1];
    for group in &result.duplicates {
        for &number in &group.line_numbers {
            if let Some(slot) = duplicate_lines.get_mut(number) {
                *slot = true;
            }
        }
    }
    let is_duplicate = |line_number: usize| duplicate_lines.get(line_number).copied().unwrap_or(false);

    let duplicate_windows: HashSet<(usize, usize)> = result
        .lines
        .iter()
        .filter(|line| is_duplicate(line.line_number))
        .map(|line| (line.searched_start(), line.searched_length))
        .collect();

    let mut spans: Vec<HighlightSpan> = Vec::with_capacity(result.lines.len());
    for line in &result.lines {
        let start = line.searched_start();
        let length = line.searched_length;

        let kind = if is_duplicate(line.line_number) {
            HighlightKind::Duplicate
        } else if mode != MatchMode::OffsetLength
            || line.is_blank()
            || duplicate_windows.contains(&(start, length))
        {
            continue;
        } else {
            HighlightKind::SearchedWindow
        };

        spans.push(HighlightSpan {
            line_number: line.line_number,
            start,
            length,
            kind,
        });
    }

    log::trace!(
        "Computed {} highlight span(s), {} duplicate",
        spans.len(),
        duplicate_windows.len()
    );
    spans
}

/// Count spans of each kind as `(duplicate, searched_window)`.
#[must_use]
pub fn count_by_kind(spans: &[HighlightSpan]) -> (usize, usize) {
    spans.iter().fold((0, 0), |(dup, win), span| match span.kind {
        HighlightKind::Duplicate => (dup + 1, win),
        HighlightKind::SearchedWindow => (dup, win + 1),
    })
}

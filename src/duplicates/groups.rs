//! Duplicate grouping by searched value.
//!
//! # Overview
//!
//! Groups line records whose searched values are equal. Lines whose searched
//! value is empty (blank lines in whole-line mode, lines too short for the
//! window in offset/length mode) never take part in a group.
//!
//! ## Ordering
//!
//! Groups are emitted in first-seen-key order: the order in which each
//! duplicated value was first met while scanning top to bottom. This ordering
//! drives report output, so it must not depend on hash map iteration order.
//! Line numbers inside a group are ascending because lines are scanned once,
//! in order.
//!
//! # Example
//!
//! ```
//! use dupline::scanner::{annotate, index_lines, Window};
//! use dupline::duplicates::group_by_value;
//!
//! let records = annotate(&index_lines("Rex\nMilou\nRex\nMilou\nMilou"), &Window::WholeLine);
//! let (groups, stats) = group_by_value(&records);
//!
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].value, "Rex");
//! assert_eq!(groups[0].line_numbers, vec![1, 3]);
//! assert_eq!(groups[1].line_numbers, vec![2, 4, 5]);
//! assert_eq!(stats.duplicate_lines, 5);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scanner::LineRecord;

/// One searched value that occurs on two or more lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The repeated searched value (never empty)
    pub value: String,
    /// Line numbers where the value occurs, strictly increasing
    pub line_numbers: Vec<usize>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    ///
    /// # Arguments
    ///
    /// * `value` - The repeated searched value
    /// * `line_numbers` - Ascending line numbers of every occurrence
    #[must_use]
    pub fn new(value: impl Into<String>, line_numbers: Vec<usize>) -> Self {
        debug_assert!(
            line_numbers.windows(2).all(|w| w[0] < w[1]),
            "line numbers must be strictly increasing"
        );
        Self {
            value: value.into(),
            line_numbers,
        }
    }

    /// Total number of occurrences.
    #[must_use]
    pub fn count(&self) -> usize {
        self.line_numbers.len()
    }

    /// Comma-separated line numbers, e.g. `3,8,11`.
    #[must_use]
    pub fn line_list(&self) -> String {
        self.line_numbers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for DuplicateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.value, self.line_list())
    }
}

/// Statistics from the grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of lines processed
    pub total_lines: usize,
    /// Lines skipped because their searched value was empty
    pub skipped_empty: usize,
    /// Number of distinct non-empty searched values
    pub unique_values: usize,
    /// Number of values occurring on 2+ lines
    pub duplicate_groups: usize,
    /// Number of lines belonging to any duplicate group
    pub duplicate_lines: usize,
}

impl GroupingStats {
    /// Lines that could be compared (non-empty searched value).
    #[must_use]
    pub fn comparable_lines(&self) -> usize {
        self.total_lines - self.skipped_empty
    }
}

/// Group lines by searched value.
///
/// Single forward pass with a hash map from value to group slot; the slots
/// themselves live in a vector, which preserves first-seen order.
///
/// # Arguments
///
/// * `lines` - Records in line-number order
///
/// # Returns
///
/// A tuple of:
/// - `Vec<DuplicateGroup>` - Groups with 2+ occurrences, first-seen-key order
/// - `GroupingStats` - Statistics about the grouping operation
///
/// # Performance
///
/// - Time complexity: O(n) expected, n being the number of lines
/// - Space complexity: O(u) for u distinct searched values
#[must_use]
pub fn group_by_value(lines: &[LineRecord]) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut stats = GroupingStats {
        total_lines: lines.len(),
        ..Default::default()
    };

    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut occurrences: Vec<(&str, Vec<usize>)> = Vec::new();

    for line in lines {
        let value = line.searched_value();
        if value.is_empty() {
            stats.skipped_empty += 1;
            continue;
        }

        match slots.get(value) {
            Some(&slot) => occurrences[slot].1.push(line.line_number),
            None => {
                slots.insert(value, occurrences.len());
                occurrences.push((value, vec![line.line_number]));
            }
        }
    }

    stats.unique_values = occurrences.len();

    let groups: Vec<DuplicateGroup> = occurrences
        .into_iter()
        .filter(|(value, numbers)| {
            if numbers.len() > 1 {
                log::trace!("Duplicate value {:?} on lines {:?}", value, numbers);
                true
            } else {
                false
            }
        })
        .map(|(value, numbers)| DuplicateGroup::new(value, numbers))
        .collect();

    stats.duplicate_groups = groups.len();
    stats.duplicate_lines = groups.iter().map(DuplicateGroup::count).sum();

    log::debug!(
        "Grouping complete: {} lines → {} duplicate groups ({} lines, {} skipped as empty)",
        stats.total_lines,
        stats.duplicate_groups,
        stats.duplicate_lines,
        stats.skipped_empty
    );

    (groups, stats)
}

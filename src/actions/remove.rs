//! Duplicate removal planning.
//!
//! # Overview
//!
//! Given a search result and a [`RetentionPolicy`], decides which lines
//! survive. Removal always drops whole lines, even when duplicates were found
//! through an offset/length window, and survivors keep their original order.
//!
//! | Policy | Kept from each group |
//! |--------|----------------------|
//! | `remove-all` | nothing |
//! | `keep-first` | lowest line number |
//! | `keep-last` | highest line number |
//!
//! Lines outside every group are always kept.
//!
//! # Example
//!
//! ```
//! use dupline::actions::{plan_removal, RetentionPolicy};
//! use dupline::duplicates::DuplicateFinder;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (result, _) = finder.find_duplicates("a\nb\na").unwrap();
//!
//! let plan = plan_removal(&result, RetentionPolicy::KeepLast);
//! assert_eq!(plan.removed_line_numbers, vec![1]);
//! assert_eq!(plan.to_text(), "b\na");
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::duplicates::SearchResult;
use crate::error::{closest_match, ConfigError};

/// Which occurrence of each duplicate group survives a removal.
///
/// There is no implicit default when parsing: an unknown name is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum RetentionPolicy {
    /// Drop every line of every group
    RemoveAll,
    /// Keep the lowest-numbered line of each group
    #[default]
    KeepFirst,
    /// Keep the highest-numbered line of each group
    KeepLast,
}

impl RetentionPolicy {
    /// Names accepted by [`FromStr`], in display order.
    pub const NAMES: [&'static str; 3] = ["keep-first", "keep-last", "remove-all"];

    /// All policies, in cycling order.
    #[must_use]
    pub fn all() -> &'static [RetentionPolicy] {
        &[Self::KeepFirst, Self::KeepLast, Self::RemoveAll]
    }

    /// The next policy in cycling order.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::KeepFirst => Self::KeepLast,
            Self::KeepLast => Self::RemoveAll,
            Self::RemoveAll => Self::KeepFirst,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::RemoveAll => "Remove every occurrence",
            Self::KeepFirst => "Keep the first occurrence",
            Self::KeepLast => "Keep the last occurrence",
        }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RemoveAll => "remove-all",
            Self::KeepFirst => "keep-first",
            Self::KeepLast => "keep-last",
        };
        f.write_str(name)
    }
}

impl FromStr for RetentionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "remove-all" | "removeall" => Ok(Self::RemoveAll),
            "keep-first" | "keepfirst" => Ok(Self::KeepFirst),
            "keep-last" | "keeplast" => Ok(Self::KeepLast),
            _ => Err(ConfigError::UnsupportedPolicy {
                value: s.to_string(),
                suggestion: closest_match(&normalized, &Self::NAMES),
            }),
        }
    }
}

impl TryFrom<String> for RetentionPolicy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Outcome of applying a retention policy to a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalPlan {
    /// Policy that produced the plan
    pub policy: RetentionPolicy,
    /// Removed line numbers, ascending
    pub removed_line_numbers: Vec<usize>,
    /// Raw values of the surviving lines, in original order
    pub surviving: Vec<String>,
}

impl RemovalPlan {
    /// Surviving lines joined with `"\n"`.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.surviving.join("\n")
    }

    /// Number of removed lines.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed_line_numbers.len()
    }

    /// Whether the plan changes the text at all.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.removed_line_numbers.is_empty()
    }

    /// One-line summary for status bars and logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: removed {} line(s), {} remaining",
            self.policy,
            self.removed_count(),
            self.surviving.len()
        )
    }
}

/// Line numbers a policy removes, ascending.
#[must_use]
pub fn lines_to_remove(result: &SearchResult, policy: RetentionPolicy) -> BTreeSet<usize> {
    result
        .duplicates
        .iter()
        .flat_map(|group| {
            let numbers = group.line_numbers.as_slice();
            let removed = match policy {
                RetentionPolicy::RemoveAll => numbers,
                RetentionPolicy::KeepFirst => numbers.get(1..).unwrap_or_default(),
                RetentionPolicy::KeepLast => {
                    &numbers[..numbers.len().saturating_sub(1)]
                }
            };
            removed.iter().copied()
        })
        .collect()
}

/// Plan the removal of duplicates under `policy`.
///
/// # Arguments
///
/// * `result` - The search result the plan is computed from
/// * `policy` - Which occurrence of each group survives
#[must_use]
pub fn plan_removal(result: &SearchResult, policy: RetentionPolicy) -> RemovalPlan {
    let removed = lines_to_remove(result, policy);

    let surviving: Vec<String> = result
        .lines
        .iter()
        .filter(|line| !removed.contains(&line.line_number))
        .map(|line| line.raw_value.clone())
        .collect();

    let plan = RemovalPlan {
        policy,
        removed_line_numbers: removed.into_iter().collect(),
        surviving,
    };
    log::debug!("Removal plan: {}", plan.summary());
    plan
}

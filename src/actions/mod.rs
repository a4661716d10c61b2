//! Actions on a search result.
//!
//! Currently one action: planning the removal of duplicate lines under a
//! [`RetentionPolicy`]. Applying the plan (writing a file, refreshing the
//! interactive view) is left to the calling surface.
//!
//! ```
//! use dupline::actions::{plan_removal, RetentionPolicy};
//! use dupline::duplicates::DuplicateFinder;
//!
//! let (result, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates("x\ny\nx")
//!     .unwrap();
//! let plan = plan_removal(&result, RetentionPolicy::RemoveAll);
//! assert_eq!(plan.to_text(), "y");
//! ```

pub mod remove;

pub use remove::{lines_to_remove, plan_removal, RemovalPlan, RetentionPolicy};

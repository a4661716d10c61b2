//! Live re-evaluation for the interactive surface.
//!
//! # Overview
//!
//! Every edit of the text or of the matching settings calls
//! [`LivePipeline::trigger`]. Each trigger gets a new generation number and
//! runs the whole pipeline on a background thread:
//!
//! - runs are serialized by a mutex held for their whole duration;
//! - a run polls its generation after indexing, windowing and grouping, and
//!   again before building the report and before committing, and gives up
//!   silently ([`RunOutcome::Superseded`]) once a newer trigger exists;
//! - the committed [`Snapshot`] is only ever replaced by a newer generation,
//!   so readers never observe a half-built or stale result.
//!
//! Invalid settings are rejected by `trigger` itself, before any thread is
//! spawned.
//!
//! # Example
//!
//! ```
//! use dupline::duplicates::{LivePipeline, MatchSettings, RunOutcome};
//!
//! let pipeline = LivePipeline::new();
//! let outcome = pipeline
//!     .trigger("Rex\nMilou\nRex", MatchSettings::default())
//!     .unwrap()
//!     .join();
//! assert_eq!(outcome, RunOutcome::Committed(1));
//!
//! let snapshot = pipeline.snapshot().unwrap();
//! assert_eq!(snapshot.report, "Rex [1,3]");
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};

use crate::actions::{plan_removal, RemovalPlan, RetentionPolicy};
use crate::error::ConfigError;
use crate::output::report::{render_report, ReportStyle};
use crate::progress::ProgressCallback;
use crate::scanner::{MatchMode, Window};
use crate::signal::CancelToken;

use super::finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary, SearchResult};
use super::highlight::{compute_highlights, HighlightSpan};

/// Unvalidated matching settings as edited by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Matching mode
    pub mode: MatchMode,
    /// Character offset (offset/length mode)
    pub offset: Option<usize>,
    /// Character length (offset/length mode)
    pub length: Option<usize>,
}

impl MatchSettings {
    /// Settings comparing whole lines.
    #[must_use]
    pub fn whole_line() -> Self {
        Self::default()
    }

    /// Settings comparing a fixed window.
    #[must_use]
    pub fn offset_length(offset: usize, length: usize) -> Self {
        Self {
            mode: MatchMode::OffsetLength,
            offset: Some(offset),
            length: Some(length),
        }
    }

    /// Validate into a [`Window`].
    ///
    /// # Errors
    ///
    /// Same as [`Window::from_settings`].
    pub fn window(&self) -> Result<Window, ConfigError> {
        Window::from_settings(self.mode, self.offset, self.length)
    }
}

impl std::fmt::Display for MatchSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        write!(
            f,
            "mode={} offset={} length={}",
            self.mode,
            show(self.offset),
            show(self.length)
        )
    }
}

/// A fully computed, committed view of one run.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Generation that produced the snapshot
    pub generation: u64,
    /// Text the run was computed on
    pub text: String,
    /// Settings the run was computed with
    pub settings: MatchSettings,
    /// Search result
    pub result: SearchResult,
    /// Interactive report (`value [n1,n2]`, CRLF separated)
    pub report: String,
    /// Highlight spans in line-number order
    pub highlights: Vec<HighlightSpan>,
    /// Run statistics
    pub summary: ScanSummary,
}

/// How a triggered run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run committed the snapshot of this generation.
    Committed(u64),
    /// A newer trigger made this run obsolete; nothing was committed.
    Superseded,
    /// The run failed; the previous snapshot is untouched.
    Failed(String),
}

/// Handle on a background run.
#[derive(Debug)]
pub struct RunHandle {
    generation: u64,
    handle: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// Generation of the run.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the run has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to end.
    #[must_use]
    pub fn join(self) -> RunOutcome {
        self.handle
            .join()
            .unwrap_or_else(|_| RunOutcome::Failed("pipeline thread panicked".to_string()))
    }
}

struct Shared {
    latest: Arc<AtomicU64>,
    run_lock: Mutex<()>,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

/// Background pipeline with generation-based supersession.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct LivePipeline {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for LivePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LivePipeline")
            .field("latest_generation", &self.latest_generation())
            .field(
                "committed_generation",
                &self.snapshot().map(|s| s.generation),
            )
            .finish()
    }
}

impl Default for LivePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl LivePipeline {
    /// Create a pipeline with no snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a pipeline reporting phases of every run to `callback`.
    #[must_use]
    pub fn with_progress_callback(callback: Arc<dyn ProgressCallback>) -> Self {
        Self::build(Some(callback))
    }

    fn build(progress_callback: Option<Arc<dyn ProgressCallback>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                latest: Arc::new(AtomicU64::new(0)),
                run_lock: Mutex::new(()),
                snapshot: RwLock::new(None),
                progress_callback,
            }),
        }
    }

    /// Most recently issued generation (0 before the first trigger).
    #[must_use]
    pub fn latest_generation(&self) -> u64 {
        self.shared.latest.load(Ordering::SeqCst)
    }

    /// The latest committed snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        match self.shared.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Supersede every pending run without starting a new one.
    pub fn cancel_pending(&self) {
        let generation = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Pending runs superseded by generation {generation}");
    }

    /// Start a run for `text` with `settings`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid settings; no run is started and
    /// no generation is consumed in that case.
    pub fn trigger(
        &self,
        text: impl Into<String>,
        settings: MatchSettings,
    ) -> Result<RunHandle, ConfigError> {
        let window = settings.window()?;
        let text = text.into();
        let generation = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;
        log::trace!("Triggering generation {generation} ({settings})");

        let pipeline = self.clone();
        let handle = std::thread::spawn(move || pipeline.run(generation, text, settings, window));
        Ok(RunHandle { generation, handle })
    }

    /// Plan a removal on the latest snapshot.
    ///
    /// Returns `None` before the first commit. The caller feeds
    /// [`RemovalPlan::to_text`] back through [`LivePipeline::trigger`].
    #[must_use]
    pub fn remove(&self, policy: RetentionPolicy) -> Option<RemovalPlan> {
        self.snapshot()
            .map(|snapshot| plan_removal(&snapshot.result, policy))
    }

    fn lock_runs(&self) -> MutexGuard<'_, ()> {
        match self.shared.run_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.latest_generation() == generation
    }

    fn run(&self, generation: u64, text: String, settings: MatchSettings, window: Window) -> RunOutcome {
        let _guard = self.lock_runs();

        if !self.is_current(generation) {
            log::trace!("Generation {generation} superseded before start");
            return RunOutcome::Superseded;
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.compute(generation, &text, settings, window)
        }));

        match outcome {
            Ok(Ok(Some(snapshot))) => {
                if self.commit(snapshot) {
                    RunOutcome::Committed(generation)
                } else {
                    RunOutcome::Superseded
                }
            }
            Ok(Ok(None)) | Ok(Err(FinderError::Cancelled)) => {
                log::trace!("Generation {generation} superseded");
                RunOutcome::Superseded
            }
            Ok(Err(err)) => {
                log::error!("Duplicate search failed ({settings}): {err}");
                RunOutcome::Failed(err.to_string())
            }
            Err(_) => {
                log::error!("Duplicate search panicked ({settings})");
                RunOutcome::Failed("duplicate search panicked".to_string())
            }
        }
    }

    /// Compute a snapshot, or `None` once superseded.
    fn compute(
        &self,
        generation: u64,
        text: &str,
        settings: MatchSettings,
        window: Window,
    ) -> Result<Option<Snapshot>, FinderError> {
        let mut config = FinderConfig::default()
            .with_window(window)
            .with_cancel_token(CancelToken::for_generation(
                Arc::clone(&self.shared.latest),
                generation,
            ));
        if let Some(ref callback) = self.shared.progress_callback {
            config = config.with_progress_callback(Arc::clone(callback));
        }

        let (result, summary) = DuplicateFinder::new(config).find_duplicates(text)?;

        if !self.is_current(generation) {
            return Ok(None);
        }
        let report = render_report(&result.duplicates, ReportStyle::Interactive);
        let highlights = compute_highlights(&result, settings.mode);

        Ok(Some(Snapshot {
            generation,
            text: text.to_string(),
            settings,
            result,
            report,
            highlights,
            summary,
        }))
    }

    /// Publish `snapshot` unless it is stale. Returns whether it was published.
    fn commit(&self, snapshot: Snapshot) -> bool {
        if !self.is_current(snapshot.generation) {
            return false;
        }

        let mut slot = match self.shared.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if slot
            .as_ref()
            .is_some_and(|current| current.generation >= snapshot.generation)
        {
            return false;
        }

        log::debug!(
            "Committed generation {}: {}",
            snapshot.generation,
            snapshot.summary.status_line()
        );
        *slot = Some(Arc::new(snapshot));
        true
    }
}

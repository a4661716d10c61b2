//! Progress reporting utilities using indicatif.
//!
//! [`Progress`] implements [`ProgressCallback`] with a single spinner that
//! names the current pipeline phase. It is used by the batch surface; the
//! interactive surface renders its own status line instead.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for pipeline phases.
///
/// Phases are `"indexing"`, `"windowing"`, `"grouping"` and `"removing"`.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase
    /// * `total` - Number of items the phase will process (0 if unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called when a phase completes.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase
    /// * `processed` - Number of items produced by the phase
    fn on_phase_end(&self, phase: &str, processed: usize);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Spinner-based progress reporter.
pub struct Progress {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupline::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// assert!(progress.is_quiet());
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            spinner: Mutex::new(None),
            quiet,
        }
    }

    /// Whether output is suppressed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn with_spinner(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        // A poisoned lock only means a previous update panicked; keep going.
        let mut guard = match self.spinner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let message = if total > 0 {
            format!("{} ({} items)", phase_label(phase), total)
        } else {
            phase_label(phase).to_string()
        };

        self.with_spinner(|slot| {
            let pb = slot.get_or_insert_with(|| {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            });
            pb.set_message(message);
        });
    }

    fn on_phase_end(&self, phase: &str, processed: usize) {
        if self.quiet {
            return;
        }

        log::trace!("Phase {phase} produced {processed} item(s)");
        if phase == "grouping" || phase == "removing" {
            self.with_spinner(|slot| {
                if let Some(pb) = slot.take() {
                    pb.finish_and_clear();
                }
            });
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.with_spinner(|slot| {
            if let Some(ref pb) = slot {
                pb.set_message(message.to_string());
            }
        });
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.with_spinner(|slot| {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        });
    }
}

fn phase_label(phase: &str) -> &str {
    match phase {
        "indexing" => "Indexing lines",
        "windowing" => "Selecting windows",
        "grouping" => "Grouping duplicates",
        "removing" => "Planning removal",
        other => other,
    }
}

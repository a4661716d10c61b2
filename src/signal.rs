//! Signal handling and cancellation tokens.
//!
//! A single Ctrl+C handler sets a shared `AtomicBool`. The batch surface hands
//! that flag to the duplicate finder as its [`CancelToken`]; the live pipeline
//! builds generation tokens instead, so a newer run supersedes an older one.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dupline::signal::install_handler;
//! use dupline::duplicates::FinderConfig;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let config = FinderConfig::default().with_cancel_token(handler.token());
//! ```
//!
//! # Exit Codes
//!
//! When a signal is received the flag is set, "Interrupted." is printed to
//! stderr and the application exits with code 130 (128 + SIGINT).

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Cooperative cancellation signal polled between pipeline phases.
#[derive(Debug, Clone, Default)]
pub enum CancelToken {
    /// Never cancelled.
    #[default]
    Never,
    /// Cancelled once the shared flag becomes `true`.
    Flag(Arc<AtomicBool>),
    /// Cancelled once the shared counter has moved past `generation`.
    Generation {
        /// Latest generation issued
        latest: Arc<AtomicU64>,
        /// Generation this token belongs to
        generation: u64,
    },
}

impl CancelToken {
    /// Token backed by a shutdown flag.
    #[must_use]
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self::Flag(flag)
    }

    /// Token that is cancelled as soon as `latest` differs from `generation`.
    #[must_use]
    pub fn for_generation(latest: Arc<AtomicU64>, generation: u64) -> Self {
        Self::Generation { latest, generation }
    }

    /// Whether the holder should stop as soon as possible.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Never => false,
            Self::Flag(flag) => flag.load(Ordering::SeqCst),
            Self::Generation { latest, generation } => latest.load(Ordering::SeqCst) != *generation,
        }
    }
}

/// Centralized shutdown handler for graceful application termination.
///
/// `Send` and `Sync`; clones share the same flag.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a new shutdown handler with the flag initially cleared.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the shared flag.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Cancellation token observing this handler.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken::from_flag(self.get_flag())
    }

    /// Clear the flag so the handler can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that sets the shutdown flag on interrupt.
///
/// Calling it again returns the already installed handler with its flag
/// reset, so integration tests can call `run_app()` repeatedly in one
/// process.
///
/// # Errors
///
/// Never fails in practice: if the hook cannot be registered an unhooked
/// handler is returned, which still honours `request_shutdown()`.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);

        let _ = writeln!(std::io::stderr(), "\nInterrupted.");
        let _ = std::io::stderr().flush();

        log::debug!("Shutdown signal received");
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(err) => {
            if let Some(existing) = GLOBAL_HANDLER.get() {
                existing.reset();
                Ok(existing.clone())
            } else {
                log::debug!("Ctrl+C handler unavailable ({err}), using unhooked handler");
                let fallback = ShutdownHandler::new();
                let _ = GLOBAL_HANDLER.set(fallback.clone());
                Ok(fallback)
            }
        }
    }
}

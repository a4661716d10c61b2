//! dupline - Duplicate Line Finder
//!
//! Detects, reports and removes duplicate lines of a text, comparing either
//! whole lines or a fixed character window of every line. Ships a batch
//! command (`dupline scan`) and an interactive terminal view (`dupline view`)
//! that re-runs the search on every change.
//!
//! # Example
//!
//! ```
//! use dupline::duplicates::DuplicateFinder;
//! use dupline::output::{render_report, ReportStyle};
//!
//! let (result, _summary) = DuplicateFinder::with_defaults()
//!     .find_duplicates("Rex\nMilou\nRex")
//!     .unwrap();
//! assert_eq!(render_report(&result.duplicates, ReportStyle::Batch), "Rex[1,3]");
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;
pub mod tui;

use std::fs;
use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use crate::actions::plan_removal;
use crate::cli::{Cli, Commands, OutputFormat, ScanArgs, ViewArgs};
use crate::config::{Config, FileSettingsStore, SettingsStore};
use crate::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use crate::error::{AppError, ExitCode};
use crate::output::{render_report, JsonOutput, ReportStyle};
use crate::progress::Progress;
use crate::scanner::Window;
use crate::signal::{install_handler, CancelToken};

/// Run the application for parsed arguments.
///
/// Output goes to stdout (or the requested output file); errors are
/// returned for the caller to print.
///
/// # Errors
///
/// Returns an [`AppError`] for missing or unreadable files and invalid
/// configuration, and other errors for unexpected failures.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let handler = install_handler()?;

    match &cli.command {
        Commands::Scan(args) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            run_scan(&cli, args, handler.token(), &mut out)
        }
        Commands::View(args) => run_view(&cli, args),
    }
}

/// Run the batch surface, writing to `out` when no output file is given.
///
/// Validation happens in this order: missing input, unreadable input,
/// invalid configuration. Nothing is scanned unless all three pass.
///
/// # Errors
///
/// Same as [`run_app`].
pub fn run_scan<W: Write>(
    cli: &Cli,
    args: &ScanArgs,
    cancel_token: CancelToken,
    out: &mut W,
) -> anyhow::Result<ExitCode> {
    let Some(input) = args.input.as_deref() else {
        return Err(AppError::MissingInput.into());
    };

    let text = fs::read_to_string(input).map_err(|source| AppError::InputUnavailable {
        path: input.to_path_buf(),
        source,
    })?;

    let config = Config::load(cli.config.as_deref())
        .map_err(AppError::Configuration)?
        .with_cli(&args.matching);
    let window = Window::from_settings(config.mode, config.offset, config.length)
        .map_err(AppError::Configuration)?;

    log::debug!(
        "Scanning {} ({} bytes) with window {window}",
        input.display(),
        text.len()
    );

    let progress = Arc::new(Progress::new(cli.quiet));
    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_window(window)
            .with_cancel_token(cancel_token)
            .with_progress_callback(progress),
    );

    let rendered = match finder.find_duplicates(&text) {
        Ok((result, summary)) => {
            let plan = args
                .remove_duplicates
                .then(|| plan_removal(&result, config.remove_mode));
            if let Some(ref plan) = plan {
                log::info!("{}", plan.summary());
            }

            match args.format {
                OutputFormat::Json => {
                    let mut json = JsonOutput::new(&result, &summary, ExitCode::Success);
                    if let Some(ref plan) = plan {
                        json = json.with_removal(plan);
                    }
                    json.to_json_pretty()
                        .context("Failed to serialize JSON output")?
                }
                OutputFormat::Text => match plan {
                    Some(plan) => plan.to_text(),
                    None => render_report(&result.duplicates, ReportStyle::Batch),
                },
            }
        }
        Err(FinderError::Cancelled) => {
            log::debug!("Scan of {} interrupted", input.display());
            return Ok(ExitCode::Interrupted);
        }
        Err(FinderError::Configuration(err)) => {
            return Err(AppError::Configuration(err).into());
        }
    };

    match args.output_file.as_deref() {
        Some(path) => {
            fs::write(path, &rendered).map_err(|source| AppError::OutputUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
            log::debug!("Wrote {} bytes to {}", rendered.len(), path.display());
        }
        None => {
            writeln!(out, "{rendered}").context("Failed to write to stdout")?;
            out.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(ExitCode::Success)
}

fn run_view(cli: &Cli, args: &ViewArgs) -> anyhow::Result<ExitCode> {
    let text = fs::read_to_string(&args.path).map_err(|source| AppError::InputUnavailable {
        path: args.path.clone(),
        source,
    })?;

    // Kept apart from the config file, which `scan` reads.
    let store: Box<dyn SettingsStore> = match cli.config.as_deref() {
        Some(path) => Box::new(FileSettingsStore::beside(path)),
        None => Box::new(FileSettingsStore::platform_default().map_err(AppError::Configuration)?),
    };
    let stored = Config::load_for_view(cli.config.as_deref(), store.as_ref())
        .map_err(AppError::Configuration)?;
    let mut config = stored.with_cli(&args.matching);
    if let Some(theme) = args.theme {
        config.theme = theme;
    }

    let target = args.output_file.clone().unwrap_or_else(|| args.path.clone());
    tui::run_tui(text, target, config, store)?;
    Ok(ExitCode::Success)
}

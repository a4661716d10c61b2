//! Command-line interface definitions for dupline.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, error format, config file) apply to every
//! subcommand.
//!
//! # Example
//!
//! ```bash
//! # Report duplicate lines
//! dupline scan -i dogs.txt
//!
//! # Compare characters 2..6 of every line
//! dupline scan -i codes.txt -m offset-length --off 2 --len 4
//!
//! # Remove duplicates, keeping the last occurrence, into a new file
//! dupline scan -i dogs.txt --rd --rdm keep-last -o deduped.txt
//!
//! # Interactive view
//! dupline view dogs.txt
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::actions::RetentionPolicy;
use crate::scanner::MatchMode;

/// Find and remove duplicate lines in a text file.
///
/// Duplicates are whole lines, or fixed character windows of each line in
/// offset-length mode.
#[derive(Debug, Parser)]
#[command(name = "dupline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file to use instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report or remove duplicate lines of a file
    Scan(ScanArgs),
    /// Review duplicates interactively
    View(ViewArgs),
}

/// Matching options shared by both subcommands.
///
/// Unset options fall back to the configuration file and environment.
#[derive(Debug, Clone, Default, Args)]
pub struct MatchArgs {
    /// Matching mode
    #[arg(short, long, value_enum)]
    pub mode: Option<MatchMode>,

    /// Zero-based character offset of the compared window (offset-length mode)
    #[arg(long, visible_alias = "off", value_name = "N")]
    pub offset: Option<usize>,

    /// Character length of the compared window (offset-length mode)
    #[arg(long, visible_alias = "len", value_name = "N")]
    pub length: Option<usize>,

    /// Which occurrence of each duplicate survives a removal
    #[arg(long, visible_alias = "rdm", value_enum, value_name = "POLICY")]
    pub remove_duplicates_mode: Option<RetentionPolicy>,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Input text file
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Matching options
    #[command(flatten)]
    pub matching: MatchArgs,

    /// Remove duplicates and output the remaining text instead of a report
    #[arg(long, visible_alias = "rd")]
    pub remove_duplicates: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the view subcommand.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Text file to review
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// File written by the save key (defaults to FILE)
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Matching options
    #[command(flatten)]
    pub matching: MatchArgs,

    /// Color theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,
}

/// Output format of the scan subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text: a report or the remaining lines
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Color theme of the interactive view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeArg {
    /// Detect from the terminal
    #[default]
    Auto,
    /// Dark background
    Dark,
    /// Light background
    Light,
}

impl std::fmt::Display for ThemeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeArg::Auto => write!(f, "auto"),
            ThemeArg::Dark => write!(f, "dark"),
            ThemeArg::Light => write!(f, "light"),
        }
    }
}

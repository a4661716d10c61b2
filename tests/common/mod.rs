//! Shared helpers for integration tests.

#![allow(dead_code)]

use clap::Parser;
use dupline::cli::{Cli, Commands};
use dupline::error::ExitCode;
use dupline::run_scan;
use dupline::signal::CancelToken;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DOGS: &str =
    "Rex\nRintintin\nMilou\nIdefix\nLassie\nKlebar\nKador\nMilou\nRex\nSnoopy\nMilou";

pub const CODES: &str = "00aaaa0000\n11bbbb1111\n22cccc2222\n33dddd3333\n44eeee4444\n\
55aaaa5555\n66ffff6666\n77gggg7777\n88dddd8888\n99hhhh9999";

pub const NO_DUPLICATES: &str = "a\nb\nc";

/// A temporary directory with an empty config file, so that no user or
/// platform configuration leaks into the test.
pub struct Workspace {
    pub dir: TempDir,
    pub config: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run `dupline scan <args>` with the given cancellation token.
    pub fn scan_with(&self, args: &[&str], token: CancelToken) -> (anyhow::Result<ExitCode>, String) {
        let config = self.config.to_string_lossy().into_owned();
        let mut argv = vec!["dupline", "-q", "--config", config.as_str(), "scan"];
        argv.extend_from_slice(args);

        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Scan(ref scan_args) = cli.command else {
            panic!("Expected Scan command");
        };

        let mut out = Vec::new();
        let result = run_scan(&cli, scan_args, token, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    pub fn scan(&self, args: &[&str]) -> (anyhow::Result<ExitCode>, String) {
        self.scan_with(args, CancelToken::default())
    }
}

pub fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

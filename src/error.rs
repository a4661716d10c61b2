//! Structured error handling and exit codes.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Exit codes for the dupline application.
///
/// - 0: Success (report or deduplicated text was written)
/// - -1: Failure (missing/unreadable input, invalid configuration, unexpected error)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: The pipeline ran and its output was written.
    Success = 0,
    /// Failure: Input or configuration problem, or an unexpected error.
    Failure = -1,
    /// Interrupted: The run was cancelled by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DL000",
            Self::Failure => "DL001",
            Self::Interrupted => "DL130",
        }
    }
}

/// Invalid or incomplete matching configuration.
///
/// Detected before any scanning happens and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Offset/length mode was selected without both parameters.
    #[error("offset and length parameters become mandatory when mode is OffsetLength")]
    MissingOffsetOrLength,

    /// The window length must cover at least one character.
    #[error("length must be at least 1 when mode is OffsetLength")]
    InvalidLength,

    /// A retention policy name that does not exist.
    #[error("unsupported retention policy '{value}'{}", suggestion_suffix(.suggestion))]
    UnsupportedPolicy {
        value: String,
        suggestion: Option<String>,
    },

    /// A matching mode name that does not exist.
    #[error("unsupported matching mode '{value}'{}", suggestion_suffix(.suggestion))]
    UnsupportedMode {
        value: String,
        suggestion: Option<String>,
    },

    /// The configuration file or environment could not be read.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" - did you mean '{s}'?"))
        .unwrap_or_default()
}

/// Pick the closest known name for a mistyped value.
///
/// Returns `None` when nothing is reasonably close.
#[must_use]
pub fn closest_match(value: &str, candidates: &[&str]) -> Option<String> {
    let value = value.to_lowercase();
    candidates
        .iter()
        .map(|c| (c, strsim::jaro_winkler(&value, c)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| (*c).to_string())
}

/// Errors surfaced by the batch surface before or around the pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    /// No input file was given.
    #[error("Missing Input parameter")]
    MissingInput,

    /// The input file does not exist or cannot be read.
    #[error("Input file '{}' was not found or could not be read", .path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("Output file '{}' could not be written", .path.display())]
    OutputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid matching configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

/// Message printed for any failure that is not an [`AppError`].
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred while processing duplicates";

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DL001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from a message and an exit code.
    #[must_use]
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: message.into(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

/// Turn an application error into the message shown to the user.
///
/// Known errors keep their own message; anything else collapses to
/// [`GENERIC_ERROR_MESSAGE`].
#[must_use]
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AppError>() {
        Some(app_err) => app_err.to_string(),
        None => match err.downcast_ref::<ConfigError>() {
            Some(config_err) => config_err.to_string(),
            None => GENERIC_ERROR_MESSAGE.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Failure.as_i32(), -1);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_exit_code_prefixes() {
        assert_eq!(ExitCode::Success.code_prefix(), "DL000");
        assert_eq!(ExitCode::Failure.code_prefix(), "DL001");
        assert_eq!(ExitCode::Interrupted.code_prefix(), "DL130");
    }

    #[test]
    fn test_missing_offset_message() {
        assert_eq!(
            ConfigError::MissingOffsetOrLength.to_string(),
            "offset and length parameters become mandatory when mode is OffsetLength"
        );
    }

    #[test]
    fn test_missing_input_message() {
        assert_eq!(AppError::MissingInput.to_string(), "Missing Input parameter");
    }

    #[test]
    fn test_input_unavailable_names_file() {
        let err = AppError::InputUnavailable {
            path: PathBuf::from("dogs.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("dogs.txt"));
    }

    #[test]
    fn test_unsupported_policy_with_suggestion() {
        let err = ConfigError::UnsupportedPolicy {
            value: "keep-frist".to_string(),
            suggestion: Some("keep-first".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unsupported retention policy 'keep-frist' - did you mean 'keep-first'?"
        );
    }

    #[test]
    fn test_unsupported_policy_without_suggestion() {
        let err = ConfigError::UnsupportedPolicy {
            value: "zzz".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unsupported retention policy 'zzz'");
    }

    #[test]
    fn test_closest_match() {
        let candidates = ["keep-first", "keep-last", "remove-all"];
        assert_eq!(
            closest_match("keep-frist", &candidates),
            Some("keep-first".to_string())
        );
        assert_eq!(
            closest_match("KEEP-LAST", &candidates),
            Some("keep-last".to_string())
        );
        assert_eq!(closest_match("banana", &candidates), None);
    }

    #[test]
    fn test_user_message_known_and_generic() {
        let known = anyhow::Error::new(AppError::MissingInput);
        assert_eq!(user_message(&known), "Missing Input parameter");

        let config = anyhow::Error::new(ConfigError::MissingOffsetOrLength);
        assert!(user_message(&config).contains("mandatory"));

        let other = anyhow::anyhow!("boom");
        assert_eq!(user_message(&other), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_user_message_wrapped_config_error() {
        let err = anyhow::Error::new(AppError::Configuration(ConfigError::InvalidLength));
        assert!(user_message(&err).contains("at least 1"));
    }

    #[test]
    fn test_structured_error() {
        let structured = StructuredError::new("Missing Input parameter", ExitCode::Failure);
        assert_eq!(structured.code, "DL001");
        assert_eq!(structured.exit_code, -1);
        assert!(!structured.interrupted);

        let json = serde_json::to_string(&structured).unwrap();
        assert!(json.contains("\"code\":\"DL001\""));
    }
}

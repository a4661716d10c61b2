use crate::common::{arg, Workspace, CODES, DOGS};
use dupline::error::{user_message, AppError, ConfigError, ExitCode, StructuredError};
use dupline::signal::CancelToken;
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[test]
fn test_missing_input() {
    let ws = Workspace::new();

    let (result, out) = ws.scan(&[]);
    let err = result.unwrap_err();
    assert_eq!(user_message(&err), "Missing Input parameter");
    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::MissingInput)));
    assert!(out.is_empty());
}

#[test]
fn test_missing_input_reported_before_configuration() {
    let ws = Workspace::new();

    let (result, _) = ws.scan(&["-m", "offset-length"]);
    assert_eq!(user_message(&result.unwrap_err()), "Missing Input parameter");
}

#[test]
fn test_missing_offset() {
    let ws = Workspace::new();
    let input = ws.file("codes.txt", CODES);

    let (result, out) = ws.scan(&["-i", &arg(&input), "-m", "offset-length", "--length", "1"]);
    assert_eq!(
        user_message(&result.unwrap_err()),
        "offset and length parameters become mandatory when mode is OffsetLength"
    );
    assert!(out.is_empty());
}

#[test]
fn test_missing_length() {
    let ws = Workspace::new();
    let input = ws.file("codes.txt", CODES);

    let (result, _) = ws.scan(&["-i", &arg(&input), "-m", "offset-length", "--offset", "1"]);
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::Configuration(ConfigError::MissingOffsetOrLength))
    ));
}

#[test]
fn test_zero_length_rejected() {
    let ws = Workspace::new();
    let input = ws.file("codes.txt", CODES);

    let (result, _) = ws.scan(&["-i", &arg(&input), "-m", "offset-length", "--off", "1", "--len", "0"]);
    assert!(user_message(&result.unwrap_err()).contains("at least 1"));
}

#[test]
fn test_line_mode_ignores_offset_and_length() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (result, out) = ws.scan(&["-i", &arg(&input), "--off", "3"]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(out.trim_end(), "Rex[1,9]\nMilou[3,8,11]");
}

#[test]
fn test_input_not_found_names_file() {
    let ws = Workspace::new();
    let missing = ws.path("nowhere.txt");

    let (result, _) = ws.scan(&["-i", &arg(&missing)]);
    let message = user_message(&result.unwrap_err());
    assert!(message.contains("nowhere.txt"), "{message}");
}

#[test]
fn test_unreadable_input_reported_before_configuration() {
    let ws = Workspace::new();
    let missing = ws.path("nowhere.txt");

    let (result, _) = ws.scan(&["-i", &arg(&missing), "-m", "offset-length"]);
    assert!(matches!(
        result.unwrap_err().downcast_ref::<AppError>(),
        Some(AppError::InputUnavailable { .. })
    ));
}

#[test]
fn test_output_not_writable() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);
    let output = ws.path("missing-dir").join("out.txt");

    let (result, _) = ws.scan(&["-i", &arg(&input), "-o", &arg(&output)]);
    let message = user_message(&result.unwrap_err());
    assert!(message.contains("out.txt"), "{message}");
}

#[test]
fn test_unknown_policy_in_config_suggests() {
    let ws = Workspace::new();
    fs::write(&ws.config, "remove_mode = \"keep-frist\"\n").unwrap();
    let input = ws.file("dogs.txt", DOGS);

    let (result, _) = ws.scan(&["-i", &arg(&input), "--rd"]);
    let message = user_message(&result.unwrap_err());
    assert!(message.contains("keep-frist"), "{message}");
    assert!(message.contains("did you mean 'keep-first'"), "{message}");
}

#[test]
fn test_unknown_mode_in_config() {
    let ws = Workspace::new();
    fs::write(&ws.config, "mode = \"lines\"\n").unwrap();
    let input = ws.file("dogs.txt", DOGS);

    let (result, _) = ws.scan(&["-i", &arg(&input)]);
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::Configuration(ConfigError::UnsupportedMode { .. }))
    ));
}

#[test]
fn test_missing_explicit_config_file() {
    let ws = Workspace::new();
    fs::remove_file(&ws.config).unwrap();
    let input = ws.file("dogs.txt", DOGS);

    let (result, _) = ws.scan(&["-i", &arg(&input)]);
    assert!(user_message(&result.unwrap_err()).contains("config.toml"));
}

#[test]
fn test_interrupted_run_writes_nothing() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);
    let output = ws.path("out.txt");
    let token = CancelToken::from_flag(Arc::new(AtomicBool::new(true)));

    let (result, out) = ws.scan_with(&["-i", &arg(&input), "-o", &arg(&output)], token);
    assert_eq!(result.unwrap(), ExitCode::Interrupted);
    assert!(out.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_structured_error_for_failure() {
    let structured = StructuredError::new("Missing Input parameter", ExitCode::Failure);
    let json = serde_json::to_value(&structured).unwrap();
    assert_eq!(json["code"], "DL001");
    assert_eq!(json["exit_code"], -1);
    assert_eq!(json["message"], "Missing Input parameter");
}

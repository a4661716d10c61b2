use crate::common::{arg, Workspace, CODES, DOGS, NO_DUPLICATES};
use dupline::config::{Config, FileSettingsStore, SettingsStore};
use dupline::error::ExitCode;
use dupline::tui::{Action, App};
use std::fs;

#[test]
fn test_scan_line_mode_no_duplicate() {
    let ws = Workspace::new();
    let input = ws.file("plain.txt", NO_DUPLICATES);

    let (result, out) = ws.scan(&["-i", &arg(&input)]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(out, "No duplicate found\n");
}

#[test]
fn test_scan_line_mode_duplicates() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (result, out) = ws.scan(&["-i", &arg(&input), "-m", "line"]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(out.trim_end(), "Rex[1,9]\nMilou[3,8,11]");
}

#[test]
fn test_scan_offset_length_duplicates() {
    let ws = Workspace::new();
    let input = ws.file("codes.txt", CODES);

    let (result, out) = ws.scan(&[
        "-i",
        &arg(&input),
        "-m",
        "offset-length",
        "--offset",
        "2",
        "--length",
        "4",
    ]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(out.trim_end(), "aaaa[1,6]\ndddd[4,9]");
}

#[test]
fn test_scan_offset_length_no_duplicate() {
    let ws = Workspace::new();
    let input = ws.file("codes.txt", CODES);

    let (result, out) = ws.scan(&["-i", &arg(&input), "-m", "offset-length", "--off", "6", "--len", "2"]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(out.trim_end(), "No duplicate found");
}

#[test]
fn test_remove_keep_first() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (result, out) = ws.scan(&["-i", &arg(&input), "--rd", "--rdm", "keep-first"]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(
        out.trim_end(),
        "Rex\nRintintin\nMilou\nIdefix\nLassie\nKlebar\nKador\nSnoopy"
    );
}

#[test]
fn test_remove_default_policy_is_keep_first() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (_, explicit) = ws.scan(&["-i", &arg(&input), "--rd", "--rdm", "keep-first"]);
    let (_, default) = ws.scan(&["-i", &arg(&input), "--remove-duplicates"]);
    assert_eq!(explicit, default);
}

#[test]
fn test_remove_keep_last() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (result, out) = ws.scan(&["-i", &arg(&input), "--rd", "--rdm", "keep-last"]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(
        out.trim_end(),
        "Rintintin\nIdefix\nLassie\nKlebar\nKador\nRex\nSnoopy\nMilou"
    );
}

#[test]
fn test_remove_all() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (result, out) = ws.scan(&["-i", &arg(&input), "--rd", "--rdm", "remove-all"]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(out.trim_end(), "Rintintin\nIdefix\nLassie\nKlebar\nKador\nSnoopy");
}

#[test]
fn test_offset_length_remove_policies() {
    let ws = Workspace::new();
    let input = ws.file("codes.txt", CODES);
    let base = ["-i", &arg(&input), "-m", "offset-length", "--off", "2", "--len", "4", "--rd", "--rdm"];

    let run = |policy: &str| {
        let mut args = base.to_vec();
        args.push(policy);
        let (result, out) = ws.scan(&args);
        assert_eq!(result.unwrap(), ExitCode::Success);
        out.trim_end().to_string()
    };

    assert_eq!(
        run("keep-first"),
        "00aaaa0000\n11bbbb1111\n22cccc2222\n33dddd3333\n44eeee4444\n66ffff6666\n77gggg7777\n99hhhh9999"
    );
    assert_eq!(
        run("keep-last"),
        "11bbbb1111\n22cccc2222\n44eeee4444\n55aaaa5555\n66ffff6666\n77gggg7777\n88dddd8888\n99hhhh9999"
    );
    assert_eq!(
        run("remove-all"),
        "11bbbb1111\n22cccc2222\n44eeee4444\n66ffff6666\n77gggg7777\n99hhhh9999"
    );
}

#[test]
fn test_output_file_gets_exact_text() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);
    let output = ws.path("report.txt");

    let (result, out) = ws.scan(&["-i", &arg(&input), "-o", &arg(&output)]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(out.is_empty());
    assert_eq!(fs::read_to_string(&output).unwrap(), "Rex[1,9]\nMilou[3,8,11]");
}

#[test]
fn test_output_file_with_removal() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);
    let output = ws.path("deduped.txt");

    let (result, _) = ws.scan(&["-i", &arg(&input), "--rd", "-o", &arg(&output)]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Rex\nRintintin\nMilou\nIdefix\nLassie\nKlebar\nKador\nSnoopy"
    );
    // The input is never touched.
    assert_eq!(fs::read_to_string(&input).unwrap(), DOGS);
}

#[test]
fn test_crlf_input_removal_uses_lf() {
    let ws = Workspace::new();
    let input = ws.file("crlf.txt", "a\r\nb\r\na\r\n");

    let (_, report) = ws.scan(&["-i", &arg(&input)]);
    assert_eq!(report.trim_end(), "a[1,3]");

    let (_, removed) = ws.scan(&["-i", &arg(&input), "--rd"]);
    assert_eq!(removed, "a\nb\n\n");
}

#[test]
fn test_empty_lines_never_grouped() {
    let ws = Workspace::new();
    let input = ws.file("blank.txt", "\n\nx\n\n");

    let (_, out) = ws.scan(&["-i", &arg(&input)]);
    assert_eq!(out.trim_end(), "No duplicate found");
}

#[test]
fn test_json_report() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (result, out) = ws.scan(&["-i", &arg(&input), "-f", "json"]);
    assert_eq!(result.unwrap(), ExitCode::Success);

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["duplicates"][0]["value"], "Rex");
    assert_eq!(value["duplicates"][1]["lines"], serde_json::json!([3, 8, 11]));
    assert_eq!(value["summary"]["total_lines"], 11);
    assert_eq!(value["summary"]["duplicate_groups"], 2);
    assert!(value["removal"].is_null());
}

#[test]
fn test_json_with_removal() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (_, out) = ws.scan(&["-i", &arg(&input), "-f", "json", "--rd", "--rdm", "remove-all"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["removal"]["policy"], "remove-all");
    assert_eq!(value["removal"]["removed_lines"], serde_json::json!([1, 3, 8, 9, 11]));
    assert_eq!(
        value["removal"]["text"],
        "Rintintin\nIdefix\nLassie\nKlebar\nKador\nSnoopy"
    );
}

#[test]
fn test_config_file_supplies_settings() {
    let ws = Workspace::new();
    fs::write(
        &ws.config,
        "mode = \"offset-length\"\noffset = 2\nlength = 4\nremove_mode = \"remove-all\"\n",
    )
    .unwrap();
    let input = ws.file("codes.txt", CODES);

    let (_, report) = ws.scan(&["-i", &arg(&input)]);
    assert_eq!(report.trim_end(), "aaaa[1,6]\ndddd[4,9]");

    let (_, removed) = ws.scan(&["-i", &arg(&input), "--rd"]);
    assert_eq!(removed.lines().count(), 6);
}

#[test]
fn test_cli_overrides_config_file() {
    let ws = Workspace::new();
    fs::write(&ws.config, "mode = \"offset-length\"\noffset = 2\nlength = 4\n").unwrap();
    let input = ws.file("dogs.txt", DOGS);

    let (_, out) = ws.scan(&["-i", &arg(&input), "-m", "line"]);
    assert_eq!(out.trim_end(), "Rex[1,9]\nMilou[3,8,11]");
}

#[test]
fn test_view_settings_do_not_change_scan() {
    let ws = Workspace::new();
    let input = ws.file("dogs.txt", DOGS);

    let (_, before) = ws.scan(&["-i", &arg(&input)]);
    assert_eq!(before.trim_end(), "Rex[1,9]\nMilou[3,8,11]");

    // A view session that switched to offset-length mode, then quit.
    let mut app = App::new(DOGS, &Config::default(), &input);
    app.handle_action(Action::ToggleMode);
    app.handle_action(Action::Quit);
    let store = FileSettingsStore::beside(&ws.config);
    store.save(&app.config()).unwrap();

    assert_ne!(store.path(), ws.config.as_path());
    assert_eq!(fs::read_to_string(&ws.config).unwrap(), "");

    let (result, after) = ws.scan(&["-i", &arg(&input)]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(after, before);

    // The next view session starts where the last one ended.
    let restored = Config::load_for_view(Some(&ws.config), &store).unwrap();
    assert_eq!(restored, app.config());
}

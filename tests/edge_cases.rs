use dupline::actions::{plan_removal, RetentionPolicy};
use dupline::duplicates::{DuplicateFinder, FinderConfig, SearchResult};
use dupline::output::{render_report, ReportStyle};
use dupline::scanner::{MatchMode, Window};

fn search(text: &str, window: Window) -> SearchResult {
    DuplicateFinder::new(FinderConfig::default().with_window(window))
        .find_duplicates(text)
        .unwrap()
        .0
}

fn fixed(offset: usize, length: usize) -> Window {
    Window::from_settings(MatchMode::OffsetLength, Some(offset), Some(length)).unwrap()
}

#[test]
fn test_empty_text() {
    let result = search("", Window::WholeLine);
    assert_eq!(result.lines.len(), 1);
    assert!(!result.has_duplicates());
    assert_eq!(render_report(&result.duplicates, ReportStyle::Batch), "No duplicate found");
    assert_eq!(render_report(&result.duplicates, ReportStyle::Interactive), "");
}

#[test]
fn test_trailing_newline_adds_empty_line() {
    let result = search("a\na\n", Window::WholeLine);
    assert_eq!(result.lines.len(), 3);
    assert_eq!(render_report(&result.duplicates, ReportStyle::Batch), "a[1,2]");
}

#[test]
fn test_lone_cr_is_content() {
    // "a\rb" is one line and differs from "a"
    let result = search("a\rb\na\nb", Window::WholeLine);
    assert_eq!(result.lines.len(), 3);
    assert_eq!(result.lines[0].raw_value, "a\rb");
    assert!(!result.has_duplicates());
}

#[test]
fn test_mixed_terminators_compare_equal() {
    let result = search("x\r\nx\nx", Window::WholeLine);
    assert_eq!(render_report(&result.duplicates, ReportStyle::Batch), "x[1,2,3]");
}

#[test]
fn test_whitespace_is_significant() {
    let result = search("a\na \n a", Window::WholeLine);
    assert!(!result.has_duplicates());
}

#[test]
fn test_window_past_line_end_is_ignored() {
    // Lines shorter than offset + length have no searched value
    let result = search("ab\nab\nabcd\nzzcd", fixed(2, 2));
    assert_eq!(render_report(&result.duplicates, ReportStyle::Batch), "cd[3,4]");
}

#[test]
fn test_window_counts_characters() {
    let result = search("éa1\nüa2\nea3", fixed(1, 1));
    assert_eq!(render_report(&result.duplicates, ReportStyle::Batch), "a[1,2,3]");

    let record = &result.lines[0];
    assert_eq!(record.searched_offset, 'é'.len_utf8());
    assert_eq!(record.searched_length, 1);
}

#[test]
fn test_window_at_exact_line_end() {
    let result = search("abc\nxbc", fixed(1, 2));
    assert_eq!(render_report(&result.duplicates, ReportStyle::Batch), "bc[1,2]");
}

#[test]
fn test_single_line_never_duplicate() {
    let result = search("only", Window::WholeLine);
    assert!(!result.has_duplicates());
    let plan = plan_removal(&result, RetentionPolicy::RemoveAll);
    assert!(plan.is_noop());
    assert_eq!(plan.to_text(), "only");
}

#[test]
fn test_removal_keeps_unrelated_blank_lines() {
    let result = search("a\n\na\n\nb", Window::WholeLine);
    let plan = plan_removal(&result, RetentionPolicy::KeepFirst);
    assert_eq!(plan.removed_line_numbers, vec![3]);
    assert_eq!(plan.to_text(), "a\n\n\nb");
}

#[test]
fn test_many_groups_keep_first_seen_order() {
    let result = search("b\na\nb\na\nc\nc", Window::WholeLine);
    assert_eq!(
        render_report(&result.duplicates, ReportStyle::Batch),
        "b[1,3]\na[2,4]\nc[5,6]"
    );
}

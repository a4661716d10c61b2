//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! This module handles rendering the user interface including:
//! - Header with the file name, matching settings and run summary
//! - Text pane with duplicate and searched-window highlights
//! - Report pane listing the duplicate groups
//! - Footer with available commands
//! - Modal dialogs for confirmation, help and errors
//!
//! # Example
//!
//! ```no_run
//! use dupline::tui::app::App;
//! use dupline::tui::ui::render;
//! use ratatui::Frame;
//!
//! fn draw(frame: &mut Frame, app: &mut App) {
//!     render(frame, app);
//! }
//! ```

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::{App, AppMode};
use super::events::{footer_hints, HELP_ENTRIES};
use super::theme::Theme;
use crate::duplicates::{HighlightKind, HighlightSpan};
use crate::logging::current_level_name;
use crate::scanner::{LineRecord, MatchMode};

fn create_block(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .title(title.into())
}

/// Render the TUI based on current application state.
///
/// Takes the app mutably to record the height of the text pane for paging.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Main layout: header, content, status, footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(3), // Footer
        ])
        .split(area);

    // Borders take two rows.
    app.set_visible_rows(usize::from(chunks[1].height.saturating_sub(2)));

    render_header(frame, app, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    if app.error_message().is_some() {
        render_error_dialog(frame, app, area);
        return;
    }

    match app.mode() {
        AppMode::Confirming => render_confirm_dialog(frame, app, area),
        AppMode::ShowingHelp => render_help_dialog(frame, app, area),
        AppMode::Reviewing | AppMode::Quitting => {}
    }
}

/// Render the header with title, settings and stats.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let file_name = app.target().to_string_lossy();
    let modified = if app.is_dirty() { " [modified]" } else { "" };

    let settings = app.settings();
    let window = match settings.mode {
        MatchMode::Line => "whole line".to_string(),
        MatchMode::OffsetLength => format!(
            "offset {} length {}",
            settings.offset.unwrap_or_default(),
            settings.length.unwrap_or_default()
        ),
    };

    let stats = match app.snapshot() {
        Some(snapshot) if app.is_current() => snapshot.summary.status_line(),
        Some(_) | None => "searching...".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("dupline - {}{modified}", truncate_string(&file_name, 40)),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" | {window}"), Style::default().fg(theme.normal)),
        Span::styled(
            format!(" | {}", app.policy()),
            Style::default().fg(theme.secondary),
        ),
        Span::styled(format!(" | {stats}"), Style::default().fg(theme.dim)),
    ]))
    .alignment(Alignment::Center)
    .block(create_block("").border_style(Style::default().fg(theme.primary)));

    frame.render_widget(header, area);
}

/// Render the text and report panes side by side.
fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_text_pane(frame, app, panes[0]);
    render_report_pane(frame, app, panes[1]);
}

fn render_text_pane(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let rows = usize::from(area.height.saturating_sub(2));

    let lines: Vec<Line> = match app.snapshot() {
        Some(snapshot) => {
            let width = snapshot.result.lines.len().to_string().len();
            snapshot
                .result
                .lines
                .iter()
                .skip(app.scroll())
                .take(rows)
                .map(|record| {
                    let spans = spans_for_line(app.highlights(), record.line_number);
                    let mut line = vec![Span::styled(
                        format!("{:>width$} ", record.line_number),
                        Style::default().fg(theme.dim),
                    )];
                    line.extend(highlight_line(record, spans, theme));
                    Line::from(line)
                })
                .collect()
        }
        None => vec![Line::from(Span::styled(
            "Searching...",
            Style::default().fg(theme.dim),
        ))],
    };

    let text = Paragraph::new(Text::from(lines))
        .block(create_block(" Text ").border_style(Style::default().fg(theme.dim)));
    frame.render_widget(text, area);
}

fn render_report_pane(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let lines: Vec<Line> = if app.report().is_empty() {
        vec![Line::from(Span::styled(
            "No duplicates",
            Style::default().fg(theme.success),
        ))]
    } else {
        app.report()
            .split("\r\n")
            .map(|entry| Line::from(Span::styled(entry.to_string(), Style::default().fg(theme.danger))))
            .collect()
    };

    let report = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(create_block(" Duplicates ").border_style(Style::default().fg(theme.dim)));
    frame.render_widget(report, area);
}

/// Spans of `line_number`, given spans sorted by line number.
fn spans_for_line(spans: &[HighlightSpan], line_number: usize) -> &[HighlightSpan] {
    let start = spans.partition_point(|s| s.line_number < line_number);
    let end = spans.partition_point(|s| s.line_number <= line_number);
    &spans[start..end]
}

/// Split a line into styled spans. Empty and overlapping spans are skipped.
fn highlight_line(record: &LineRecord, spans: &[HighlightSpan], theme: &Theme) -> Vec<Span<'static>> {
    let raw = record.raw_value.as_str();
    let plain = Style::default().fg(theme.normal);
    let mut out = Vec::new();
    let mut cursor = 0;

    for span in spans.iter().filter(|s| s.length > 0) {
        let Some(start) = span.start.checked_sub(record.start_offset) else {
            continue;
        };
        let end = start + span.length;
        if start < cursor {
            continue;
        }
        let (Some(before), Some(marked)) = (raw.get(cursor..start), raw.get(start..end)) else {
            continue;
        };
        if !before.is_empty() {
            out.push(Span::styled(before.to_string(), plain));
        }
        let color = match span.kind {
            HighlightKind::Duplicate => theme.danger,
            HighlightKind::SearchedWindow => theme.success,
        };
        out.push(Span::styled(
            marked.to_string(),
            Style::default().fg(theme.inverted_fg).bg(color),
        ));
        cursor = end;
    }

    if let Some(rest) = raw.get(cursor..) {
        if !rest.is_empty() {
            out.push(Span::styled(rest.to_string(), plain));
        }
    }
    out
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(app.status().unwrap_or_default().to_string())
        .style(Style::default().fg(app.theme().secondary));
    frame.render_widget(status, area);
}

/// Render the footer with available commands.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let spans: Vec<Span> = footer_hints(app.mode())
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(
                    format!("[{key}]"),
                    Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{desc} "), Style::default().fg(theme.normal)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(create_block("").border_style(Style::default().fg(theme.dim)));
    frame.render_widget(footer, area);
}

/// Render confirmation dialog.
fn render_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let dialog_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, dialog_area);

    let groups = app.snapshot().map_or(0, |s| s.result.duplicates.len());
    let lines = vec![
        Line::from(Span::styled(
            "Remove Duplicates",
            Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Apply '{}' to {groups} group(s)?", app.policy())),
        Line::from(Span::styled(
            app.policy().description(),
            Style::default().fg(theme.secondary),
        )),
        Line::from(""),
        Line::from("The file is only changed when you save with [w]."),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Remove    [n] Cancel",
            Style::default().fg(theme.primary),
        )),
    ];

    let confirm = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(create_block(" Confirm ").border_style(Style::default().fg(theme.danger)));
    frame.render_widget(confirm, dialog_area);
}

fn render_help_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let dialog_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, dialog_area);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Keybinding Reference",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(HELP_ENTRIES.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(
                format!("{key:<14}"),
                Style::default().fg(theme.secondary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(*desc, Style::default().fg(theme.normal)),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Log level: {}", current_level_name()),
        Style::default().fg(theme.dim),
    )));
    lines.push(Line::from(Span::styled(
        "Press Esc or ? to close",
        Style::default().fg(theme.dim),
    )));

    let help = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(create_block(" Help ").border_style(Style::default().fg(theme.primary)));
    frame.render_widget(help, dialog_area);
}

fn render_error_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.theme();
    let dialog_area = centered_rect(60, 20, area);
    frame.render_widget(Clear, dialog_area);

    let message = app.error_message().unwrap_or("Unknown error");
    let error = Paragraph::new(vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to dismiss",
            Style::default().fg(theme.dim),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(create_block("").border_style(Style::default().fg(theme.danger)));
    frame.render_widget(error, dialog_area);
}

// ==================== Helper Functions ====================

/// Truncate a string with ellipsis if it exceeds `max_len` characters.
///
/// # Examples
///
/// ```
/// use dupline::tui::ui::truncate_string;
///
/// assert_eq!(truncate_string("hello", 10), "hello");
/// assert_eq!(truncate_string("hello world", 8), "hello...");
/// ```
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    }
}

/// Create a centered rectangle with given percentage of parent.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

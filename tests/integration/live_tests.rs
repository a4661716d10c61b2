use crate::common::{CODES, DOGS};
use dupline::actions::RetentionPolicy;
use dupline::duplicates::{count_by_kind, HighlightKind, LivePipeline, MatchSettings, RunOutcome};

#[test]
fn test_burst_of_triggers_ends_on_latest() {
    let pipeline = LivePipeline::new();
    let handles: Vec<_> = (1..=20)
        .map(|length| {
            pipeline
                .trigger(CODES, MatchSettings::offset_length(2, length % 4 + 1))
                .unwrap()
        })
        .collect();

    let outcomes: Vec<RunOutcome> = handles.into_iter().map(|h| h.join()).collect();
    assert_eq!(outcomes.last(), Some(&RunOutcome::Committed(20)));
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, RunOutcome::Committed(_) | RunOutcome::Superseded)));

    // Generation 20 used length 20 % 4 + 1 = 1.
    let snapshot = pipeline.snapshot().unwrap();
    assert_eq!(snapshot.generation, 20);
    assert_eq!(snapshot.settings, MatchSettings::offset_length(2, 1));
    assert_eq!(snapshot.report, "a [1,6]\r\nd [4,9]");
}

#[test]
fn test_offset_length_highlights() {
    let pipeline = LivePipeline::new();
    let outcome = pipeline
        .trigger(CODES, MatchSettings::offset_length(2, 4))
        .unwrap()
        .join();
    assert_eq!(outcome, RunOutcome::Committed(1));

    let snapshot = pipeline.snapshot().unwrap();
    assert_eq!(snapshot.report, "aaaa [1,6]\r\ndddd [4,9]");
    assert_eq!(count_by_kind(&snapshot.highlights), (4, 6));

    // Line 2 is "11bbbb1111", starting at byte 11.
    let window = snapshot
        .highlights
        .iter()
        .find(|s| s.line_number == 2)
        .unwrap();
    assert_eq!(window.kind, HighlightKind::SearchedWindow);
    assert_eq!((window.start, window.length), (13, 4));

    let lines: Vec<usize> = snapshot.highlights.iter().map(|s| s.line_number).collect();
    assert_eq!(lines, (1..=10).collect::<Vec<_>>());
}

#[test]
fn test_remove_feeds_back_into_trigger() {
    let pipeline = LivePipeline::new();
    let _ = pipeline.trigger(DOGS, MatchSettings::whole_line()).unwrap().join();

    let plan = pipeline.remove(RetentionPolicy::RemoveAll).unwrap();
    assert_eq!(plan.removed_count(), 5);

    let outcome = pipeline
        .trigger(plan.to_text(), MatchSettings::whole_line())
        .unwrap()
        .join();
    assert_eq!(outcome, RunOutcome::Committed(2));

    let snapshot = pipeline.snapshot().unwrap();
    assert_eq!(snapshot.text, "Rintintin\nIdefix\nLassie\nKlebar\nKador\nSnoopy");
    assert_eq!(snapshot.report, "");
    assert!(snapshot.highlights.is_empty());
}

#[test]
fn test_remove_before_first_commit() {
    let pipeline = LivePipeline::new();
    assert!(pipeline.remove(RetentionPolicy::KeepFirst).is_none());
}

#[test]
fn test_cancel_pending_keeps_previous_snapshot() {
    let pipeline = LivePipeline::new();
    let _ = pipeline.trigger(DOGS, MatchSettings::whole_line()).unwrap().join();

    pipeline.cancel_pending();
    let snapshot = pipeline.snapshot().unwrap();
    assert_eq!(snapshot.generation, 1);
    assert_eq!(pipeline.latest_generation(), 2);
}

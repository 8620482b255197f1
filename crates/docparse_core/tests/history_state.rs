use std::sync::Once;

use docparse_core::{HistoryEntry, HistoryState, PREVIEW_CHARS};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

#[test]
fn replace_swaps_the_whole_list() {
    init_logging();
    let mut state = HistoryState::new();
    state.replace(vec![
        HistoryEntry::from_record(json!({"id": 1, "result": "first"})),
        HistoryEntry::from_record(json!({"id": 2, "result": "second"})),
    ]);
    assert_eq!(state.entries().len(), 2);

    state.replace(vec![HistoryEntry::from_record(
        json!({"id": 3, "result": "third"}),
    )]);
    assert_eq!(state.entries().len(), 1);
    assert_eq!(state.entries()[0].record["id"], json!(3));
}

#[test]
fn clear_is_idempotent() {
    init_logging();
    let mut state = HistoryState::new();
    state.replace(vec![HistoryEntry::from_record(json!({"result": "x"}))]);

    state.clear();
    assert!(state.entries().is_empty());
    state.clear();
    assert!(state.entries().is_empty());
}

#[test]
fn entry_preview_flattens_newlines_and_truncates() {
    init_logging();
    let result = format!("line1\nline2\n{}", "x".repeat(74));
    let entry = HistoryEntry::from_record(json!({"id": 9, "result": result}));

    assert_eq!(
        entry.short_preview,
        format!("line1 line2 {}...", "x".repeat(68))
    );
    assert_eq!(entry.short_preview.len(), PREVIEW_CHARS + "...".len());
    // The raw record is kept untouched for the detail view.
    assert_eq!(entry.record["id"], json!(9));
}

#[test]
fn entry_without_result_field_gets_empty_preview_base() {
    init_logging();
    let entry = HistoryEntry::from_record(json!({"id": 4}));
    assert_eq!(entry.short_preview, "...");
}

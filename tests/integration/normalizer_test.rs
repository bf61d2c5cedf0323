//! Normalizer Integration Tests

use sales_assistant_core::{Citation, StreamEvent};
use sales_assistant_llm::{normalize, normalize_content};
use serde_json::json;

#[test]
fn test_fold_text_sql_and_citations() {
    // agent wire shape uses `event`/`data.delta`; `kind` is accepted too
    let events = json!([
        {"kind": "message.delta", "data": {"delta": {"content": [{"type": "text", "text": "A"}]}}},
        {"kind": "other"},
        {"kind": "message.delta", "data": {"delta": {"content": [
            {"type": "tool_results", "tool_results": {"content": [
                {"type": "json", "json": {
                    "text": "B",
                    "sql": "SELECT 1",
                    "searchResults": [{"source_id": "s1", "doc_id": "d1"}]
                }}
            ]}}
        ]}}}
    ]);
    let events: Vec<StreamEvent> = serde_json::from_value(events).unwrap();

    let response = normalize(&events);

    assert_eq!(response.text, "AB");
    assert_eq!(response.sql, "SELECT 1");
    assert_eq!(
        response.citations,
        vec![Citation {
            source_id: "s1".to_string(),
            doc_id: "d1".to_string()
        }]
    );
}

#[test]
fn test_malformed_content_degrades_to_empty() {
    assert!(normalize_content("not json").is_empty());
    assert!(normalize_content("{\"event\": \"message.delta\"}").is_empty());
    assert!(normalize_content("[{\"event\": \"message.delta\", \"data\": 5}]").is_empty());
}

#[test]
fn test_last_sql_wins_and_citations_keep_duplicates() {
    let content = json!([
        {"event": "message.delta", "data": {"delta": {"content": [
            {"type": "tool_results", "tool_results": {"content": [
                {"type": "json", "json": {"sql": "SELECT 1", "searchResults": [{"doc_id": "d1"}]}},
                {"type": "json", "json": {"sql": "SELECT 2", "searchResults": [{"doc_id": "d1"}]}}
            ]}}
        ]}}}
    ])
    .to_string();

    let response = normalize_content(&content);

    assert_eq!(response.sql, "SELECT 2");
    assert_eq!(response.citations.len(), 2);
    assert_eq!(response.citations[0].source_id, "");
}

#[test]
fn test_off_type_fields_do_not_drop_the_event() {
    let content = json!([
        {"event": "message.delta", "data": {"delta": {"content": [
            {"type": "text", "text": "Deals grew."},
            {"type": "tool_results", "tool_results": {"content": [
                {"type": "json", "json": {
                    "sql": "SELECT 1",
                    "searchResults": [{"source_id": 1, "doc_id": "c7"}]
                }}
            ]}},
            {"type": "tool_results", "tool_results": {"content": [
                {"type": "json", "json": {"text": " More.", "searchResults": null}}
            ]}}
        ]}}}
    ])
    .to_string();

    let response = normalize_content(&content);

    assert_eq!(response.text, "Deals grew. More.");
    assert_eq!(response.sql, "SELECT 1");
    assert_eq!(
        response.citations,
        vec![Citation {
            source_id: "1".to_string(),
            doc_id: "c7".to_string()
        }]
    );
}

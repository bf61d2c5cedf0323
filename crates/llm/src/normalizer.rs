//! Event Stream Normalizer
//!
//! Folds the heterogeneous event array returned by the agent into a single
//! `(text, sql, citations)` result.

use sales_assistant_core::streaming::{
    Citation, ContentFragment, NormalizedResponse, StreamEvent, ToolResultItem,
};
use serde_json::Value;

use crate::types::{LlmError, LlmResult};

/// Fold events into a `NormalizedResponse`.
///
/// - only `message.delta` events contribute
/// - text is concatenated in encounter order with no separator
/// - `sql` is last-writer-wins across tool results
/// - citations accumulate in encounter order, duplicates kept
///
/// Final text and sql are trimmed.
pub fn normalize(events: &[StreamEvent]) -> NormalizedResponse {
    let mut text = String::new();
    let mut sql = String::new();
    let mut citations: Vec<Citation> = Vec::new();

    for event in events.iter().filter(|e| e.is_message_delta()) {
        for fragment in &event.data.delta.content {
            match fragment {
                ContentFragment::Text { text: t } => text.push_str(t),
                ContentFragment::ToolResults { tool_results } => {
                    for item in &tool_results.content {
                        let ToolResultItem::Json { json } = item else {
                            continue;
                        };
                        if let Some(t) = &json.text {
                            text.push_str(t);
                        }
                        if let Some(s) = &json.sql {
                            sql = s.clone();
                        }
                        citations.extend(json.search_results.iter().map(Citation::from));
                    }
                }
                ContentFragment::Other => {}
            }
        }
    }

    NormalizedResponse {
        text: text.trim().to_string(),
        sql: sql.trim().to_string(),
        citations,
    }
}

/// Parse the JSON-encoded event array of a completion response.
///
/// Fails only when the envelope itself is not a JSON array. An entry that
/// is not an event object is skipped; inside an event, malformed fragments
/// and tool results are dropped one at a time.
pub fn parse_event_envelope(content: &str) -> LlmResult<Vec<StreamEvent>> {
    let raw: Vec<Value> = serde_json::from_str(content).map_err(|e| LlmError::ParseError {
        message: format!("event envelope is not a JSON array: {}", e),
    })?;

    Ok(raw
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<StreamEvent>(v) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!("skipping malformed stream event: {}", e);
                None
            }
        })
        .collect())
}

/// Parse and fold in one step; an unparseable envelope folds to the empty response.
pub fn normalize_content(content: &str) -> NormalizedResponse {
    match parse_event_envelope(content) {
        Ok(events) => normalize(&events),
        Err(e) => {
            tracing::warn!("{}", e);
            NormalizedResponse::default()
        }
    }
}

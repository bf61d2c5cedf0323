//! Streamed Response Event Types
//!
//! Wire types for the event array returned by the agent endpoint, and the
//! folded `NormalizedResponse` every consumer works with. Every field is
//! defaulted so that a partially populated event still deserializes. A list
//! entry or nested object of the wrong shape is dropped on its own and its
//! siblings are kept. The fold itself lives in the `llm` crate.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The only event kind that carries content fragments.
pub const MESSAGE_DELTA: &str = "message.delta";

/// One unit of a streamed, multi-part model/tool response.
///
/// Wire shape: `{"event": "message.delta", "data": {"delta": {"content": [...]}}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamEvent {
    #[serde(default, alias = "kind")]
    pub event: String,
    #[serde(default, deserialize_with = "lenient")]
    pub data: EventData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventData {
    #[serde(default, deserialize_with = "lenient")]
    pub delta: Delta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Delta {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub content: Vec<ContentFragment>,
}

/// A single content fragment inside a `message.delta` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentFragment {
    /// Plain text, already segmented by the producer
    Text {
        #[serde(default)]
        text: String,
    },

    /// Output of a tool the agent invoked (analyst, search, ...)
    ToolResults {
        #[serde(default, deserialize_with = "lenient")]
        tool_results: ToolResults,
    },

    /// Anything else (thinking, tool_use, ...) is carried but ignored
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolResults {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub content: Vec<ToolResultItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResultItem {
    Json {
        #[serde(default, deserialize_with = "lenient")]
        json: ToolResultPayload,
    },
    #[serde(other)]
    Other,
}

/// JSON payload of a tool result. Each field is optional on the wire; a
/// field of the wrong type reads as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolResultPayload {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub sql: Option<String>,
    #[serde(default, rename = "searchResults", deserialize_with = "lenient_seq")]
    pub search_results: Vec<SearchResult>,
}

/// A search hit as emitted by the search tool.
///
/// Ids arrive as strings or numbers depending on the search service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(default)]
    pub source_id: Option<Value>,
    #[serde(default)]
    pub doc_id: Option<Value>,
}

/// A reference to a source document backing part of an answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    pub source_id: String,
    pub doc_id: String,
}

impl From<&SearchResult> for Citation {
    fn from(sr: &SearchResult) -> Self {
        Citation {
            source_id: id_string(sr.source_id.as_ref()),
            doc_id: id_string(sr.doc_id.as_ref()),
        }
    }
}

fn id_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Any value that does not fit `T` (including `null`) reads as `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A non-array reads as empty; array entries that do not fit `T` are dropped.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("skipping malformed stream entry: {}", e);
                None
            }
        })
        .collect())
}

/// The uniform result of folding a stream of events.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NormalizedResponse {
    pub text: String,
    pub sql: String,
    pub citations: Vec<Citation>,
}

impl NormalizedResponse {
    /// True when the fold produced no text, no SQL, and no citations.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.sql.is_empty() && self.citations.is_empty()
    }
}

impl StreamEvent {
    /// A `message.delta` event with a single text fragment.
    pub fn text_delta(text: impl Into<String>) -> Self {
        Self::delta(vec![ContentFragment::Text { text: text.into() }])
    }

    /// A `message.delta` event with the given fragments.
    pub fn delta(content: Vec<ContentFragment>) -> Self {
        StreamEvent {
            event: MESSAGE_DELTA.to_string(),
            data: EventData {
                delta: Delta { content },
            },
        }
    }

    pub fn is_message_delta(&self) -> bool {
        self.event == MESSAGE_DELTA
    }
}

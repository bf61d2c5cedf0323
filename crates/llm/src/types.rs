//! Completion Request/Response Types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A content part of a message. Only text is sent by this application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: Vec<MessageContent>,
}

impl Message {
    /// Create a user message with a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![MessageContent::Text { text: text.into() }],
        }
    }
}

/// A tool the agent may invoke, e.g. `{"tool_spec": {"type": "cortex_search", "name": "search1"}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    pub tool_spec: ToolSpecBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpecBody {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
}

impl ToolSpec {
    pub fn new(tool_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tool_spec: ToolSpecBody {
                tool_type: tool_type.into(),
                name: name.into(),
            },
        }
    }
}

/// Body posted to the agent endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,
    /// Per-tool resources keyed by tool name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tool_resources: BTreeMap<String, serde_json::Value>,
}

impl CompletionRequest {
    /// A tool-less request with a single user message.
    pub fn prompt(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(text)],
            tools: Vec::new(),
            tool_resources: BTreeMap::new(),
        }
    }
}

/// Raw answer from the agent endpoint.
///
/// `content` is the JSON-encoded event array; it is only meaningful when
/// `status` is a success code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionResponse {
    pub status: u16,
    pub content: String,
}

impl CompletionResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Errors raised by completion providers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Missing or rejected credentials
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Rate limit exceeded
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Invalid request (bad parameters)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Server error from the provider
    #[error("Server error ({status}): {message}")]
    ServerError { message: String, status: u16 },

    /// Network/connection error, including timeouts
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// Response parsing error
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Provider misconfiguration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Other error
    #[error("{message}")]
    Other { message: String },
}

/// Result type for completion operations
pub type LlmResult<T> = Result<T, LlmError>;

//! Completion Provider Trait
//!
//! Defines the interface the address extractor, analyst service, and plain
//! completion fallback use to reach the language-model agent.

use async_trait::async_trait;

use crate::types::{CompletionRequest, CompletionResponse, LlmError, LlmResult};

/// Trait that every completion backend implements.
///
/// `complete` returns `Ok` for any HTTP answer, including non-success
/// statuses, so callers can apply their own status policy. `Err` is reserved
/// for transport failures (connect, timeout, unreadable body).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider name for logging and notices.
    fn name(&self) -> &'static str;

    /// Returns the model requests are issued against.
    fn model(&self) -> &str;

    /// Issue one request and return the raw status and event-array content.
    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse>;
}

/// Helper function to create an error for a missing access token
pub fn missing_token_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("access token not configured for {}", provider),
    }
}

/// Map a non-success HTTP status to an error.
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid token", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status,
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}

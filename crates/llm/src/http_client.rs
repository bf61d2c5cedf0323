//! HTTP Client Factory
//!
//! Every collaborator client in the workspace is built here so the
//! configured timeout is the single timeout layer.

use std::time::Duration;

use crate::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` with the given request timeout.
pub fn build_http_client(timeout: Duration) -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config {
            message: format!("failed to build HTTP client: {}", e),
        })
}

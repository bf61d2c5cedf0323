//! Cortex Agent Provider
//!
//! Implementation of the CompletionProvider trait for the Snowflake Cortex
//! agent endpoint (`/api/v2/cortex/agent:run`).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::http_client::build_http_client;
use crate::provider::{missing_token_error, CompletionProvider};
use crate::types::{CompletionRequest, CompletionResponse, LlmError, LlmResult};

/// Path of the agent endpoint, relative to the account URL
pub const AGENT_RUN_PATH: &str = "/api/v2/cortex/agent:run";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-4-sonnet";

/// Default request timeout (50 s)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(50_000);

/// Connection settings for the agent endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CortexConfig {
    /// e.g. `https://myorg-myaccount.snowflakecomputing.com`
    pub account_url: String,
    pub token: Option<String>,
    /// Value for `X-Snowflake-Authorization-Token-Type`, when the token needs one
    pub token_type: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for CortexConfig {
    fn default() -> Self {
        Self {
            account_url: String::new(),
            token: None,
            token_type: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Cortex agent provider
pub struct CortexAgentProvider {
    config: CortexConfig,
    client: reqwest::Client,
}

impl CortexAgentProvider {
    /// Create a new provider with the given configuration
    pub fn new(config: CortexConfig) -> LlmResult<Self> {
        let client = build_http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CortexConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.account_url.trim_end_matches('/'),
            AGENT_RUN_PATH
        )
    }
}

#[async_trait]
impl CompletionProvider for CortexAgentProvider {
    fn name(&self) -> &'static str {
        "cortex"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: CompletionRequest) -> LlmResult<CompletionResponse> {
        let token = self
            .config
            .token
            .as_ref()
            .ok_or_else(|| missing_token_error("cortex"))?;

        let mut builder = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json, text/event-stream")
            .json(&request);
        if let Some(token_type) = &self.config.token_type {
            builder = builder.header("X-Snowflake-Authorization-Token-Type", token_type);
        }

        tracing::debug!(
            model = %request.model,
            tools = request.tools.len(),
            "posting agent request"
        );

        let response = builder.send().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        let content = if status == 200 {
            sse_to_event_array(&body)
        } else {
            body
        };

        Ok(CompletionResponse { status, content })
    }
}

/// Fold a server-sent-event body into the JSON event-array form.
///
/// A body that is already a JSON array is returned unchanged. Otherwise each
/// `event:`/`data:` block becomes `{"event": <name>, "data": <json>}`;
/// `[DONE]` markers and data that is not JSON are skipped.
pub fn sse_to_event_array(body: &str) -> String {
    if body.trim_start().starts_with('[') {
        return body.to_string();
    }

    let mut events: Vec<Value> = Vec::new();
    let mut event_name: Option<String> = None;
    let mut data = String::new();

    let mut flush = |event_name: &mut Option<String>, data: &mut String| {
        let payload = std::mem::take(data);
        let name = event_name.take();
        let payload = payload.trim();
        if payload.is_empty() || payload == "[DONE]" {
            return;
        }
        match serde_json::from_str::<Value>(payload) {
            Ok(json) => events.push(serde_json::json!({
                "event": name.unwrap_or_default(),
                "data": json,
            })),
            Err(e) => tracing::debug!("skipping non-JSON SSE data: {}", e),
        }
    };

    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            flush(&mut event_name, &mut data);
        } else if let Some(rest) = line.strip_prefix("event:") {
            event_name = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.trim_start());
        }
        // id:, retry:, and ':' comment lines carry nothing we use
    }
    flush(&mut event_name, &mut data);

    Value::Array(events).to_string()
}

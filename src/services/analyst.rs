//! Analyst Service
//!
//! Sends free-form questions to the agent with the analyst (text-to-SQL),
//! search and maps tools attached, and folds the answer into a
//! `NormalizedResponse`. Also provides the tool-less completion the router
//! falls back to when the analyst answer is empty.

use std::collections::BTreeMap;
use std::sync::Arc;

use sales_assistant_core::{NormalizedResponse, Notice, NoticeSink};
use sales_assistant_llm::{
    normalize_content, parse_http_error, CompletionProvider, CompletionRequest,
    CompletionResponse, Message, ToolSpec,
};
use serde_json::json;

use crate::models::settings::CortexSettings;

pub const ANALYST_TOOL: &str = "analyst1";
pub const SEARCH_TOOL: &str = "search1";
pub const MAPS_TOOL: &str = "here_maps";

/// Resources attached to the analyst and search tools
#[derive(Debug, Clone, PartialEq)]
pub struct AnalystTools {
    pub semantic_model_file: String,
    pub search_service: String,
    pub search_id_column: String,
    pub search_limit: u32,
}

impl From<&CortexSettings> for AnalystTools {
    fn from(settings: &CortexSettings) -> Self {
        Self {
            semantic_model_file: settings.semantic_model_file.clone(),
            search_service: settings.search_service.clone(),
            search_id_column: settings.search_id_column.clone(),
            search_limit: settings.search_limit,
        }
    }
}

pub struct AnalystService {
    provider: Arc<dyn CompletionProvider>,
    notices: Arc<dyn NoticeSink>,
    tools: AnalystTools,
}

impl AnalystService {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        notices: Arc<dyn NoticeSink>,
        tools: AnalystTools,
    ) -> Self {
        Self {
            provider,
            notices,
            tools,
        }
    }

    /// Build the tool-enabled request for `query`.
    pub fn analyst_request(&self, query: &str) -> CompletionRequest {
        let mut tool_resources = BTreeMap::new();
        tool_resources.insert(
            ANALYST_TOOL.to_string(),
            json!({ "semantic_model_file": self.tools.semantic_model_file }),
        );
        tool_resources.insert(
            SEARCH_TOOL.to_string(),
            json!({
                "name": self.tools.search_service,
                "max_results": self.tools.search_limit,
                "id_column": self.tools.search_id_column,
            }),
        );

        CompletionRequest {
            model: self.provider.model().to_string(),
            messages: vec![Message::user(query)],
            tools: vec![
                ToolSpec::new("cortex_analyst_text_to_sql", ANALYST_TOOL),
                ToolSpec::new("cortex_search", SEARCH_TOOL),
                ToolSpec::new("http_request", MAPS_TOOL),
            ],
            tool_resources,
        }
    }

    /// Ask the analyst. Failures are reported and yield an empty response.
    pub async fn ask(&self, query: &str) -> NormalizedResponse {
        match self.send(self.analyst_request(query)).await {
            Some(response) => {
                let normalized = normalize_content(&response.content);
                tracing::info!(
                    text_len = normalized.text.len(),
                    has_sql = !normalized.sql.is_empty(),
                    citations = normalized.citations.len(),
                    "analyst answered"
                );
                normalized
            }
            None => NormalizedResponse::default(),
        }
    }

    /// Tool-less completion. Failures are reported and yield `""`.
    pub async fn complete_plain(&self, query: &str) -> String {
        let request = CompletionRequest::prompt(self.provider.model(), query);
        match self.send(request).await {
            Some(response) => normalize_content(&response.content).text,
            None => String::new(),
        }
    }

    async fn send(&self, request: CompletionRequest) -> Option<CompletionResponse> {
        match self.provider.complete(request).await {
            Ok(response) if response.is_success() => Some(response),
            Ok(response) => {
                let error =
                    parse_http_error(response.status, &response.content, self.provider.name());
                tracing::debug!(%error, "agent request rejected");
                self.notices.notify(Notice::CompletionStatus {
                    status: response.status,
                });
                None
            }
            Err(e) => {
                self.notices
                    .notify(Notice::transport(self.provider.name(), e.to_string()));
                None
            }
        }
    }
}

//! Request Intake
//!
//! Pending container requests come from an unread-mail table. The completion
//! service extracts the interesting fields in the same statement, so each
//! row already carries an extraction envelope next to the raw body.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::request::{ExtractedFields, Request, ReviewDecision};
use crate::services::sql::{quote_literal, SqlExecutor};
use crate::utils::error::AppResult;

/// Rows fetched per batch
pub const PENDING_LIMIT: usize = 5;

const DEFAULT_TABLE: &str = "emails_webinar_202508";

const EXTRACTION_INSTRUCTIONS: &str = "Extract a JSON object with exactly these keys: \
\"container_format\",\"quantity\",\"date_needed\",\"requester\". \
Output only the JSON object (no markdown).";

/// Source of pending requests.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn fetch_pending_requests(&self) -> AppResult<Vec<Request>>;
    async fn mark_resolved(&self, id: &str) -> AppResult<()>;
}

/// Unwrap a completion envelope (`{"choices": [{"messages": "<json>"}]}`).
///
/// Returns the inner JSON text and the fields read from it. Anything
/// malformed degrades to empty strings.
pub fn parse_extraction_envelope(envelope: &str) -> (String, ExtractedFields) {
    let outer: Value = serde_json::from_str(envelope).unwrap_or(Value::Null);
    let inner_text = outer
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("messages"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let inner: Value = serde_json::from_str(&inner_text).unwrap_or(Value::Null);
    let field = |key: &str| match inner.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let fields = ExtractedFields {
        container_format: field("container_format"),
        quantity: field("quantity"),
        date_needed: field("date_needed"),
        requester: field("requester"),
    };
    (inner_text, fields)
}

/// [`RequestStore`] over a SQL table of incoming mail.
pub struct SqlRequestStore {
    executor: Arc<dyn SqlExecutor>,
    model: String,
    table: String,
}

impl SqlRequestStore {
    pub fn new(executor: Arc<dyn SqlExecutor>, model: impl Into<String>) -> Self {
        Self {
            executor,
            model: model.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Selects `message_id`, `raw_body` and the extraction envelope, in that order.
    pub fn pending_query(&self) -> String {
        format!(
            "SELECT message_id, body AS raw_body, \
             SNOWFLAKE.CORTEX.COMPLETE({model}, \
             [{{'role': 'system', 'content': {instructions}}}, {{'role': 'user', 'content': body}}], \
             {{}}) AS full_response \
             FROM {table} WHERE is_read = FALSE LIMIT {limit}",
            model = quote_literal(&self.model),
            instructions = quote_literal(EXTRACTION_INSTRUCTIONS),
            table = self.table,
            limit = PENDING_LIMIT,
        )
    }

    pub fn resolve_query(&self, id: &str) -> String {
        format!(
            "UPDATE {} SET is_read = TRUE WHERE message_id = {}",
            self.table,
            quote_literal(id)
        )
    }
}

#[async_trait]
impl RequestStore for SqlRequestStore {
    async fn fetch_pending_requests(&self) -> AppResult<Vec<Request>> {
        let result = self.executor.execute(&self.pending_query()).await?;
        let requests: Vec<Request> = (0..result.rows.len())
            .map(|i| {
                let envelope = result.cell(i, 2).unwrap_or("{}");
                let (json_output, extracted) = parse_extraction_envelope(envelope);
                Request {
                    id: result.cell(i, 0).unwrap_or_default().to_string(),
                    raw_body: result.cell(i, 1).unwrap_or_default().to_string(),
                    json_output,
                    extracted,
                }
            })
            .collect();
        tracing::info!(count = requests.len(), "fetched pending requests");
        Ok(requests)
    }

    async fn mark_resolved(&self, id: &str) -> AppResult<()> {
        self.executor.execute(&self.resolve_query(id)).await?;
        tracing::info!(id, "request marked resolved");
        Ok(())
    }
}

/// Where a review session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Nothing was pending
    Empty,
    /// `index` is zero-based
    Reviewing { index: usize, total: usize },
    Finished,
}

/// Walks a fetched batch of requests one at a time.
pub struct ReviewSession {
    store: Arc<dyn RequestStore>,
    queue: Vec<Request>,
    index: usize,
    decisions: Vec<(String, ReviewDecision)>,
}

impl ReviewSession {
    pub fn new(store: Arc<dyn RequestStore>, queue: Vec<Request>) -> Self {
        Self {
            store,
            queue,
            index: 0,
            decisions: Vec::new(),
        }
    }

    /// Fetch the pending batch from `store` and start reviewing it
    pub async fn load(store: Arc<dyn RequestStore>) -> AppResult<Self> {
        let queue = store.fetch_pending_requests().await?;
        Ok(Self::new(store, queue))
    }

    pub fn state(&self) -> ReviewState {
        if self.queue.is_empty() {
            ReviewState::Empty
        } else if self.index >= self.queue.len() {
            ReviewState::Finished
        } else {
            ReviewState::Reviewing {
                index: self.index,
                total: self.queue.len(),
            }
        }
    }

    pub fn current(&self) -> Option<&Request> {
        self.queue.get(self.index)
    }

    pub fn decisions(&self) -> &[(String, ReviewDecision)] {
        &self.decisions
    }

    pub async fn approve(&mut self) -> AppResult<ReviewState> {
        self.decide(ReviewDecision::Approved).await
    }

    pub async fn reject(&mut self) -> AppResult<ReviewState> {
        self.decide(ReviewDecision::Rejected).await
    }

    /// Move on without resolving the current request
    pub fn advance(&mut self) -> ReviewState {
        if self.index < self.queue.len() {
            self.index += 1;
        }
        self.state()
    }

    /// On store failure the session stays on the current request.
    async fn decide(&mut self, decision: ReviewDecision) -> AppResult<ReviewState> {
        let Some(request) = self.current() else {
            return Ok(self.state());
        };
        let id = request.id.clone();
        self.store.mark_resolved(&id).await?;
        tracing::info!(id = %id, ?decision, "request reviewed");
        self.decisions.push((id, decision));
        Ok(self.advance())
    }
}

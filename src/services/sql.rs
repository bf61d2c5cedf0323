//! SQL Execution
//!
//! Statement execution against the Snowflake SQL API, plus the two query
//! helpers the chat view needs: transcript lookup for citations and running
//! the SQL an analyst answer generated.
//!
//! Statements are submitted as text. Apart from removing `;` there is no
//! escaping of identifiers or values; generated SQL comes from the analyst
//! service and is trusted as-is.

use std::time::Duration;

use async_trait::async_trait;
use sales_assistant_core::{Citation, Notice, NoticeSink};
use sales_assistant_llm::build_http_client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::error::{AppError, AppResult};

/// Path of the statements endpoint, relative to the account URL
pub const STATEMENTS_PATH: &str = "/api/v2/statements";

/// Shown when a citation has no transcript row
pub const NO_TRANSCRIPT: &str = "No transcript available";

/// Tabular result of a statement. Cells are the API's string form; SQL NULL is `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row`, `col`, treating NULL and out-of-range as absent
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

/// Executes SQL text and returns rows.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> AppResult<QueryResult>;
}

/// Remove every `;` so a single statement is submitted.
pub fn prepare_sql(sql: &str) -> String {
    sql.replace(';', "").trim().to_string()
}

/// Quote a value as a SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Lookup statement for the transcript backing a citation.
pub fn transcript_query(doc_id: &str) -> String {
    format!(
        "SELECT transcript_text FROM sales_conversations WHERE conversation_id = {}",
        quote_literal(doc_id)
    )
}

/// Transcript text for `citation`, or [`NO_TRANSCRIPT`].
///
/// A failing query is reported as a notice.
pub async fn fetch_transcript(
    executor: &dyn SqlExecutor,
    notices: &dyn NoticeSink,
    citation: &Citation,
) -> String {
    match executor.execute(&transcript_query(&citation.doc_id)).await {
        Ok(result) => result
            .cell(0, 0)
            .map(str::to_string)
            .unwrap_or_else(|| NO_TRANSCRIPT.to_string()),
        Err(e) => {
            notices.notify(Notice::transport("SQL", e.to_string()));
            NO_TRANSCRIPT.to_string()
        }
    }
}

/// Run SQL produced by the analyst. Failures become notices and `None`.
pub async fn run_generated_sql(
    executor: &dyn SqlExecutor,
    notices: &dyn NoticeSink,
    sql: &str,
) -> Option<QueryResult> {
    let statement = prepare_sql(sql);
    if statement.is_empty() {
        return None;
    }
    match executor.execute(&statement).await {
        Ok(result) => {
            tracing::info!(rows = result.rows.len(), "generated SQL executed");
            Some(result)
        }
        Err(e) => {
            notices.notify(Notice::transport("SQL", e.to_string()));
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlClientConfig {
    pub account_url: String,
    pub token: Option<String>,
    pub token_type: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    /// Server-side timeout in seconds
    timeout: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    #[serde(default)]
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    #[serde(default)]
    row_type: Vec<ColumnType>,
}

#[derive(Debug, Deserialize)]
struct ColumnType {
    name: String,
}

impl From<StatementResponse> for QueryResult {
    fn from(response: StatementResponse) -> Self {
        let columns = response
            .result_set_meta_data
            .map(|m| m.row_type.into_iter().map(|c| c.name).collect())
            .unwrap_or_default();
        QueryResult {
            columns,
            rows: response.data,
        }
    }
}

/// Snowflake SQL API client
pub struct SnowflakeSqlClient {
    config: SqlClientConfig,
    client: reqwest::Client,
}

impl SnowflakeSqlClient {
    pub fn new(config: SqlClientConfig) -> AppResult<Self> {
        let client = build_http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.account_url.trim_end_matches('/'),
            STATEMENTS_PATH
        )
    }
}

#[async_trait]
impl SqlExecutor for SnowflakeSqlClient {
    async fn execute(&self, sql: &str) -> AppResult<QueryResult> {
        let token = self
            .config
            .token
            .as_ref()
            .ok_or_else(|| AppError::config("Snowflake access token not configured"))?;
        let statement = prepare_sql(sql);

        let mut builder = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .json(&StatementRequest {
                statement: &statement,
                timeout: self.config.timeout.as_secs().max(1),
            });
        if let Some(token_type) = &self.config.token_type {
            builder = builder.header("X-Snowflake-Authorization-Token-Type", token_type);
        }

        tracing::debug!(statement = %statement, "executing statement");
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::sql(format!("request failed: {}", e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::sql(format!("failed to read response: {}", e)))?;

        match status {
            200 => {
                let parsed: StatementResponse = serde_json::from_str(&body)?;
                Ok(parsed.into())
            }
            202 => Err(AppError::sql("statement still running after timeout")),
            _ => Err(AppError::sql(format!(
                "HTTP {}: {}",
                status,
                error_message(&body)
            ))),
        }
    }
}

/// `message` field of an API error body, or the body itself
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

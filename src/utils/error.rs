//! Error Handling
//!
//! Unified error types for the application crate.
//! Uses thiserror for ergonomic error definitions.

use sales_assistant_geo::GeoError;
use sales_assistant_llm::LlmError;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQL execution errors
    #[error("SQL error: {0}")]
    Sql(String),

    /// Completion provider errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Map service errors
    #[error("Geo error: {0}")]
    Geo(#[from] GeoError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a SQL error
    pub fn sql(msg: impl Into<String>) -> Self {
        Self::Sql(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

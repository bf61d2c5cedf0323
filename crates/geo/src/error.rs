//! Geo Error Types

use sales_assistant_core::CoreError;
use thiserror::Error;

/// Errors raised by decoding and by the map-service collaborators
#[derive(Error, Debug)]
pub enum GeoError {
    /// A route representation could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request never produced a response (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body was not the expected JSON shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// The primary routing answer decoded to nothing usable
    #[error("No route: {0}")]
    NoRoute(String),

    /// A decoded or geocoded position was out of range
    #[error(transparent)]
    Coordinate(#[from] CoreError),
}

/// Result type alias for geo operations
pub type GeoResult<T> = Result<T, GeoError>;

impl GeoError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        GeoError::Transport(err.to_string())
    }
}

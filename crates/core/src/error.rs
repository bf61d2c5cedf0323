//! Core Error Types
//!
//! Errors raised while constructing core value types. The `llm`, `geo`, and
//! application crates wrap these in their own error enums.

use thiserror::Error;

/// Core error type for the Sales Assistant workspace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Coordinate outside the WGS84 latitude/longitude range, or not finite
    #[error("Coordinate out of range: lat={lat}, lon={lon}")]
    CoordinateOutOfRange { lat: f64, lon: f64 },
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}

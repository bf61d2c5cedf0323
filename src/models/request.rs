//! Request Models
//!
//! Container requests read from the intake mailbox.

use serde::{Deserialize, Serialize};

/// Fields pulled out of a request body by the completion service.
///
/// Every field defaults to `""` when the extraction did not provide it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedFields {
    #[serde(default)]
    pub container_format: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub date_needed: String,
    #[serde(default)]
    pub requester: String,
}

/// A pending request. Read-only once fetched; resolution goes through the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    pub id: String,
    pub raw_body: String,
    /// The inner extraction JSON as returned by the completion service
    pub json_output: String,
    pub extracted: ExtractedFields,
}

/// Reviewer decision on a request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

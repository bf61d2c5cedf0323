//! Notice Channel
//!
//! The caller-facing error channel. Components never raise collaborator
//! failures past their boundary; they convert them into a `Notice`, push it
//! through a `NoticeSink`, and return a sentinel.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A user-facing report emitted while handling a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A collaborator call failed or answered with a non-success status
    TransportFailure { source: String, message: String },

    /// The completion endpoint answered with a non-success HTTP status
    CompletionStatus { status: u16 },

    /// Geocoding found no candidates for an address
    AddressNotFound { address: String },

    /// A two-address query where at least one address did not geocode
    GeocodeIncomplete { addresses: Vec<String> },

    /// Both routing services failed; no coordinates are returned
    RouteUnavailable { message: String },
}

impl Notice {
    pub fn transport(source: impl Into<String>, message: impl Into<String>) -> Self {
        Notice::TransportFailure {
            source: source.into(),
            message: message.into(),
        }
    }

    /// `NotFound`-style notices are expected outcomes, not failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Notice::AddressNotFound { .. } | Notice::GeocodeIncomplete { .. }
        )
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::TransportFailure { source, message } => {
                write!(f, "{} failed: {}", source, message)
            }
            Notice::CompletionStatus { status } => write!(f, "Agent error: {}", status),
            Notice::AddressNotFound { address } => write!(f, "No location found for '{}'", address),
            Notice::GeocodeIncomplete { .. } => {
                write!(f, "Could not geocode one or both addresses.")
            }
            Notice::RouteUnavailable { message } => write!(f, "No route available: {}", message),
        }
    }
}

/// Destination for notices.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards every notice to a channel, logging it on the way.
impl NoticeSink for mpsc::UnboundedSender<Notice> {
    fn notify(&self, notice: Notice) {
        log_notice(&notice);
        // A dropped receiver means nobody is listening any more.
        let _ = self.send(notice);
    }
}

/// In-memory notice collector.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notices collected so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything collected so far.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&self, notice: Notice) {
        log_notice(&notice);
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

fn log_notice(notice: &Notice) {
    if notice.is_not_found() {
        tracing::warn!(%notice, "notice");
    } else {
        tracing::error!(%notice, "notice");
    }
}

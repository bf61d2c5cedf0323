//! Sales Assistant
//!
//! Routes sales questions to the right backend:
//! - address lookups and routes through the HERE map services
//! - analytic questions through the Cortex agent (text-to-SQL and search)
//! - everything else through plain completion
//!
//! Also reviews pending container requests from the intake mailbox.

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// ── Models ─────────────────────────────────────────────────────────────
pub use models::{AppConfig, ChatSession, Request, RoutingOutcome};

// ── Services ───────────────────────────────────────────────────────────
pub use services::{AnalystService, QueryRouter, RequestStore, ReviewSession, SqlExecutor};

// ── State & Errors ─────────────────────────────────────────────────────
pub use state::AppState;
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};

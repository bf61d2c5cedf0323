//! Data Models
//!
//! Plain data types used by the services and the CLI.

pub mod outcome;
pub mod request;
pub mod session;
pub mod settings;

pub use outcome::RoutingOutcome;
pub use request::{ExtractedFields, Request, ReviewDecision};
pub use session::{ChatMessage, ChatRole, ChatSession};
pub use settings::{AppConfig, CortexSettings, HereSettings};

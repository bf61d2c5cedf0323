//! Sales Assistant LLM
//!
//! Everything that talks to the language-model agent:
//! - `CompletionProvider` trait and the Cortex agent HTTP implementation
//! - the event stream normalizer that folds agent events into text/sql/citations
//! - the address extractor used by the query router
//!
//! Also includes the HTTP client factory shared by the workspace.

pub mod cortex;
pub mod extractor;
pub mod http_client;
pub mod normalizer;
pub mod provider;
pub mod types;

// Re-export main types
pub use cortex::{CortexAgentProvider, CortexConfig};
pub use extractor::{between_fallback, build_extraction_prompt, parse_address_array, AddressExtractor};
pub use http_client::build_http_client;
pub use normalizer::{normalize, normalize_content, parse_event_envelope};
pub use provider::{parse_http_error, CompletionProvider};
pub use types::*;

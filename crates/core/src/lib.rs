//! Sales Assistant Core
//!
//! Value types and error types shared by every crate in the Sales Assistant
//! workspace. This crate has no dependency on HTTP clients, language-model
//! providers, or map services.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `geo` - Validated `Coordinate` value type
//! - `streaming` - Streamed response event types and the `NormalizedResponse` fold result
//! - `notice` - The caller-facing error channel (`Notice`, `NoticeSink`, `NoticeLog`)
//!
//! ## Design Principles
//!
//! 1. **Value types only** - every entity here is passed by value or shared reference
//! 2. **No I/O** - collaborators live in the `llm` and `geo` crates
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod geo;
pub mod notice;
pub mod streaming;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Geo Types ──────────────────────────────────────────────────────────
pub use geo::Coordinate;

// ── Notice Channel ─────────────────────────────────────────────────────
pub use notice::{Notice, NoticeLog, NoticeSink};

// ── Streaming Types ────────────────────────────────────────────────────
pub use streaming::{
    Citation, ContentFragment, NormalizedResponse, SearchResult, StreamEvent, ToolResultItem,
    ToolResultPayload, MESSAGE_DELTA,
};

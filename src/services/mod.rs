//! Services
//!
//! Business logic on top of the llm and geo crates.

pub mod analyst;
pub mod intake;
pub mod router;
pub mod sql;

pub use analyst::{AnalystService, AnalystTools};
pub use intake::{
    parse_extraction_envelope, RequestStore, ReviewSession, ReviewState, SqlRequestStore,
};
pub use router::QueryRouter;
pub use sql::{
    fetch_transcript, prepare_sql, run_generated_sql, transcript_query, QueryResult,
    SnowflakeSqlClient, SqlClientConfig, SqlExecutor,
};

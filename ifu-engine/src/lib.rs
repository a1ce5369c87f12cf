//! Session engine for looking up and searching device IFU documents.
//!
//! A scan is parsed into a [`ResolvedIdentity`], completed against the
//! backend when only the model is known, and kept as the session context.
//! Searches, votes and chat questions then run against that context.
//! Every failure can be turned into a user-facing [`Escalation`].
//!
//! # Example
//! ```no_run
//! use ifu_engine::{EngineConfig, IfuEngine, SearchMode};
//!
//! #[tokio::main]
//! async fn main() -> ifu_engine::EngineResult<()> {
//!     let cfg = EngineConfig::from_env()?;
//!     let engine = IfuEngine::from_config(&cfg)?;
//!
//!     engine.scan("https://eifu.art/s?model=Vista%20300").await?;
//!     if let Some(board) = engine.search("alarm", SearchMode::Search).await? {
//!         for item in board.items.iter() {
//!             println!("{} p.{}", item.doc, item.page);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error_handler;
pub mod escalation;
pub mod health;
pub mod resolver;
pub mod session;
pub mod slot;
pub mod telemetry;
pub mod votes;

pub use backend::{
    ChatReply, ChatRequest, HttpBackend, IfuBackend, LookupResponse, SearchMode, SearchQuery,
    SearchResultItem, VoteDirection, VoteTally,
};
pub use config::EngineConfig;
pub use engine::IfuEngine;
pub use error_handler::{ConfigError, EngineResult, IfuEngineError};
pub use escalation::{Escalation, EscalationPolicy, Operation, Outcome};
pub use health::HealthStatus;
pub use scan_payload::ResolvedIdentity;
pub use session::SearchBoard;

//! Backend facade without async-trait or dynamic trait objects.
//!
//! [`IfuBackend`] is the seam between the engine and the remote IFU service.
//! Components are generic over it; the production implementation is
//! [`http::HttpBackend`]. Every method returns the remote outcome as is:
//! classification into silent/transient/blocking happens in
//! [`crate::escalation`], never here.

pub mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use std::future::Future;

pub use http::HttpBackend;
pub use types::*;

use crate::error_handler::EngineResult;

/// Remote operations the engine depends on.
pub trait IfuBackend: Send + Sync {
    /// `GET /api/get_ifu?model=<model>`.
    fn get_ifu(&self, model: &str) -> impl Future<Output = EngineResult<LookupResponse>> + Send;

    /// `GET /api/search_ifu?keyword=&mode=[&assistantid=][&containerid=]`.
    fn search_ifu(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = EngineResult<Vec<SearchResultItem>>> + Send;

    /// `GET /api/vote`.
    fn fetch_votes(&self) -> impl Future<Output = EngineResult<VoteTally>> + Send;

    /// `POST /api/vote` with `{ "type": "up" | "down" }`.
    fn post_vote(
        &self,
        direction: VoteDirection,
    ) -> impl Future<Output = EngineResult<VoteTally>> + Send;

    /// `POST /api/gaia` with `{ text, system_prompt? }`.
    fn chat(&self, request: &ChatRequest) -> impl Future<Output = EngineResult<ChatReply>> + Send;

    /// `GET /api/health`.
    fn health(&self) -> impl Future<Output = EngineResult<HealthReply>> + Send;

    /// Base URL used for reporting.
    fn endpoint(&self) -> &str;
}

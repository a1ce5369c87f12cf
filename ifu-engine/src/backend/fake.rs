//! In-memory backend for unit tests.
//!
//! Counts calls per endpoint and returns canned replies. When a gate is set,
//! every call parks after being counted until the test releases it, which is
//! how overlapping requests are staged.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

use crate::backend::IfuBackend;
use crate::backend::types::*;
use crate::error_handler::{EngineResult, IfuEngineError};

pub(crate) struct FakeBackend {
    pub lookups: AtomicUsize,
    pub searches: AtomicUsize,
    pub vote_fetches: AtomicUsize,
    pub vote_posts: AtomicUsize,
    pub chats: AtomicUsize,
    pub lookup_reply: Mutex<EngineResult<LookupResponse>>,
    pub search_reply: Mutex<EngineResult<Vec<SearchResultItem>>>,
    pub votes_reply: Mutex<EngineResult<VoteTally>>,
    pub chat_reply: Mutex<EngineResult<ChatReply>>,
    pub health_reply: Mutex<EngineResult<HealthReply>>,
    pub last_query: Mutex<Option<SearchQuery>>,
    pub last_chat: Mutex<Option<ChatRequest>>,
    pub last_direction: Mutex<Option<VoteDirection>>,
    gate: Option<Arc<Notify>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            lookups: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
            vote_fetches: AtomicUsize::new(0),
            vote_posts: AtomicUsize::new(0),
            chats: AtomicUsize::new(0),
            lookup_reply: Mutex::new(Ok(LookupResponse::default())),
            search_reply: Mutex::new(Ok(Vec::new())),
            votes_reply: Mutex::new(Ok(VoteTally::default())),
            chat_reply: Mutex::new(Ok(ChatReply::default())),
            health_reply: Mutex::new(Ok(HealthReply {
                status: "ok".into(),
            })),
            last_query: Mutex::new(None),
            last_chat: Mutex::new(None),
            last_direction: Mutex::new(None),
            gate: None,
        }
    }
}

impl FakeBackend {
    /// Every call waits on `gate` after it has been counted.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn with_lookup(self, reply: EngineResult<LookupResponse>) -> Self {
        *self.lookup_reply.lock().unwrap() = reply;
        self
    }

    pub fn with_search(self, reply: EngineResult<Vec<SearchResultItem>>) -> Self {
        *self.search_reply.lock().unwrap() = reply;
        self
    }

    pub fn with_votes(self, reply: EngineResult<VoteTally>) -> Self {
        *self.votes_reply.lock().unwrap() = reply;
        self
    }

    pub fn with_chat(self, reply: EngineResult<ChatReply>) -> Self {
        *self.chat_reply.lock().unwrap() = reply;
        self
    }

    pub fn with_health(self, reply: EngineResult<HealthReply>) -> Self {
        *self.health_reply.lock().unwrap() = reply;
        self
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

impl IfuBackend for FakeBackend {
    async fn get_ifu(&self, _model: &str) -> EngineResult<LookupResponse> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.lookup_reply.lock().unwrap().clone()
    }

    async fn search_ifu(&self, query: &SearchQuery) -> EngineResult<Vec<SearchResultItem>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.pass_gate().await;
        self.search_reply.lock().unwrap().clone()
    }

    async fn fetch_votes(&self) -> EngineResult<VoteTally> {
        self.vote_fetches.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        self.votes_reply.lock().unwrap().clone()
    }

    async fn post_vote(&self, direction: VoteDirection) -> EngineResult<VoteTally> {
        self.vote_posts.fetch_add(1, Ordering::SeqCst);
        *self.last_direction.lock().unwrap() = Some(direction);
        self.pass_gate().await;
        self.votes_reply.lock().unwrap().clone()
    }

    async fn chat(&self, request: &ChatRequest) -> EngineResult<ChatReply> {
        self.chats.fetch_add(1, Ordering::SeqCst);
        *self.last_chat.lock().unwrap() = Some(request.clone());
        self.pass_gate().await;
        self.chat_reply.lock().unwrap().clone()
    }

    async fn health(&self) -> EngineResult<HealthReply> {
        self.pass_gate().await;
        self.health_reply.lock().unwrap().clone()
    }

    fn endpoint(&self) -> &str {
        "http://fake.local"
    }
}

/// Shorthand for a transport failure in tests.
pub(crate) fn transport(message: &str) -> IfuEngineError {
    IfuEngineError::Transport {
        message: message.into(),
        timed_out: false,
    }
}

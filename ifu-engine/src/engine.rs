//! `IfuEngine`: one session's worth of scan, search, vote and chat.
//!
//! The engine owns its backend and all per-session state; nothing is global.
//! Create one per user session and share it behind an `Arc`.

use std::sync::Arc;

use scan_payload::{ResolvedIdentity, parse_scan_payload};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::backend::{ChatRequest, HttpBackend, IfuBackend, SearchMode, VoteDirection, VoteTally};
use crate::config::EngineConfig;
use crate::dispatcher::SearchDispatcher;
use crate::error_handler::{EngineResult, IfuEngineError};
use crate::escalation::{Escalation, EscalationPolicy, Operation, Outcome};
use crate::health::{HealthService, HealthStatus};
use crate::resolver::IdentifierResolver;
use crate::session::{ResultBoard, SearchBoard, SessionContext};
use crate::telemetry::clip_for_log;
use crate::votes::VoteCounter;

pub struct IfuEngine<B> {
    backend: Arc<B>,
    session: SessionContext,
    board: ResultBoard,
    resolver: IdentifierResolver<B>,
    dispatcher: SearchDispatcher<B>,
    votes: VoteCounter<B>,
    health: HealthService<B>,
    policy: EscalationPolicy,
    log_payloads: bool,
    max_log_chars: usize,
}

impl IfuEngine<HttpBackend> {
    /// Engine talking HTTP to `cfg.backend_url`.
    ///
    /// # Errors
    /// Config errors from building the HTTP client.
    pub fn from_config(cfg: &EngineConfig) -> EngineResult<Self> {
        let backend = HttpBackend::new(cfg.clone())?;
        Ok(Self::with_backend(backend, cfg))
    }
}

impl<B: IfuBackend> IfuEngine<B> {
    pub fn with_backend(backend: B, cfg: &EngineConfig) -> Self {
        let backend = Arc::new(backend);
        info!(endpoint = %backend.endpoint(), "IfuEngine initialized");
        Self {
            session: SessionContext::default(),
            board: ResultBoard::default(),
            resolver: IdentifierResolver::new(Arc::clone(&backend)),
            dispatcher: SearchDispatcher::new(Arc::clone(&backend)),
            votes: VoteCounter::new(Arc::clone(&backend)),
            health: HealthService::new(Arc::clone(&backend)),
            policy: EscalationPolicy::new(cfg.help_ref.clone()),
            log_payloads: cfg.log_payloads,
            max_log_chars: cfg.max_log_chars,
            backend,
        }
    }

    /// Parses a scanned code, completes it remotely if needed and makes it
    /// the session context.
    ///
    /// On [`IfuEngineError::NotFound`] the scanned model is still committed so
    /// that later searches can run keyword-only against it. Transport and HTTP
    /// failures leave the previous context in place.
    ///
    /// Returns `Ok(None)` when the context was cleared (or a newer scan
    /// committed) while the lookup was in flight; the context is left as is.
    ///
    /// # Errors
    /// - [`IfuEngineError::EmptyPayload`] when the scan carried no text.
    /// - Any error of [`IdentifierResolver::resolve`].
    #[instrument(skip_all)]
    pub async fn scan(&self, raw: &str) -> EngineResult<Option<ResolvedIdentity>> {
        if self.log_payloads {
            debug!(payload = %clip_for_log(raw, self.max_log_chars), "scan received");
        }

        let parsed = parse_scan_payload(raw);
        if !parsed.is_identified() {
            return Err(IfuEngineError::EmptyPayload);
        }

        let ticket = self.session.begin();
        match self.resolver.resolve(parsed.clone()).await {
            Ok(identity) => {
                let committed = self.session.commit(ticket, identity.clone());
                Ok(committed.then_some(identity))
            }
            Err(err @ IfuEngineError::NotFound { .. }) => {
                self.session.commit(ticket, parsed);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn context(&self) -> ResolvedIdentity {
        self.session.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResolvedIdentity> {
        self.session.subscribe()
    }

    /// Forgets the device context and the last search. In-flight work is not
    /// cancelled, but its results will be ignored.
    pub fn clear(&self) {
        self.session.clear();
        self.board.clear();
    }

    /// Searches within the current context.
    ///
    /// Returns `Ok(None)` when a newer search (or a clear) superseded this one
    /// while it was in flight; the board is left untouched in that case.
    #[instrument(skip_all, fields(%mode))]
    pub async fn search(&self, keyword: &str, mode: SearchMode) -> EngineResult<Option<SearchBoard>> {
        let context = self.session.snapshot();
        let ticket = self.board.begin();

        let items = self.dispatcher.search(&context, keyword, mode).await?;
        let board = SearchBoard {
            keyword: keyword.trim().to_string(),
            mode,
            items: Arc::from(items),
        };

        Ok(self.board.publish(ticket, board.clone()).then_some(board))
    }

    pub fn results(&self) -> Option<SearchBoard> {
        self.board.current()
    }

    pub fn subscribe_results(&self) -> watch::Receiver<Option<SearchBoard>> {
        self.board.subscribe()
    }

    pub async fn fetch_votes(&self) -> EngineResult<VoteTally> {
        self.votes.fetch().await
    }

    pub async fn vote(&self, direction: VoteDirection) -> EngineResult<VoteTally> {
        self.votes.submit(direction).await
    }

    /// Sends a free-form question to the assistant and returns its answer.
    ///
    /// # Errors
    /// [`IfuEngineError::EmptyPrompt`] before any call when `text` is blank.
    #[instrument(skip_all)]
    pub async fn chat(&self, text: &str, system_prompt: Option<&str>) -> EngineResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(IfuEngineError::EmptyPrompt);
        }

        let request = ChatRequest {
            text: text.to_string(),
            system_prompt: system_prompt
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        let reply = self.backend.chat(&request).await?;

        if self.log_payloads {
            debug!(answer = %clip_for_log(&reply.content, self.max_log_chars), "chat answered");
        }
        Ok(reply.content)
    }

    pub async fn health(&self) -> HealthStatus {
        self.health.check().await
    }

    pub fn escalate(&self, op: Operation, outcome: Outcome<'_>) -> Escalation {
        self.policy.classify(op, outcome)
    }
}

//! Helpful/not-helpful counter backed by the server tally.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, instrument, warn};

use crate::backend::{IfuBackend, VoteDirection, VoteTally};
use crate::error_handler::{EngineResult, IfuEngineError};

/// Fetches and submits votes. At most one submission is in flight at a time.
pub struct VoteCounter<B> {
    backend: Arc<B>,
    submitting: AtomicBool,
}

/// Clears the in-flight flag on drop, including when the submit future is cancelled.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: IfuBackend> VoteCounter<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            submitting: AtomicBool::new(false),
        }
    }

    /// Current tally from the server. Failures are logged and returned for
    /// the caller to drop silently.
    #[instrument(skip_all)]
    pub async fn fetch(&self) -> EngineResult<VoteTally> {
        self.backend.fetch_votes().await.inspect_err(|e| {
            warn!(error = %e, "failed to fetch vote tally");
        })
    }

    /// Submits one vote and returns the server's updated tally.
    ///
    /// # Errors
    /// - [`IfuEngineError::BusyRejected`] if another submission is outstanding;
    ///   nothing is sent in that case.
    /// - Transport/HTTP/decode errors from the backend.
    #[instrument(skip_all, fields(?direction))]
    pub async fn submit(&self, direction: VoteDirection) -> EngineResult<VoteTally> {
        let Some(_guard) = InFlight::acquire(&self.submitting) else {
            info!("vote rejected: submission already in flight");
            return Err(IfuEngineError::BusyRejected);
        };

        let tally = self.backend.post_vote(direction).await?;
        info!(up = tally.up, down = tally.down, "vote recorded");
        Ok(tally)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }
}

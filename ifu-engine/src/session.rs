//! Per-session state: the current device context and the latest search board.

use std::sync::Arc;

use scan_payload::ResolvedIdentity;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::backend::{SearchMode, SearchResultItem};
use crate::slot::{LatestSlot, Ticket};

/// The last successfully resolved identity, owned by one engine.
///
/// Single writer (the engine's scan path), any number of readers. Readers
/// either take a [`snapshot`](Self::snapshot) or follow changes through
/// [`subscribe`](Self::subscribe).
#[derive(Debug)]
pub struct SessionContext {
    slot: LatestSlot<ResolvedIdentity>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            slot: LatestSlot::new(ResolvedIdentity::default()),
        }
    }
}

impl SessionContext {
    /// Reserves the right to overwrite the context once a scan completes.
    pub fn begin(&self) -> Ticket {
        self.slot.issue()
    }

    /// Replaces the context in full, unless a newer scan or a clear got there first.
    pub fn commit(&self, ticket: Ticket, identity: ResolvedIdentity) -> bool {
        let label = identity.label();
        let applied = self.slot.commit(ticket, identity);
        if applied {
            info!(identity = %label, "session context updated");
        } else {
            debug!(ticket = ticket.seq(), "stale scan result discarded");
        }
        applied
    }

    pub fn clear(&self) {
        self.slot.clear(ResolvedIdentity::default());
        info!("session context cleared");
    }

    pub fn snapshot(&self) -> ResolvedIdentity {
        self.slot.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResolvedIdentity> {
        self.slot.subscribe()
    }
}

/// Results of one completed search, tagged with what produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBoard {
    pub keyword: String,
    pub mode: SearchMode,
    pub items: Arc<[SearchResultItem]>,
}

/// Holds the results of the most recently issued search only.
#[derive(Debug)]
pub struct ResultBoard {
    slot: LatestSlot<Option<SearchBoard>>,
}

impl Default for ResultBoard {
    fn default() -> Self {
        Self {
            slot: LatestSlot::new(None),
        }
    }
}

impl ResultBoard {
    pub fn begin(&self) -> Ticket {
        self.slot.issue()
    }

    pub fn publish(&self, ticket: Ticket, board: SearchBoard) -> bool {
        let applied = self.slot.commit(ticket, Some(board));
        if !applied {
            debug!(ticket = ticket.seq(), "superseded search result discarded");
        }
        applied
    }

    pub fn clear(&self) {
        self.slot.clear(None);
    }

    pub fn current(&self) -> Option<SearchBoard> {
        self.slot.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SearchBoard>> {
        self.slot.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_scan_overwrites_context_in_full() {
        let ctx = SessionContext::default();
        let t1 = ctx.begin();
        ctx.commit(
            t1,
            ResolvedIdentity {
                model: "A".into(),
                assistantid: "a.pdf".into(),
                containerid: "c1".into(),
                device_type: "pump".into(),
            },
        );
        let t2 = ctx.begin();
        ctx.commit(t2, ResolvedIdentity::from_model("B"));

        assert_eq!(ctx.snapshot(), ResolvedIdentity::from_model("B"));
    }

    #[test]
    fn board_ignores_results_from_before_clear() {
        let board = ResultBoard::default();
        let ticket = board.begin();
        board.clear();

        let applied = board.publish(
            ticket,
            SearchBoard {
                keyword: "alarm".into(),
                mode: SearchMode::Search,
                items: Arc::from(Vec::new()),
            },
        );
        assert!(!applied);
        assert_eq!(board.current(), None);
    }
}

//! Single-writer value cell with "latest request wins" commits.
//!
//! Work that will eventually write into the slot first takes a [`Ticket`].
//! A commit is accepted only if its ticket is newer than the last accepted
//! one and was issued after the last [`LatestSlot::clear`]. A clear does not
//! cancel anything; it only voids the tickets handed out so far.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

/// Monotonic token issued by [`LatestSlot::issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Seqs {
    issued: u64,
    applied: u64,
    cleared_at: u64,
}

/// Observable value guarded by ticket ordering.
#[derive(Debug)]
pub struct LatestSlot<T> {
    seqs: Mutex<Seqs>,
    tx: watch::Sender<T>,
}

impl<T: Clone> LatestSlot<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            seqs: Mutex::new(Seqs::default()),
            tx,
        }
    }

    /// Takes the next ticket.
    pub fn issue(&self) -> Ticket {
        let mut seqs = self.lock();
        seqs.issued += 1;
        Ticket(seqs.issued)
    }

    /// Publishes `value` if `ticket` is still current. Returns whether it was applied.
    pub fn commit(&self, ticket: Ticket, value: T) -> bool {
        let mut seqs = self.lock();
        if ticket.0 <= seqs.applied || ticket.0 <= seqs.cleared_at {
            return false;
        }
        seqs.applied = ticket.0;
        self.tx.send_replace(value);
        true
    }

    /// Resets the value and voids every ticket issued so far.
    pub fn clear(&self, reset: T) {
        let mut seqs = self.lock();
        seqs.cleared_at = seqs.issued;
        self.tx.send_replace(reset);
    }

    /// True when a commit with `ticket` would still be accepted.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        let seqs = self.lock();
        ticket.0 > seqs.applied && ticket.0 > seqs.cleared_at
    }

    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    // Every critical section is a plain field update, so a poisoned lock
    // still holds consistent numbers.
    fn lock(&self) -> MutexGuard<'_, Seqs> {
        self.seqs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

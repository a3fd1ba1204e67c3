//! Request epochs for dropping late results.
//!
//! A view takes a ticket before issuing a request and calls
//! [`RequestScope::teardown`] when it goes away. Results that resolve under a
//! stale ticket are discarded instead of being written into state that no
//! longer belongs to them.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Epoch observed when a request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochTicket(u64);

/// Shared epoch counter for one view scope. Clones observe the same epoch.
#[derive(Debug, Clone, Default)]
pub struct RequestScope {
    epoch: Arc<AtomicU64>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> EpochTicket {
        EpochTicket(self.epoch.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, ticket: EpochTicket) -> bool {
        self.epoch.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidates every outstanding ticket.
    pub fn teardown(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Keeps `value` only if `ticket` is still current.
    pub fn accept<T>(&self, ticket: EpochTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!(issued = ticket.0, "dropping result from a torn-down scope");
            None
        }
    }

    /// Awaits `fut` under a fresh ticket; `None` if the scope moved on.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let ticket = self.ticket();
        let output = fut.await;
        self.accept(ticket, output)
    }
}

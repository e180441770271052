//! Outstanding work accounting
//!
//! One work unit is issued per enqueued URL and resolved once that URL has
//! been handled. Retries of a failed unit do not issue a new one.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Counts unresolved work units and wakes the crawl once the count hits zero
#[derive(Debug, Default)]
pub struct CompletionTracker {
    outstanding: AtomicUsize,
    zero: Notify,
}

impl CompletionTracker {
    /// Creates a tracker with no outstanding work
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `n` newly issued work units
    pub fn increment(&self, n: usize) {
        if n == 0 {
            return;
        }
        self.outstanding.fetch_add(n, Ordering::SeqCst);
    }

    /// Resolves `n` work units and returns the remaining count
    ///
    /// # Panics
    ///
    /// Resolving more units than were issued is a bookkeeping bug and panics.
    pub fn decrement(&self, n: usize) -> usize {
        let previous = self
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_sub(n)
            })
            .unwrap_or_else(|current| {
                panic!("resolved {} work units with only {} outstanding", n, current)
            });

        let remaining = previous - n;
        if remaining == 0 && n > 0 {
            // notify_one keeps a permit if nobody is waiting yet
            self.zero.notify_one();
        }
        remaining
    }

    /// Returns the number of unresolved work units
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Waits until every issued work unit has been resolved
    pub async fn await_zero(&self) {
        loop {
            let notified = self.zero.notified();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

//! Work queue feeding the dispatch loop
//!
//! Unbounded, so a handler requeueing a failed URL never waits on the loop
//! that drains the queue.

use crate::{Result, ScraperError};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Sending half of the crawl's work queue
pub struct WorkQueue {
    sender: Mutex<Option<UnboundedSender<String>>>,
}

impl WorkQueue {
    /// Creates a queue and the receiver the dispatch loop reads from
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let queue = Self {
            sender: Mutex::new(Some(sender)),
        };
        (queue, receiver)
    }

    /// Enqueues a URL
    ///
    /// # Errors
    ///
    /// Returns `ScraperError::QueueClosed` once [`WorkQueue::close`] has run.
    /// Nothing may be issued after the crawl drained, so this is fatal.
    pub fn push(&self, url: String) -> Result<()> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);

        match sender.as_ref() {
            Some(sender) => sender
                .send(url)
                .map_err(|e| ScraperError::QueueClosed { url: e.0 }),
            None => Err(ScraperError::QueueClosed { url }),
        }
    }

    /// Closes the queue; the receiver ends once it has drained
    pub fn close(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Returns true once the queue has been closed
    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

//! Web enrichment dispatcher implementation.

use std::sync::{Arc, Mutex};

use screener_core::enrichment::{EnrichmentDispatcher, EnrichmentServiceTrait};
use tokio::sync::{mpsc, Semaphore};

use super::worker::enrichment_worker;

/// Enrichment dispatcher for the web server runtime.
///
/// # Two-Phase Initialization
///
/// `StockService` needs the dispatcher, and the worker needs the enrichment
/// service built from the same repository, so:
///
/// 1. Create the dispatcher with `new()` - this just creates the channel
/// 2. Call `start_worker()` after the services are created - this spawns the worker
///
/// Ids scheduled in between are buffered in the channel.
pub struct WebEnrichmentDispatcher {
    tx: mpsc::UnboundedSender<i32>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<i32>>>,
}

impl WebEnrichmentDispatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Starts the background worker. `max_concurrent` of 0 means unbounded.
    ///
    /// Only the first call has an effect.
    pub fn start_worker(&self, service: Arc<dyn EnrichmentServiceTrait>, max_concurrent: usize) {
        let rx = match self.rx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(rx) = rx else {
            tracing::warn!("Enrichment worker already started, ignoring");
            return;
        };

        let limit = (max_concurrent > 0).then(|| Arc::new(Semaphore::new(max_concurrent)));
        tokio::spawn(enrichment_worker(rx, service, limit));
    }

    /// Creates a dispatcher with just the sender.
    ///
    /// The caller is responsible for draining the receiver.
    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<i32>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for WebEnrichmentDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichmentDispatcher for WebEnrichmentDispatcher {
    fn schedule(&self, stock_id: i32) {
        // Never blocks. A closed channel means the runtime is shutting down.
        if self.tx.send(stock_id).is_err() {
            tracing::warn!(
                "Enrichment channel closed, stock {} will stay unenriched",
                stock_id
            );
        }
    }
}

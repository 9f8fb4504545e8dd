//! Dispatcher implementations that do not need a runtime.

use std::sync::{Arc, Mutex};

use super::enrichment_traits::EnrichmentDispatcher;

/// No-op implementation for tests or contexts that don't enrich.
#[derive(Clone, Default)]
pub struct NoOpEnrichmentDispatcher;

impl EnrichmentDispatcher for NoOpEnrichmentDispatcher {
    fn schedule(&self, _stock_id: i32) {}
}

/// Mock dispatcher for testing - collects scheduled ids.
#[derive(Clone, Default)]
pub struct MockEnrichmentDispatcher {
    scheduled: Arc<Mutex<Vec<i32>>>,
}

impl MockEnrichmentDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all scheduled ids in call order.
    pub fn scheduled(&self) -> Vec<i32> {
        self.scheduled.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.scheduled.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.lock().unwrap().is_empty()
    }
}

impl EnrichmentDispatcher for MockEnrichmentDispatcher {
    fn schedule(&self, stock_id: i32) {
        self.scheduled.lock().unwrap().push(stock_id);
    }
}

//! Enrichment module - fills bare stock records from market data snapshots.
//!
//! Creation schedules exactly one enrichment per record through an
//! [`EnrichmentDispatcher`]. Runtime adapters implement the dispatcher to run
//! [`EnrichmentServiceTrait::enrich`] off the request path.

mod dispatcher;
mod enrichment_model;
mod enrichment_service;
mod enrichment_traits;

#[cfg(test)]
mod enrichment_service_tests;

pub use dispatcher::{MockEnrichmentDispatcher, NoOpEnrichmentDispatcher};
pub use enrichment_model::EnrichmentOutcome;
pub use enrichment_service::{apply_snapshot, EnrichmentService, DEFAULT_ENRICHMENT_TIMEOUT};
pub use enrichment_traits::{EnrichmentDispatcher, EnrichmentServiceTrait};

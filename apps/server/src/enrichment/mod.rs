//! Enrichment runtime bridge for the web server.
//!
//! Receives stock ids via `EnrichmentDispatcher::schedule` and runs one
//! detached enrichment task per id on the Tokio runtime. Tasks are unordered,
//! never retried and never report back to the request that created them.

mod dispatcher;
mod worker;

pub use dispatcher::WebEnrichmentDispatcher;

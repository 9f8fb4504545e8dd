use async_trait::async_trait;

use super::enrichment_model::EnrichmentOutcome;
use crate::errors::Result;

/// Trait for the enrichment worker.
#[async_trait]
pub trait EnrichmentServiceTrait: Send + Sync {
    /// Fetch a snapshot for the record's symbol and copy every present metric.
    ///
    /// A missing record yields `Ok(EnrichmentOutcome::Skipped)`. Gateway and
    /// persistence failures are returned as errors; the record is left as it
    /// was.
    async fn enrich(&self, stock_id: i32) -> Result<EnrichmentOutcome>;
}

/// Trait for scheduling enrichment of a freshly created record.
///
/// # Design Rules
///
/// - `schedule()` must be fast and non-blocking (no network calls, no DB writes)
/// - Implementations run the work detached from the caller and never report back
/// - Failure to schedule must not affect the creation that triggered it
/// - Work may start before the creating request's response is written; that
///   response never waits on it
pub trait EnrichmentDispatcher: Send + Sync {
    fn schedule(&self, stock_id: i32);
}

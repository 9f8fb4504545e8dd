//! Background worker that turns scheduled ids into enrichment tasks.

use std::sync::Arc;

use screener_core::enrichment::{EnrichmentOutcome, EnrichmentServiceTrait};
use tokio::sync::{mpsc, Semaphore};

/// Runs until every dispatcher sender is dropped.
///
/// Each id gets its own spawned task; a failing or panicking task never
/// affects the worker or other tasks. With `limit`, at most that many
/// enrichments run at once and the rest wait for a permit.
pub async fn enrichment_worker(
    mut rx: mpsc::UnboundedReceiver<i32>,
    service: Arc<dyn EnrichmentServiceTrait>,
    limit: Option<Arc<Semaphore>>,
) {
    tracing::info!("Enrichment worker started");

    while let Some(stock_id) = rx.recv().await {
        let service = service.clone();
        let limit = limit.clone();

        tokio::spawn(async move {
            let _permit = match limit {
                Some(semaphore) => match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return,
                },
                None => None,
            };
            run_enrichment(service.as_ref(), stock_id).await;
        });
    }

    tracing::info!("Enrichment worker shutting down");
}

async fn run_enrichment(service: &dyn EnrichmentServiceTrait, stock_id: i32) {
    match service.enrich(stock_id).await {
        Ok(EnrichmentOutcome::Enriched { populated }) => {
            tracing::debug!(
                "Enrichment task for stock {} finished ({} field(s))",
                stock_id,
                populated
            );
        }
        Ok(EnrichmentOutcome::Skipped) => {
            tracing::debug!("Enrichment task for stock {} skipped", stock_id);
        }
        Err(e) => {
            tracing::warn!("Enrichment task for stock {} failed: {}", stock_id, e);
        }
    }
}

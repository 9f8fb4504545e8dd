use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use screener_market_data::{MarketDataError, MarketDataProvider, Snapshot};

use super::enrichment_model::EnrichmentOutcome;
use super::enrichment_traits::EnrichmentServiceTrait;
use crate::errors::Result;
use crate::stocks::{Stock, StockRepositoryTrait};

/// Upper bound on a single gateway call unless overridden.
pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Copies every metric present on `snapshot` into `stock`.
///
/// Absent snapshot fields leave the record untouched. The dividend yield
/// arrives as a fraction and is stored as a percentage. Returns the number of
/// fields written.
pub fn apply_snapshot(stock: &mut Stock, snapshot: &Snapshot) -> usize {
    let mut populated = 0;

    let mut copy = |target: &mut Option<Decimal>, value: Option<Decimal>| {
        if let Some(value) = value {
            *target = Some(value);
            populated += 1;
        }
    };

    copy(&mut stock.ma200, to_decimal(snapshot.two_hundred_day_average));
    copy(&mut stock.ma50, to_decimal(snapshot.fifty_day_average));
    copy(&mut stock.price, to_decimal(snapshot.previous_close));
    copy(&mut stock.forward_pe, to_decimal(snapshot.forward_pe));
    copy(&mut stock.forward_eps, to_decimal(snapshot.forward_eps));
    copy(
        &mut stock.dividend_yield,
        to_decimal(snapshot.dividend_yield).and_then(|raw| raw.checked_mul(Decimal::ONE_HUNDRED)),
    );

    populated
}

/// NaN and out-of-range values are dropped.
fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64)
}

/// Enrichment worker: loads a record, fetches its snapshot and persists the
/// merged result.
pub struct EnrichmentService {
    repository: Arc<dyn StockRepositoryTrait>,
    provider: Arc<dyn MarketDataProvider>,
    timeout: Duration,
}

impl EnrichmentService {
    pub fn new(
        repository: Arc<dyn StockRepositoryTrait>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            repository,
            provider,
            timeout: DEFAULT_ENRICHMENT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_snapshot(&self, symbol: &str) -> std::result::Result<Snapshot, MarketDataError> {
        match tokio::time::timeout(self.timeout, self.provider.fetch_snapshot(symbol)).await {
            Ok(result) => result,
            Err(_) => Err(MarketDataError::Timeout {
                provider: self.provider.id().to_string(),
            }),
        }
    }
}

#[async_trait]
impl EnrichmentServiceTrait for EnrichmentService {
    async fn enrich(&self, stock_id: i32) -> Result<EnrichmentOutcome> {
        let Some(mut stock) = self.repository.get_by_id(stock_id)? else {
            warn!("Stock {} no longer exists, skipping enrichment", stock_id);
            return Ok(EnrichmentOutcome::Skipped);
        };

        debug!(
            "Enriching stock {} ({}) from {}",
            stock.id,
            stock.symbol,
            self.provider.id()
        );

        let snapshot = match self.fetch_snapshot(&stock.symbol).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    "Failed to fetch market data for {} (stock {}, transient: {}): {}",
                    stock.symbol,
                    stock.id,
                    e.is_transient(),
                    e
                );
                return Err(e.into());
            }
        };

        let populated = apply_snapshot(&mut stock, &snapshot);

        match self.repository.update(stock).await {
            Ok(updated) => {
                info!(
                    "Enriched {} (stock {}): {} field(s) populated",
                    updated.symbol, updated.id, populated
                );
                Ok(EnrichmentOutcome::Enriched { populated })
            }
            Err(e) if e.is_not_found() => {
                warn!(
                    "Stock {} was removed during enrichment, dropping snapshot",
                    stock_id
                );
                Ok(EnrichmentOutcome::Skipped)
            }
            Err(e) => {
                error!("Failed to persist enrichment for stock {}: {}", stock_id, e);
                Err(e)
            }
        }
    }
}

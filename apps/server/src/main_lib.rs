use std::sync::Arc;

use crate::{
    config::{Config, LogFormat},
    enrichment::WebEnrichmentDispatcher,
};
use screener_core::{
    enrichment::{EnrichmentDispatcher, EnrichmentService, EnrichmentServiceTrait},
    stocks::{StockService, StockServiceTrait},
};
use screener_market_data::{MarketDataProvider, YahooProvider};
use screener_storage_sqlite::{db, stocks::StockRepository, DbPool};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub stock_service: Arc<dyn StockServiceTrait>,
    /// Read side of the store, used by readiness checks.
    pub pool: Arc<DbPool>,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format == LogFormat::Json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn MarketDataProvider> =
        Arc::new(YahooProvider::with_timeout(config.enrichment_timeout)?);
    build_state_with_provider(config, provider).await
}

/// Wires storage, services and the enrichment worker around `provider`.
///
/// Must be called from within a Tokio runtime.
pub async fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let stock_repository = Arc::new(StockRepository::new(pool.clone(), writer));

    // The dispatcher exists before the services; its worker starts once the
    // enrichment service is built.
    let enrichment_dispatcher = Arc::new(WebEnrichmentDispatcher::new());

    let stock_service: Arc<dyn StockServiceTrait> = Arc::new(StockService::new(
        stock_repository.clone(),
        enrichment_dispatcher.clone() as Arc<dyn EnrichmentDispatcher>,
    ));
    tracing::info!("Market data provider: {}", provider.id());
    let enrichment_service: Arc<dyn EnrichmentServiceTrait> = Arc::new(
        EnrichmentService::new(stock_repository, provider)
            .with_timeout(config.enrichment_timeout),
    );

    enrichment_dispatcher.start_worker(enrichment_service, config.max_concurrent_enrichments);

    Ok(Arc::new(AppState {
        stock_service,
        pool,
    }))
}

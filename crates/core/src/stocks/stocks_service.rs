use log::debug;
use std::sync::Arc;

use super::stocks_model::{NewStock, Stock};
use super::stocks_traits::{StockRepositoryTrait, StockServiceTrait};
use crate::enrichment::EnrichmentDispatcher;
use crate::errors::Result;
use crate::screener::ScreenerFilter;

/// Service for registering and screening stocks
pub struct StockService {
    repository: Arc<dyn StockRepositoryTrait>,
    dispatcher: Arc<dyn EnrichmentDispatcher>,
}

impl StockService {
    pub fn new(
        repository: Arc<dyn StockRepositoryTrait>,
        dispatcher: Arc<dyn EnrichmentDispatcher>,
    ) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }
}

#[async_trait::async_trait]
impl StockServiceTrait for StockService {
    async fn create_stock(&self, symbol: &str) -> Result<Stock> {
        let new_stock = NewStock::new(symbol)?;
        let stock = self.repository.create(new_stock).await?;
        debug!("Created stock {} with id {}", stock.symbol, stock.id);

        // Only after the insert committed, so the worker can always load it.
        self.dispatcher.schedule(stock.id);
        Ok(stock)
    }

    fn get_stock(&self, stock_id: i32) -> Result<Option<Stock>> {
        self.repository.get_by_id(stock_id)
    }

    async fn delete_stock(&self, stock_id: i32) -> Result<usize> {
        self.repository.delete(stock_id).await
    }

    fn screen_stocks(&self, filter: &ScreenerFilter) -> Result<Vec<Stock>> {
        filter.validate()?;
        let predicate = filter.to_predicate();
        debug!("Screening stocks with {} clause(s)", predicate.len());
        self.repository.query(&predicate)
    }
}

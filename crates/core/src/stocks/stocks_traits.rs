use crate::errors::Result;
use crate::screener::{ScreenerFilter, StockPredicate};
use crate::stocks::stocks_model::{NewStock, Stock};
use async_trait::async_trait;

/// Trait for stock repository operations
#[async_trait]
pub trait StockRepositoryTrait: Send + Sync {
    /// Inserts a bare record and returns it with its assigned id.
    async fn create(&self, new_stock: NewStock) -> Result<Stock>;

    fn get_by_id(&self, stock_id: i32) -> Result<Option<Stock>>;

    /// Persists every field of `stock`. Fails with `DatabaseError::NotFound`
    /// when the row no longer exists.
    async fn update(&self, stock: Stock) -> Result<Stock>;

    async fn delete(&self, stock_id: i32) -> Result<usize>;

    /// Records matching every clause of `predicate`, in insertion order.
    fn query(&self, predicate: &StockPredicate) -> Result<Vec<Stock>>;
}

/// Trait for stock service operations
#[async_trait]
pub trait StockServiceTrait: Send + Sync {
    /// Creates a bare record and schedules its enrichment.
    async fn create_stock(&self, symbol: &str) -> Result<Stock>;
    fn get_stock(&self, stock_id: i32) -> Result<Option<Stock>>;
    async fn delete_stock(&self, stock_id: i32) -> Result<usize>;
    fn screen_stocks(&self, filter: &ScreenerFilter) -> Result<Vec<Stock>>;
}

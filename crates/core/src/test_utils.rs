//! In-memory doubles shared by the service tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{DatabaseError, Error, Result};
use crate::screener::StockPredicate;
use crate::stocks::{NewStock, Stock, StockRepositoryTrait};

/// Vec-backed repository with autoincrement ids.
#[derive(Clone, Default)]
pub struct InMemoryStockRepository {
    stocks: Arc<Mutex<Vec<Stock>>>,
    next_id: Arc<Mutex<i32>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, stock: Stock) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(stock.id);
        self.stocks.lock().unwrap().push(stock);
    }

    pub fn get(&self, stock_id: i32) -> Option<Stock> {
        self.stocks
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == stock_id)
            .cloned()
    }

    pub fn all(&self) -> Vec<Stock> {
        self.stocks.lock().unwrap().clone()
    }

    pub fn remove(&self, stock_id: i32) {
        self.stocks.lock().unwrap().retain(|s| s.id != stock_id);
    }

    /// Makes every subsequent write fail with a query error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk I/O error".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StockRepositoryTrait for InMemoryStockRepository {
    async fn create(&self, new_stock: NewStock) -> Result<Stock> {
        self.check_writable()?;
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let stock = Stock::bare(id, new_stock.symbol());
        self.stocks.lock().unwrap().push(stock.clone());
        Ok(stock)
    }

    fn get_by_id(&self, stock_id: i32) -> Result<Option<Stock>> {
        Ok(self.get(stock_id))
    }

    async fn update(&self, stock: Stock) -> Result<Stock> {
        self.check_writable()?;
        let mut stocks = self.stocks.lock().unwrap();
        let existing = stocks
            .iter_mut()
            .find(|s| s.id == stock.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("stock {}", stock.id)))?;
        *existing = stock.clone();
        Ok(stock)
    }

    async fn delete(&self, stock_id: i32) -> Result<usize> {
        self.check_writable()?;
        let mut stocks = self.stocks.lock().unwrap();
        let before = stocks.len();
        stocks.retain(|s| s.id != stock_id);
        Ok(before - stocks.len())
    }

    fn query(&self, predicate: &StockPredicate) -> Result<Vec<Stock>> {
        Ok(self
            .stocks
            .lock()
            .unwrap()
            .iter()
            .filter(|s| predicate.matches(s))
            .cloned()
            .collect())
    }
}

use screener_core::errors::{DatabaseError, Error, ValidationError};
use screener_core::screener::{exact_f64, StockClause, StockPredicate};
use screener_core::stocks::{NewStock, Stock, StockRepositoryTrait};
use screener_core::Result;

use super::model::{NewStockDB, StockDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::stocks;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use std::sync::Arc;

pub struct StockRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl StockRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        StockRepository { pool, writer }
    }

    /// Metrics are stored as doubles; a threshold must be one exactly.
    fn threshold(value: Decimal) -> Result<f64> {
        exact_f64(value).ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "threshold {} cannot be compared exactly against stored metrics",
                value
            )))
        })
    }

    /// Translates the predicate into a boxed `WHERE` chain.
    ///
    /// Comparisons against `NULL` are never true in SQL, so records missing a
    /// referenced field drop out of every clause that reads it.
    fn filtered_query(
        predicate: &StockPredicate,
    ) -> Result<stocks::BoxedQuery<'static, Sqlite>> {
        let mut query = stocks::table.into_boxed();
        for clause in predicate.clauses() {
            query = match *clause {
                StockClause::ForwardPeBelow(max) => {
                    query.filter(stocks::forward_pe.lt(Self::threshold(max)?))
                }
                StockClause::DividendYieldAbove(min) => {
                    query.filter(stocks::dividend_yield.gt(Self::threshold(min)?))
                }
                StockClause::PriceAboveMa50 => query.filter(stocks::price.gt(stocks::ma50)),
                StockClause::PriceAboveMa200 => query.filter(stocks::price.gt(stocks::ma200)),
            };
        }
        Ok(query)
    }
}

#[async_trait]
impl StockRepositoryTrait for StockRepository {
    async fn create(&self, new_stock: NewStock) -> Result<Stock> {
        let new_stock_db: NewStockDB = new_stock.into();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Stock> {
                let result_db = diesel::insert_into(stocks::table)
                    .values(&new_stock_db)
                    .returning(StockDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Stock::from(result_db))
            })
            .await
    }

    fn get_by_id(&self, stock_id: i32) -> Result<Option<Stock>> {
        let mut conn = get_connection(&self.pool)?;
        let stock_db = stocks::table
            .find(stock_id)
            .select(StockDB::as_select())
            .first::<StockDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(stock_db.map(Stock::from))
    }

    async fn update(&self, stock: Stock) -> Result<Stock> {
        let stock_db: StockDB = stock.into();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Stock> {
                let result_db = diesel::update(stocks::table.find(stock_db.id))
                    .set(&stock_db)
                    .returning(StockDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| DatabaseError::NotFound(format!("stock {}", stock_db.id)))?;
                Ok(Stock::from(result_db))
            })
            .await
    }

    async fn delete(&self, stock_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(stocks::table.find(stock_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn query(&self, predicate: &StockPredicate) -> Result<Vec<Stock>> {
        let mut conn = get_connection(&self.pool)?;
        let stocks_db = Self::filtered_query(predicate)?
            .order(stocks::id.asc())
            .select(StockDB::as_select())
            .load::<StockDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(stocks_db.into_iter().map(Stock::from).collect())
    }
}

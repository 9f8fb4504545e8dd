//! Database models for stocks.

use diesel::prelude::*;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use screener_core::stocks::{NewStock, Stock};

/// Database model for stocks. Metrics are stored as `DOUBLE` so filters can
/// compare them in SQL.
#[derive(Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::stocks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct StockDB {
    pub id: i32,
    pub symbol: String,
    pub price: Option<f64>,
    pub forward_pe: Option<f64>,
    pub forward_eps: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
}

/// Database model for creating a new stock
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::stocks)]
pub struct NewStockDB {
    pub symbol: String,
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64)
}

fn to_double(value: Option<Decimal>) -> Option<f64> {
    value.and_then(|v| v.to_f64())
}

// Conversion to domain models
impl From<StockDB> for Stock {
    fn from(db: StockDB) -> Self {
        Self {
            id: db.id,
            symbol: db.symbol,
            price: to_decimal(db.price),
            forward_pe: to_decimal(db.forward_pe),
            forward_eps: to_decimal(db.forward_eps),
            dividend_yield: to_decimal(db.dividend_yield),
            ma50: to_decimal(db.ma50),
            ma200: to_decimal(db.ma200),
        }
    }
}

impl From<Stock> for StockDB {
    fn from(domain: Stock) -> Self {
        Self {
            id: domain.id,
            symbol: domain.symbol,
            price: to_double(domain.price),
            forward_pe: to_double(domain.forward_pe),
            forward_eps: to_double(domain.forward_eps),
            dividend_yield: to_double(domain.dividend_yield),
            ma50: to_double(domain.ma50),
            ma200: to_double(domain.ma200),
        }
    }
}

impl From<NewStock> for NewStockDB {
    fn from(domain: NewStock) -> Self {
        Self {
            symbol: domain.symbol().to_string(),
        }
    }
}

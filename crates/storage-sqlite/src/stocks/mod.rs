//! SQLite storage implementation for stocks.

mod model;
mod repository;

pub use model::{NewStockDB, StockDB};
pub use repository::StockRepository;

//! Screener module - filter criteria and the predicate they compile to.
//!
//! A [`ScreenerFilter`] holds the user's optional criteria. It compiles to a
//! [`StockPredicate`], an AND of independent [`StockClause`]s that the storage
//! layer translates to SQL and that can also be evaluated in memory.

mod screener_model;


pub use screener_model::{exact_f64, ScreenerFilter, StockClause, StockPredicate};

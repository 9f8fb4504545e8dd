//! Market data provider abstraction and implementations.
//!
//! The enrichment pipeline only depends on [`MarketDataProvider`]; the
//! concrete Yahoo Finance implementation lives in [`yahoo`].

mod rate_limit;
mod traits;

pub mod yahoo;

pub use rate_limit::RateLimit;
pub use traits::MarketDataProvider;

//! Screener Market Data Crate
//!
//! Gateway between the screener and external quote providers. A provider
//! turns a ticker symbol into a [`Snapshot`] of the metrics the screener
//! stores: previous close, 50/200-day moving averages, forward P/E, forward
//! EPS and dividend yield.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |  Enrichment      | --> | MarketDataProvider| --> |    Snapshot      |
//! |  (core crate)    |     |  (Yahoo, ...)    |     |  (all optional)  |
//! +------------------+     +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   RateLimiter    |  (token bucket)
//!                          +------------------+
//! ```
//!
//! Every metric on a snapshot is optional. Providers decide what they can
//! supply and callers copy only what is present.

pub mod errors;
pub mod models;
pub mod provider;
pub mod rate_limiter;

pub use errors::MarketDataError;
pub use models::Snapshot;
pub use provider::yahoo::YahooProvider;
pub use provider::{MarketDataProvider, RateLimit};
pub use rate_limiter::RateLimiter;

//! Screener Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the stock screener: the
//! `Stock` record, the screener filter model, and the enrichment worker that
//! fills a bare record from a market data snapshot. It is database-agnostic
//! and defines traits that are implemented by the `storage-sqlite` crate.

pub mod enrichment;
pub mod errors;
pub mod screener;
pub mod stocks;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

#[cfg(test)]
pub(crate) mod test_utils;

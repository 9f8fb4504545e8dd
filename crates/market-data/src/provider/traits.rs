//! Market data provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::Snapshot;

use super::RateLimit;

/// A source of point-in-time metric snapshots keyed by ticker symbol.
///
/// Implementations may fail outright (network, unknown symbol) or return a
/// partially populated [`Snapshot`]. Both are legal and callers must cope
/// with either.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use screener_market_data::{MarketDataError, MarketDataProvider, RateLimit, Snapshot};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_snapshot(&self, symbol: &str) -> Result<Snapshot, MarketDataError> {
///         Ok(Snapshot::empty(symbol, self.id()))
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Constant identifier such as "YAHOO", used in logs and snapshot `source`.
    fn id(&self) -> &'static str;

    /// Rate limiting to apply when calling this provider.
    fn rate_limit(&self) -> RateLimit {
        RateLimit::default()
    }

    /// Fetch the current metrics for `symbol`.
    async fn fetch_snapshot(&self, symbol: &str) -> Result<Snapshot, MarketDataError>;
}

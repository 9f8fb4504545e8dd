//! Yahoo Finance market data provider.
//!
//! Snapshots come from the quoteSummary endpoint, which needs a cookie and a
//! crumb obtained up front. Both are cached process-wide and dropped whenever
//! Yahoo answers 401.

mod models;

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use reqwest::{header, StatusCode};
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::Snapshot;
use crate::provider::{MarketDataProvider, RateLimit};
use crate::rate_limiter::RateLimiter;

use models::{raw_value, YahooQuoteSummaryResponse, YahooQuoteSummaryResult};

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SNAPSHOT_MODULES: &str = "summaryDetail,defaultKeyStatistics";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

fn cached_crumb() -> Option<CrumbData> {
    match YAHOO_CRUMB.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn store_crumb(value: Option<CrumbData>) {
    match YAHOO_CRUMB.write() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

fn yahoo_rate_limit() -> RateLimit {
    RateLimit {
        requests_per_minute: 120,
        burst_capacity: 10,
        min_delay: Duration::from_millis(50),
    }
}

fn provider_error(message: impl Into<String>) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: message.into(),
    }
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance snapshot provider.
pub struct YahooProvider {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl YahooProvider {
    /// Create a provider whose HTTP requests time out after ten seconds.
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| provider_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            limiter: RateLimiter::new(PROVIDER_ID, &yahoo_rate_limit()),
        })
    }

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        if let Some(crumb) = cached_crumb() {
            return Ok(crumb);
        }
        self.fetch_crumb().await
    }

    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        debug!("Fetching Yahoo cookie and crumb");

        // Step 1: cookie from fc.yahoo.com (the 404 body is irrelevant)
        let response = self
            .client
            .get(COOKIE_URL)
            .send()
            .await
            .map_err(|e| provider_error(format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| provider_error("Failed to parse Yahoo cookie"))?;

        // Step 2: crumb using the cookie
        let crumb = self
            .client
            .get(CRUMB_URL)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| provider_error(format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| provider_error(format!("Failed to read crumb: {}", e)))?;

        if crumb.trim().is_empty() {
            return Err(provider_error("Yahoo returned an empty crumb"));
        }

        let crumb_data = CrumbData { cookie, crumb };
        store_crumb(Some(crumb_data.clone()));
        Ok(crumb_data)
    }

    async fn fetch_quote_summary(
        &self,
        symbol: &str,
    ) -> Result<YahooQuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "{}/{}?modules={}&crumb={}",
            QUOTE_SUMMARY_URL,
            encode(symbol),
            SNAPSHOT_MODULES,
            encode(&crumb.crumb)
        );

        self.limiter.acquire().await;

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                store_crumb(None);
                return Err(provider_error("Yahoo authentication expired"));
            }
            StatusCode::NOT_FOUND => {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            status if !status.is_success() => {
                return Err(provider_error(format!(
                    "quoteSummary returned HTTP {}",
                    status
                )));
            }
            _ => {}
        }

        let data: YahooQuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse quoteSummary response: {}", e)))?;

        if let Some(error) = data.quote_summary.error {
            warn!(
                "Yahoo quoteSummary error for {}: {}",
                symbol,
                error.description.as_deref().unwrap_or("unknown")
            );
        }

        data.quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }
}

/// Map a quoteSummary result onto a snapshot.
///
/// `forwardPE` is read from summaryDetail first and falls back to
/// defaultKeyStatistics.
fn map_summary_to_snapshot(symbol: &str, result: &YahooQuoteSummaryResult) -> Snapshot {
    let detail = result.summary_detail.as_ref();
    let stats = result.default_key_statistics.as_ref();

    let forward_pe = detail
        .and_then(|d| raw_value(&d.forward_pe))
        .or_else(|| stats.and_then(|s| raw_value(&s.forward_pe)));

    Snapshot {
        symbol: symbol.to_string(),
        two_hundred_day_average: detail.and_then(|d| raw_value(&d.two_hundred_day_average)),
        fifty_day_average: detail.and_then(|d| raw_value(&d.fifty_day_average)),
        previous_close: detail.and_then(|d| raw_value(&d.previous_close)),
        forward_pe,
        forward_eps: stats.and_then(|s| raw_value(&s.forward_eps)),
        dividend_yield: detail.and_then(|d| raw_value(&d.dividend_yield)),
        source: PROVIDER_ID.to_string(),
        fetched_at: Utc::now(),
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        yahoo_rate_limit()
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<Snapshot, MarketDataError> {
        if symbol.trim().is_empty() {
            return Err(MarketDataError::ValidationFailed {
                message: "symbol is empty".to_string(),
            });
        }

        let result = self.fetch_quote_summary(symbol).await?;
        let snapshot = map_summary_to_snapshot(symbol, &result);
        debug!(
            "Yahoo snapshot for {}: {} of 6 fields populated",
            symbol,
            snapshot.populated_fields()
        );
        Ok(snapshot)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time bundle of metrics for one symbol.
///
/// Every metric is optional: providers routinely omit fields (no dividend,
/// no analyst estimates, freshly listed tickers without a 200-day history).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub symbol: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_hundred_day_average: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_day_average: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,

    #[serde(rename = "forwardPE", skip_serializing_if = "Option::is_none")]
    pub forward_pe: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_eps: Option<f64>,

    /// Raw fraction as reported by the provider (0.005 means 0.5%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,

    /// Provider that produced this snapshot (e.g. "YAHOO").
    pub source: String,

    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// A snapshot with no metrics at all.
    pub fn empty(symbol: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            two_hundred_day_average: None,
            fifty_day_average: None,
            previous_close: None,
            forward_pe: None,
            forward_eps: None,
            dividend_yield: None,
            source: source.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Number of metric fields the provider supplied.
    pub fn populated_fields(&self) -> usize {
        [
            self.two_hundred_day_average,
            self.fifty_day_average,
            self.previous_close,
            self.forward_pe,
            self.forward_eps,
            self.dividend_yield,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }
}

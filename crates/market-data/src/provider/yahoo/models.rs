//! Yahoo Finance quoteSummary response models.
//!
//! Only the `summaryDetail` and `defaultKeyStatistics` modules are requested.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    /// Yahoo sends `null` here together with an `error` object for unknown symbols.
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<YahooQuoteSummaryError>,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummaryError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub summary_detail: Option<YahooSummaryDetail>,
    pub default_key_statistics: Option<YahooKeyStatistics>,
}

/// Raw and formatted value pair. Yahoo sends `{}` when there is no data.
#[derive(Debug, Deserialize, Clone)]
pub struct YahooPriceDetail {
    #[serde(default, deserialize_with = "deserialize_raw")]
    pub raw: Option<f64>,
}

/// Yahoo sends non-finite values as strings (`"Infinity"`, `"NaN"`). Those,
/// and anything else that is not a finite number, become `None` so one bad
/// metric never rejects the whole document.
fn deserialize_raw<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|v| v.is_finite()))
}

/// Summary detail data (prices, averages, valuation).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    pub previous_close: Option<YahooPriceDetail>,
    pub fifty_day_average: Option<YahooPriceDetail>,
    pub two_hundred_day_average: Option<YahooPriceDetail>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<YahooPriceDetail>,
    pub dividend_yield: Option<YahooPriceDetail>,
}

/// Key statistics (per-share estimates).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooKeyStatistics {
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<YahooPriceDetail>,
    pub forward_eps: Option<YahooPriceDetail>,
}

/// Extracts the raw value, treating `{}`, `null` and non-finite numbers as absent.
pub fn raw_value(detail: &Option<YahooPriceDetail>) -> Option<f64> {
    detail
        .as_ref()
        .and_then(|d| d.raw)
        .filter(|v| v.is_finite())
}

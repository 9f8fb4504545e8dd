use std::str::FromStr;

use rust_decimal::Decimal;
use screener_core::screener::ScreenerFilter;
use screener_core::stocks as core_stocks;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: i32,
    pub symbol: String,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub forward_pe: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub forward_eps: Option<Decimal>,
    /// Percent, e.g. 0.5 for a 0.5% yield.
    #[schema(value_type = Option<f64>)]
    pub dividend_yield: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub ma50: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub ma200: Option<Decimal>,
}

impl From<core_stocks::Stock> for Stock {
    fn from(s: core_stocks::Stock) -> Self {
        Self {
            id: s.id,
            symbol: s.symbol,
            price: s.price,
            forward_pe: s.forward_pe,
            forward_eps: s.forward_eps,
            dividend_yield: s.dividend_yield,
            ma50: s.ma50,
            ma200: s.ma200,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewStockRequest {
    /// Missing and blank symbols are both rejected by validation.
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct StatusResponse {
    pub code: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            code: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Dashboard query string. Each parameter is active when present and
/// non-empty; `price` is accepted and echoed but never filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardFilters {
    pub price: Option<String>,
    /// Keep stocks whose forward P/E is below this value.
    pub forward_pe: Option<String>,
    /// Keep stocks whose dividend yield (percent) is above this value.
    pub dividend_yield: Option<String>,
    /// Any non-empty value keeps stocks trading above their 50-day average.
    pub ma50: Option<String>,
    /// Any non-empty value keeps stocks trading above their 200-day average.
    pub ma200: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_threshold(name: &str, value: &Option<String>) -> ApiResult<Option<Decimal>> {
    active(value)
        .map(|raw| {
            Decimal::from_str(raw)
                .map_err(|_| ApiError::BadRequest(format!("Invalid {} value: {}", name, raw)))
        })
        .transpose()
}

impl DashboardFilters {
    pub fn to_filter(&self) -> ApiResult<ScreenerFilter> {
        Ok(ScreenerFilter {
            forward_pe_max: parse_threshold("forward_pe", &self.forward_pe)?,
            dividend_yield_min: parse_threshold("dividend_yield", &self.dividend_yield)?,
            above_ma50: active(&self.ma50).is_some(),
            above_ma200: active(&self.ma200).is_some(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub stocks: Vec<Stock>,
    pub filters: DashboardFilters,
}

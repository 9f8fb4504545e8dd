//! Stock domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Domain model representing a screened stock.
///
/// Only `id` and `symbol` exist at creation. Every metric starts out absent
/// and is filled in by enrichment, field by field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: i32,
    pub symbol: String,
    /// Last known close price.
    pub price: Option<Decimal>,
    pub forward_pe: Option<Decimal>,
    pub forward_eps: Option<Decimal>,
    /// Percentage, e.g. `0.5` for a 0.5% yield.
    pub dividend_yield: Option<Decimal>,
    pub ma50: Option<Decimal>,
    pub ma200: Option<Decimal>,
}

impl Stock {
    /// A record as it exists right after creation: no metrics.
    pub fn bare(id: i32, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            price: None,
            forward_pe: None,
            forward_eps: None,
            dividend_yield: None,
            ma50: None,
            ma200: None,
        }
    }

    pub fn is_bare(&self) -> bool {
        self.price.is_none()
            && self.forward_pe.is_none()
            && self.forward_eps.is_none()
            && self.dividend_yield.is_none()
            && self.ma50.is_none()
            && self.ma200.is_none()
    }
}

/// Input model for creating a new stock.
///
/// Can only be built through [`NewStock::new`], so the symbol is always
/// normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStock {
    symbol: String,
}

impl NewStock {
    pub fn new(symbol: &str) -> Result<Self> {
        Ok(Self {
            symbol: normalize_symbol(symbol)?,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Trims and uppercases a ticker symbol. Blank input is rejected.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("symbol".to_string()).into());
    }
    Ok(trimmed.to_uppercase())
}

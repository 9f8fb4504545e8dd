use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::stocks::Stock;

/// The `f64` a threshold is compared as in storage, if it is exactly that
/// value.
///
/// Stored metrics are doubles, so a threshold that does not survive the
/// round trip would be compared against a different number than the one
/// given.
pub fn exact_f64(value: Decimal) -> Option<f64> {
    let double = value.to_f64().filter(|v| v.is_finite())?;
    (Decimal::from_f64(double)? == value).then_some(double)
}

/// Optional dashboard criteria. Every field is independent; the default
/// filter selects everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerFilter {
    /// Keep records whose forward P/E is strictly below this value.
    pub forward_pe_max: Option<Decimal>,
    /// Keep records whose dividend yield (percent) is strictly above this value.
    pub dividend_yield_min: Option<Decimal>,
    /// Keep records trading strictly above their 50-day average.
    pub above_ma50: bool,
    /// Keep records trading strictly above their 200-day average.
    pub above_ma200: bool,
}

impl ScreenerFilter {
    pub fn is_empty(&self) -> bool {
        self.to_predicate().is_empty()
    }

    /// Rejects thresholds that cannot be compared exactly against stored
    /// metrics.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("forward_pe", self.forward_pe_max),
            ("dividend_yield", self.dividend_yield_min),
        ] {
            if let Some(value) = value {
                if exact_f64(value).is_none() {
                    return Err(ValidationError::InvalidInput(format!(
                        "{} threshold {} has more precision than stored metrics",
                        name, value
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    /// One clause per active criterion, in a fixed order.
    pub fn to_predicate(&self) -> StockPredicate {
        let mut predicate = StockPredicate::all();
        if let Some(max) = self.forward_pe_max {
            predicate = predicate.and(StockClause::ForwardPeBelow(max));
        }
        if let Some(min) = self.dividend_yield_min {
            predicate = predicate.and(StockClause::DividendYieldAbove(min));
        }
        if self.above_ma50 {
            predicate = predicate.and(StockClause::PriceAboveMa50);
        }
        if self.above_ma200 {
            predicate = predicate.and(StockClause::PriceAboveMa200);
        }
        predicate
    }
}

/// A single comparison over one record.
///
/// A record lacking any field the clause reads never satisfies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockClause {
    ForwardPeBelow(Decimal),
    DividendYieldAbove(Decimal),
    PriceAboveMa50,
    PriceAboveMa200,
}

impl StockClause {
    pub fn matches(&self, stock: &Stock) -> bool {
        match self {
            StockClause::ForwardPeBelow(max) => stock.forward_pe.is_some_and(|pe| pe < *max),
            StockClause::DividendYieldAbove(min) => {
                stock.dividend_yield.is_some_and(|dy| dy > *min)
            }
            StockClause::PriceAboveMa50 => strictly_above(stock.price, stock.ma50),
            StockClause::PriceAboveMa200 => strictly_above(stock.price, stock.ma200),
        }
    }
}

fn strictly_above(value: Option<Decimal>, reference: Option<Decimal>) -> bool {
    matches!((value, reference), (Some(v), Some(r)) if v > r)
}

/// Conjunction of clauses. Empty matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPredicate {
    clauses: Vec<StockClause>,
}

impl StockPredicate {
    /// The predicate that matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: StockClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[StockClause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, stock: &Stock) -> bool {
        self.clauses.iter().all(|clause| clause.matches(stock))
    }
}

impl FromIterator<StockClause> for StockPredicate {
    fn from_iter<I: IntoIterator<Item = StockClause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

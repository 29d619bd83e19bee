//! Historical closing-price series and its normalizer.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::error::SilvertraderError;

/// A row as delivered by the history collaborator; `close` may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ascending, duplicate-free, non-empty sequence of closes in the source currency.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Drops missing and non-finite closes, keeps the last-seen close for a
    /// repeated date and sorts ascending.
    pub fn normalize(symbol: &str, raw: &[RawQuote]) -> Result<Self, SilvertraderError> {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for quote in raw {
            if let Some(close) = quote.close.filter(|c| c.is_finite()) {
                by_date.insert(quote.date, close);
            }
        }

        if by_date.is_empty() {
            return Err(SilvertraderError::InsufficientData {
                symbol: symbol.to_string(),
                points: 0,
                minimum: 1,
            });
        }

        let points = by_date
            .into_iter()
            .map(|(date, close)| PricePoint { date, close })
            .collect();

        Ok(PriceSeries {
            symbol: symbol.to_string(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first_close(&self) -> f64 {
        self.points[0].close
    }

    pub fn last_close(&self) -> f64 {
        self.points[self.points.len() - 1].close
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    /// The trailing `n` closes, or every close when fewer exist.
    pub fn tail_closes(&self, n: usize) -> Vec<f64> {
        let start = self.points.len().saturating_sub(n);
        self.points[start..].iter().map(|p| p.close).collect()
    }
}

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use silvertrader::domain::error::SilvertraderError;
use silvertrader::domain::news::NewsItem;
pub use silvertrader::domain::price_series::RawQuote;
use silvertrader::ports::history_port::HistoryPort;
use silvertrader::ports::news_port::NewsPort;
use silvertrader::ports::quote_port::QuoteSource;
use std::collections::HashMap;

pub struct MockHistoryPort {
    pub data: HashMap<String, Vec<RawQuote>>,
    pub errors: HashMap<String, String>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_rows(mut self, symbol: &str, rows: Vec<RawQuote>) -> Self {
        self.data.insert(symbol.to_string(), rows);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl HistoryPort for MockHistoryPort {
    fn fetch_history(
        &self,
        symbol: &str,
        lookback: usize,
    ) -> Result<Vec<RawQuote>, SilvertraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SilvertraderError::History {
                reason: reason.clone(),
            });
        }
        let rows = self.data.get(symbol).cloned().unwrap_or_default();
        let skip = rows.len().saturating_sub(lookback);
        Ok(rows.into_iter().skip(skip).collect())
    }
}

pub struct MockQuote {
    pub name: String,
    pub value: Result<f64, String>,
}

impl MockQuote {
    pub fn ok(name: &str, value: f64) -> Box<dyn QuoteSource + Send + Sync> {
        Box::new(Self {
            name: name.to_string(),
            value: Ok(value),
        })
    }

    pub fn failing(name: &str, reason: &str) -> Box<dyn QuoteSource + Send + Sync> {
        Box::new(Self {
            name: name.to_string(),
            value: Err(reason.to_string()),
        })
    }
}

impl QuoteSource for MockQuote {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<f64, SilvertraderError> {
        self.value.clone().map_err(|reason| SilvertraderError::Quote {
            source_name: self.name.clone(),
            reason,
        })
    }
}

pub struct MockNewsPort {
    pub items: Result<Vec<NewsItem>, String>,
}

impl NewsPort for MockNewsPort {
    fn fetch_news(&self) -> Result<Vec<NewsItem>, SilvertraderError> {
        self.items
            .clone()
            .map_err(|reason| SilvertraderError::News { reason })
    }
}

pub fn news_item(title: &str, weight: f64) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        description: format!("{title} in detail"),
        source: "Wire".to_string(),
        published_at: "2024-06-01T00:00:00Z".to_string(),
        weight,
    }
}

/// Daily rows starting at `start` (YYYY-MM-DD), one per close.
pub fn rows(start: &str, closes: &[f64]) -> Vec<RawQuote> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| RawQuote {
            date: start + Duration::days(i as i64),
            close: Some(c),
        })
        .collect()
}

/// Linear series `base, base + step, ...`.
pub fn linear_rows(start: &str, count: usize, base: f64, step: f64) -> Vec<RawQuote> {
    let closes: Vec<f64> = (0..count).map(|i| base + step * i as f64).collect();
    rows(start, &closes)
}

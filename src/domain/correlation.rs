//! Cross-asset percent changes (e.g. dollar index, gold) over a short lookback.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::price_series::{PriceSeries, RawQuote};
use super::snapshot::percent_change;
use crate::ports::history_port::HistoryPort;

pub const DEFAULT_CORRELATION_LOOKBACK: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationFeed {
    pub name: String,
    pub symbol: String,
}

impl CorrelationFeed {
    pub fn new(name: &str, symbol: &str) -> Self {
        CorrelationFeed {
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// First-to-last percent change over the trailing `lookback` usable closes;
/// 0 when fewer than two remain.
pub fn lookback_change(symbol: &str, raw: &[RawQuote], lookback: usize) -> f64 {
    let Ok(series) = PriceSeries::normalize(symbol, raw) else {
        return 0.0;
    };
    let tail = series.tail_closes(lookback);
    match (tail.first(), tail.last()) {
        (Some(&first), Some(&last)) if tail.len() >= 2 => percent_change(first, last),
        _ => 0.0,
    }
}

/// One entry per feed; a feed that fails or is too short reports 0.
pub fn gather_correlations(
    port: &dyn HistoryPort,
    feeds: &[CorrelationFeed],
    lookback: usize,
) -> BTreeMap<String, f64> {
    feeds
        .iter()
        .map(|feed| {
            let change = match port.fetch_history(&feed.symbol, lookback) {
                Ok(raw) => lookback_change(&feed.symbol, &raw, lookback),
                Err(e) => {
                    warn!(feed = %feed.name, symbol = %feed.symbol, error = %e, "correlation feed unavailable, using 0%");
                    0.0
                }
            };
            debug!(feed = %feed.name, change, "correlation change");
            (feed.name.clone(), change)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::SilvertraderError;
    use chrono::{Duration, NaiveDate};

    fn rows(closes: &[Option<f64>]) -> Vec<RawQuote> {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| RawQuote {
                date: start + Duration::days(i as i64),
                close,
            })
            .collect()
    }

    struct StubPort;

    impl HistoryPort for StubPort {
        fn fetch_history(&self, symbol: &str, _lookback: usize) -> Result<Vec<RawQuote>, SilvertraderError> {
            match symbol {
                "GC=F" => Ok(rows(&[Some(2000.0), Some(2010.0), Some(2020.0)])),
                _ => Err(SilvertraderError::History {
                    reason: format!("no feed for {symbol}"),
                }),
            }
        }
    }

    #[test]
    fn lookback_change_uses_trailing_window() {
        let raw = rows(&[Some(50.0), Some(100.0), None, Some(104.0), Some(110.0)]);
        let change = lookback_change("DXY", &raw, 3);
        assert!((change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn lookback_change_needs_two_points() {
        assert_eq!(lookback_change("DXY", &rows(&[Some(100.0)]), 5), 0.0);
        assert_eq!(lookback_change("DXY", &rows(&[None, None]), 5), 0.0);
    }

    #[test]
    fn failed_feed_degrades_to_zero() {
        let feeds = vec![
            CorrelationFeed::new("gold_change", "GC=F"),
            CorrelationFeed::new("usd_index_change", "DX-Y.NYB"),
        ];
        let map = gather_correlations(&StubPort, &feeds, DEFAULT_CORRELATION_LOOKBACK);
        assert_eq!(map.len(), 2);
        assert!((map["gold_change"] - 1.0).abs() < 1e-9);
        assert_eq!(map["usd_index_change"], 0.0);
    }
}

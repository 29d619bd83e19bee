//! CSV file history adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row naming at
//! least `date` and `close`. A blank, `null` or `nan` close is delivered as a
//! missing value for the normalizer to drop.

use crate::domain::error::SilvertraderError;
use crate::domain::price_series::RawQuote;
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Result<usize, SilvertraderError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| SilvertraderError::History {
            reason: format!("missing {} column", name),
        })
}

fn parse_close(value: &str) -> Result<Option<f64>, SilvertraderError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("null") || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    value
        .replace(',', "")
        .parse::<f64>()
        .map(Some)
        .map_err(|e| SilvertraderError::History {
            reason: format!("invalid close value '{}': {}", value, e),
        })
}

impl HistoryPort for CsvAdapter {
    fn fetch_history(
        &self,
        symbol: &str,
        lookback: usize,
    ) -> Result<Vec<RawQuote>, SilvertraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SilvertraderError::History {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| SilvertraderError::History {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let date_idx = column(&headers, "date")?;
        let close_idx = column(&headers, "close")?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SilvertraderError::History {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_idx).ok_or_else(|| SilvertraderError::History {
                reason: "missing date value".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                SilvertraderError::History {
                    reason: format!("invalid date format: {}", e),
                }
            })?;
            let close = parse_close(record.get(close_idx).unwrap_or(""))?;

            rows.push(RawQuote { date, close });
        }

        rows.sort_by_key(|r| r.date);
        if lookback > 0 && rows.len() > lookback {
            rows.drain(..rows.len() - lookback);
        }
        debug!(symbol, rows = rows.len(), path = %path.display(), "loaded history");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,29.0,29.6,28.8,29.4,1200\n\
            2024-01-15,28.0,28.5,27.9,28.2,1000\n\
            2024-01-16,28.2,29.1,28.1,,1100\n\
            2024-01-18,29.4,30.2,29.3,30.1,1300\n";
        fs::write(path.join("SI=F.csv"), csv_content).unwrap();
        fs::write(path.join("GC=F.csv"), "Date,Close\n2024-01-15,null\n2024-01-16,\"2,031.5\"\n").unwrap();
        fs::write(path.join("BAD.csv"), "date,open\n2024-01-15,1.0\n").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_history_sorts_and_keeps_missing_closes() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let rows = adapter.fetch_history("SI=F", 30).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(rows[0].close, Some(28.2));
        assert_eq!(rows[1].close, None);
        assert_eq!(rows[3].close, Some(30.1));
    }

    #[test]
    fn fetch_history_keeps_trailing_lookback() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let rows = adapter.fetch_history("SI=F", 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 18).unwrap());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let rows = adapter.fetch_history("GC=F", 5).unwrap();
        assert_eq!(rows[0].close, None);
        assert_eq!(rows[1].close, Some(2031.5));
    }

    #[test]
    fn missing_file_and_column_are_history_errors() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_history("XYZ", 30).unwrap_err();
        assert_eq!(err.kind(), "history_unavailable");
        let err = adapter.fetch_history("BAD", 30).unwrap_err();
        assert!(err.to_string().contains("missing close column"));
    }
}

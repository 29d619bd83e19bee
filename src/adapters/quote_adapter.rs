//! Quote source adapters: constants and single-number text files.

use crate::domain::error::SilvertraderError;
use crate::ports::quote_port::QuoteSource;
use std::fs;
use std::path::PathBuf;

/// Always answers with the same value.
pub struct FixedQuote {
    name: String,
    value: f64,
}

impl FixedQuote {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

impl QuoteSource for FixedQuote {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<f64, SilvertraderError> {
        Ok(self.value)
    }
}

/// Reads one number from a text file, e.g. one written by a page scraper.
/// Thousands separators and a leading currency symbol are ignored.
pub struct FileQuote {
    name: String,
    path: PathBuf,
}

impl FileQuote {
    pub fn new(name: &str, path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            path,
        }
    }

    fn error(&self, reason: String) -> SilvertraderError {
        SilvertraderError::Quote {
            source_name: self.name.clone(),
            reason,
        }
    }
}

impl QuoteSource for FileQuote {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<f64, SilvertraderError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.error(format!("failed to read {}: {}", self.path.display(), e)))?;
        let cleaned: String = content
            .trim()
            .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        cleaned
            .trim()
            .parse::<f64>()
            .map_err(|e| self.error(format!("invalid quote '{}': {}", content.trim(), e)))
    }
}

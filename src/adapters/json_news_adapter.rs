//! News adapter reading a JSON array of articles from disk.

use crate::domain::error::SilvertraderError;
use crate::domain::news::NewsItem;
use crate::ports::news_port::NewsPort;
use std::fs;
use std::path::PathBuf;

pub struct JsonNewsAdapter {
    path: PathBuf,
}

impl JsonNewsAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl NewsPort for JsonNewsAdapter {
    fn fetch_news(&self) -> Result<Vec<NewsItem>, SilvertraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| SilvertraderError::News {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        serde_json::from_str(&content).map_err(|e| SilvertraderError::News {
            reason: format!("invalid news file {}: {}", self.path.display(), e),
        })
    }
}

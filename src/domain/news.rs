//! News items forwarded to the recommendation step.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, alias = "publishedAt")]
    pub published_at: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Drops untitled items, orders by weight (heaviest first, ties keep feed
/// order) and keeps at most `limit`.
pub fn rank_news(items: Vec<NewsItem>, limit: usize) -> Vec<NewsItem> {
    let mut ranked: Vec<NewsItem> = items
        .into_iter()
        .filter(|n| !n.title.trim().is_empty())
        .collect();
    ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    ranked.truncate(limit);
    ranked
}

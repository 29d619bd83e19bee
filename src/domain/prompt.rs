//! Structured text handed to the recommendation model.

use std::fmt::{self, Write};

use super::news::NewsItem;
use super::snapshot::MarketSnapshot;

pub const PROMPT_NEWS_ITEMS: usize = 6;
pub const NEWS_DESCRIPTION_CHARS: usize = 150;

pub fn render_prompt(snapshot: &MarketSnapshot, news: &[NewsItem]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_prompt(&mut out, snapshot, news);
    out
}

fn write_prompt(out: &mut String, snap: &MarketSnapshot, news: &[NewsItem]) -> fmt::Result {
    let tech = snap.technical();
    let premium = snap.premium();
    let stats = snap.stats();

    writeln!(out, "You are a precious metals analyst covering the Indian silver market.")?;
    writeln!(out, "All prices are INR per kg unless stated otherwise.")?;
    writeln!(out)?;

    writeln!(out, "## Market data ({}, as of {})", snap.symbol(), snap.as_of())?;
    writeln!(out, "- Retail price: {:.2}", snap.current_price())?;
    writeln!(out, "- Spot price (converted): {:.2}", premium.spot_converted)?;
    writeln!(
        out,
        "- Premium: {:.2} ({:.2}%)",
        premium.premium_absolute, premium.premium_percent
    )?;
    writeln!(out, "- 7-point change: {:.2}%", stats.change_7)?;
    writeln!(out, "- {}-point change: {:.2}%", snap.points(), stats.change_full)?;
    writeln!(out, "- 7-point range: {:.2} - {:.2}", stats.low_7, stats.high_7)?;
    writeln!(
        out,
        "- {}-point range: {:.2} - {:.2}",
        snap.points(),
        stats.low_full,
        stats.high_full
    )?;
    writeln!(out)?;

    writeln!(out, "## Technical indicators")?;
    writeln!(out, "- Trend: {}", tech.trend)?;
    writeln!(out, "- RSI: {:.2}", tech.rsi)?;
    writeln!(out, "- Support: {:.2}", tech.support)?;
    writeln!(out, "- Resistance: {:.2}", tech.resistance)?;
    writeln!(out, "- Short SMA: {:.2}", tech.short_ma)?;
    writeln!(out, "- Long SMA: {:.2}", tech.long_ma)?;
    writeln!(out)?;

    writeln!(out, "## Correlations")?;
    for (name, change) in snap.correlations() {
        writeln!(out, "- {name}: {change:.2}%")?;
    }
    writeln!(out, "- USD/INR: {:.2}", snap.conversion().currency_rate)?;
    writeln!(out)?;

    writeln!(out, "## News")?;
    let headlines: Vec<&NewsItem> = news
        .iter()
        .filter(|n| !n.title.trim().is_empty())
        .take(PROMPT_NEWS_ITEMS)
        .collect();
    if headlines.is_empty() {
        writeln!(out, "No recent silver news available.")?;
    }
    for item in headlines {
        writeln!(
            out,
            "- [{}] {} - {}",
            item.source,
            item.title,
            truncate_chars(&item.description, NEWS_DESCRIPTION_CHARS)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Respond with")?;
    writeln!(out, "Recommendation: Buy, Hold or Sell.")?;
    writeln!(out, "Reason: premium level, technical picture, news and correlations.")?;
    writeln!(out, "Holding period: if buying, short, medium or long term with reasoning.")?;
    writeln!(out, "Target price range: in INR per kg, justified by support and resistance.")?;
    Ok(())
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

//! End-to-end market analysis: ports in, [`MarketSnapshot`] out.
//!
//! Collaborator I/O happens here, up front; everything downstream of
//! [`compose_from_normalized`] is pure.

use serde::Serialize;
use tracing::{info, warn};

use super::conversion::{Conversion, TROY_OUNCES_PER_KG};
use super::correlation::{gather_correlations, CorrelationFeed, DEFAULT_CORRELATION_LOOKBACK};
use super::error::SilvertraderError;
use super::indicator::IndicatorWindows;
use super::news::{rank_news, NewsItem};
use super::premium::SpotEstimateQuote;
use super::price_series::PriceSeries;
use super::quote_chain::QuoteChain;
use super::snapshot::{compose_from_normalized, MarketSnapshot, SeriesInputs};
use crate::ports::history_port::HistoryPort;
use crate::ports::news_port::NewsPort;
use crate::ports::quote_port::QuoteSource;

pub const DEFAULT_SYMBOL: &str = "SI=F";
pub const DEFAULT_HISTORY_LOOKBACK: usize = 30;
pub const DEFAULT_NEWS_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub symbol: String,
    pub history_lookback: usize,
    pub unit_multiplier: f64,
    pub windows: IndicatorWindows,
    pub correlation_feeds: Vec<CorrelationFeed>,
    pub correlation_lookback: usize,
    /// When set, a spot-derived estimate is tried before the retail fallback.
    pub estimate_markup_pct: Option<f64>,
    pub news_limit: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            symbol: DEFAULT_SYMBOL.to_string(),
            history_lookback: DEFAULT_HISTORY_LOOKBACK,
            unit_multiplier: TROY_OUNCES_PER_KG,
            windows: IndicatorWindows::default(),
            correlation_feeds: Vec::new(),
            correlation_lookback: DEFAULT_CORRELATION_LOOKBACK,
            estimate_markup_pct: None,
            news_limit: DEFAULT_NEWS_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub snapshot: MarketSnapshot,
    pub news: Vec<NewsItem>,
    pub retail_source: String,
    pub fx_source: String,
}

pub fn run_analysis(
    history: &dyn HistoryPort,
    retail_chain: &QuoteChain,
    fx_chain: &QuoteChain,
    news: Option<&dyn NewsPort>,
    settings: &AnalysisSettings,
) -> Result<AnalysisReport, SilvertraderError> {
    let wrap = |e: SilvertraderError| SilvertraderError::Snapshot(Box::new(e));

    let fx = fx_chain.resolve();
    let conversion = Conversion::new(settings.unit_multiplier, fx.value);

    let raw = history
        .fetch_history(&settings.symbol, settings.history_lookback)
        .map_err(wrap)?;
    let series = PriceSeries::normalize(&settings.symbol, &raw).map_err(wrap)?;

    let estimate = settings
        .estimate_markup_pct
        .map(|markup| SpotEstimateQuote::new(series.last_close(), conversion, markup));
    let extra: Vec<&dyn QuoteSource> = estimate
        .as_ref()
        .map(|e| e as &dyn QuoteSource)
        .into_iter()
        .collect();
    let retail = retail_chain.resolve_with(&extra);

    let correlations = gather_correlations(
        history,
        &settings.correlation_feeds,
        settings.correlation_lookback,
    );

    let news = match news {
        Some(port) => match port.fetch_news() {
            Ok(items) => rank_news(items, settings.news_limit),
            Err(e) => {
                warn!(error = %e, "news unavailable, continuing without it");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let snapshot = compose_from_normalized(SeriesInputs {
        series: &series,
        retail_price: Some(retail.value),
        conversion,
        windows: settings.windows,
        correlations,
        news_count: news.len(),
    })?;

    info!(
        symbol = %settings.symbol,
        points = snapshot.points(),
        retail = retail.value,
        retail_source = %retail.source,
        fx = fx.value,
        fx_source = %fx.source,
        trend = %snapshot.technical().trend,
        "analysis complete"
    );

    Ok(AnalysisReport {
        snapshot,
        news,
        retail_source: retail.source,
        fx_source: fx.source,
    })
}

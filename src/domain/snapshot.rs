//! Market snapshot composition.
//!
//! A [`MarketSnapshot`] is only obtainable through [`compose_snapshot`], which
//! either returns a fully populated value or a single `Snapshot` error.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::conversion::Conversion;
use super::error::SilvertraderError;
use super::indicator::{compute_technical, IndicatorWindows, TechnicalSnapshot};
use super::premium::{analyze_premium, PremiumResult};
use super::price_series::{PriceSeries, RawQuote};

/// Lookback, in points, of the short-range change and high/low band.
pub const SHORT_RANGE_POINTS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub change_7: f64,
    pub change_full: f64,
    pub high_7: f64,
    pub low_7: f64,
    pub high_full: f64,
    pub low_full: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    symbol: String,
    as_of: NaiveDate,
    points: usize,
    current_price: f64,
    spot_price_raw: f64,
    conversion: Conversion,
    technical: TechnicalSnapshot,
    premium: PremiumResult,
    stats: PriceStats,
    correlations: BTreeMap<String, f64>,
    news_count: usize,
}

impl MarketSnapshot {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Date of the last close in the window.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn points(&self) -> usize {
        self.points
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn spot_price_raw(&self) -> f64 {
        self.spot_price_raw
    }

    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    pub fn technical(&self) -> &TechnicalSnapshot {
        &self.technical
    }

    pub fn premium(&self) -> &PremiumResult {
        &self.premium
    }

    pub fn stats(&self) -> &PriceStats {
        &self.stats
    }

    pub fn correlations(&self) -> &BTreeMap<String, f64> {
        &self.correlations
    }

    pub fn news_count(&self) -> usize {
        self.news_count
    }
}

pub struct SnapshotInputs<'a> {
    pub symbol: &'a str,
    pub history: &'a [RawQuote],
    pub retail_price: Option<f64>,
    pub conversion: Conversion,
    pub windows: IndicatorWindows,
    pub correlations: BTreeMap<String, f64>,
    pub news_count: usize,
}

pub fn compose_snapshot(inputs: SnapshotInputs<'_>) -> Result<MarketSnapshot, SilvertraderError> {
    let wrap = |e: SilvertraderError| SilvertraderError::Snapshot(Box::new(e));

    let series = PriceSeries::normalize(inputs.symbol, inputs.history).map_err(wrap)?;
    compose_from_normalized(SeriesInputs {
        series: &series,
        retail_price: inputs.retail_price,
        conversion: inputs.conversion,
        windows: inputs.windows,
        correlations: inputs.correlations,
        news_count: inputs.news_count,
    })
}

/// [`SnapshotInputs`] over a series that is already normalized.
pub struct SeriesInputs<'a> {
    pub series: &'a PriceSeries,
    pub retail_price: Option<f64>,
    pub conversion: Conversion,
    pub windows: IndicatorWindows,
    pub correlations: BTreeMap<String, f64>,
    pub news_count: usize,
}

pub fn compose_from_normalized(inputs: SeriesInputs<'_>) -> Result<MarketSnapshot, SilvertraderError> {
    let retail_price = validate_retail(inputs.retail_price)
        .map_err(|e| SilvertraderError::Snapshot(Box::new(e)))?;

    Ok(compose_from_series(
        inputs.series,
        retail_price,
        inputs.conversion,
        inputs.windows,
        inputs.correlations,
        inputs.news_count,
    ))
}

fn validate_retail(price: Option<f64>) -> Result<f64, SilvertraderError> {
    match price {
        None => Err(SilvertraderError::invalid_price(
            "retail_price",
            "no retail price supplied",
        )),
        Some(p) if !p.is_finite() || p <= 0.0 => Err(SilvertraderError::invalid_price(
            "retail_price",
            format!("must be positive, got {p}"),
        )),
        Some(p) => Ok(p),
    }
}

fn compose_from_series(
    series: &PriceSeries,
    retail_price: f64,
    conversion: Conversion,
    windows: IndicatorWindows,
    correlations: BTreeMap<String, f64>,
    news_count: usize,
) -> MarketSnapshot {
    let spot_price_raw = series.last_close();
    MarketSnapshot {
        symbol: series.symbol().to_string(),
        as_of: series.last_date(),
        points: series.len(),
        current_price: retail_price,
        spot_price_raw,
        conversion,
        technical: compute_technical(series, windows, conversion),
        premium: analyze_premium(retail_price, spot_price_raw, conversion),
        stats: price_stats(series, conversion),
        correlations,
        news_count,
    }
}

/// Percent-change and high/low statistics; bands are converted, changes are not.
pub fn price_stats(series: &PriceSeries, conversion: Conversion) -> PriceStats {
    let closes = series.closes();
    let last = series.last_close();

    let change_7 = if closes.len() >= SHORT_RANGE_POINTS {
        percent_change(closes[closes.len() - SHORT_RANGE_POINTS], last)
    } else {
        0.0
    };
    let change_full = if closes.len() > 1 {
        percent_change(series.first_close(), last)
    } else {
        0.0
    };

    let (low_7, high_7) = min_max(&series.tail_closes(SHORT_RANGE_POINTS));
    let (low_full, high_full) = min_max(&closes);

    PriceStats {
        change_7,
        change_full,
        high_7: conversion.apply(high_7),
        low_7: conversion.apply(low_7),
        high_full: conversion.apply(high_full),
        low_full: conversion.apply(low_full),
    }
}

/// `(to - from) / from * 100`, or 0 when `from` is 0 or the result is not finite.
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    let change = (to - from) / from * 100.0;
    if change.is_finite() { change } else { 0.0 }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

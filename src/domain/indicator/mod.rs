//! Technical indicator calculator.
//!
//! Turns a [`PriceSeries`] into a [`TechnicalSnapshot`]:
//! - `sma`: short and long simple moving averages
//! - `rsi`: trailing relative strength index
//! - `bands`: support/resistance from the trailing min/max close
//!
//! Price-valued outputs are scaled through a [`Conversion`]; RSI and trend are
//! unit-free. The calculator never fails: a numeric fault yields
//! [`TechnicalSnapshot::neutral`].

pub mod bands;
pub mod rsi;
pub mod sma;

use serde::Serialize;
use std::fmt;
use tracing::warn;

use super::conversion::Conversion;
use super::price_series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Bullish,
    Bearish,
    /// Only produced by the fault snapshot.
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "Bullish"),
            Trend::Bearish => write!(f, "Bearish"),
            Trend::Neutral => write!(f, "Neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorWindows {
    pub short: usize,
    pub long: usize,
    pub rsi: usize,
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        IndicatorWindows {
            short: 5,
            long: 20,
            rsi: 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TechnicalSnapshot {
    pub short_ma: f64,
    pub long_ma: f64,
    pub rsi: f64,
    pub resistance: f64,
    pub support: f64,
    pub trend: Trend,
}

impl TechnicalSnapshot {
    pub fn neutral() -> Self {
        TechnicalSnapshot {
            short_ma: 0.0,
            long_ma: 0.0,
            rsi: rsi::NEUTRAL_RSI,
            resistance: 0.0,
            support: 0.0,
            trend: Trend::Neutral,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("indicator computation fault: {0}")]
struct ComputationFault(&'static str);

/// Computes the snapshot, degrading to [`TechnicalSnapshot::neutral`] on any fault.
pub fn compute_technical(
    series: &PriceSeries,
    windows: IndicatorWindows,
    conversion: Conversion,
) -> TechnicalSnapshot {
    match try_compute(series, windows, conversion) {
        Ok(snapshot) => snapshot,
        Err(fault) => {
            warn!(symbol = series.symbol(), %fault, "returning neutral technical snapshot");
            TechnicalSnapshot::neutral()
        }
    }
}

fn try_compute(
    series: &PriceSeries,
    windows: IndicatorWindows,
    conversion: Conversion,
) -> Result<TechnicalSnapshot, ComputationFault> {
    let closes = series.closes();

    let short_ma = sma::trailing_mean(&closes, windows.short)
        .ok_or(ComputationFault("short moving average undefined"))?;
    let long_ma = sma::trailing_mean(&closes, windows.long)
        .ok_or(ComputationFault("long moving average undefined"))?;
    let rsi = rsi::trailing_rsi(&closes, windows.rsi).ok_or(ComputationFault("rsi undefined"))?;
    let (low, high) = bands::trailing_range(&closes, windows.long)
        .ok_or(ComputationFault("support/resistance undefined"))?;

    // Compared on unconverted averages.
    let trend = if short_ma > long_ma {
        Trend::Bullish
    } else {
        Trend::Bearish
    };

    let snapshot = TechnicalSnapshot {
        short_ma: conversion.apply(short_ma),
        long_ma: conversion.apply(long_ma),
        rsi,
        resistance: conversion.apply(high),
        support: conversion.apply(low),
        trend,
    };

    let prices = [
        snapshot.short_ma,
        snapshot.long_ma,
        snapshot.resistance,
        snapshot.support,
    ];
    if prices.iter().all(|p| p.is_finite()) {
        Ok(snapshot)
    } else {
        Err(ComputationFault("converted price is not finite"))
    }
}

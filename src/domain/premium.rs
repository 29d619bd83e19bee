//! Retail premium over the converted spot price.

use serde::Serialize;

use super::conversion::Conversion;
use super::error::SilvertraderError;
use crate::ports::quote_port::QuoteSource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PremiumResult {
    pub spot_converted: f64,
    pub premium_absolute: f64,
    pub premium_percent: f64,
}

impl PremiumResult {
    pub fn zero() -> Self {
        PremiumResult {
            spot_converted: 0.0,
            premium_absolute: 0.0,
            premium_percent: 0.0,
        }
    }
}

/// `retail_price` is already in the retail unit/currency; `spot_raw` is not.
///
/// `premium_percent` is 0 when the converted spot is 0, and any non-finite
/// outcome collapses to [`PremiumResult::zero`].
pub fn analyze_premium(retail_price: f64, spot_raw: f64, conversion: Conversion) -> PremiumResult {
    let spot_converted = conversion.apply(spot_raw);
    let premium_absolute = retail_price - spot_converted;
    let premium_percent = if spot_converted == 0.0 {
        0.0
    } else {
        premium_absolute / spot_converted * 100.0
    };

    let result = PremiumResult {
        spot_converted,
        premium_absolute,
        premium_percent,
    };
    if [spot_converted, premium_absolute, premium_percent]
        .iter()
        .all(|v| v.is_finite())
    {
        result
    } else {
        PremiumResult::zero()
    }
}

/// Retail price estimated from the converted spot plus a fixed markup.
/// Used when no retail quote can be observed directly.
#[derive(Debug, Clone, Copy)]
pub struct SpotEstimateQuote {
    spot_raw: f64,
    conversion: Conversion,
    markup_pct: f64,
}

impl SpotEstimateQuote {
    pub fn new(spot_raw: f64, conversion: Conversion, markup_pct: f64) -> Self {
        SpotEstimateQuote {
            spot_raw,
            conversion,
            markup_pct,
        }
    }
}

impl QuoteSource for SpotEstimateQuote {
    fn name(&self) -> &str {
        "spot_estimate"
    }

    fn fetch(&self) -> Result<f64, SilvertraderError> {
        let estimate = self.conversion.apply(self.spot_raw) * (1.0 + self.markup_pct / 100.0);
        if estimate.is_finite() && estimate > 0.0 {
            Ok(estimate)
        } else {
            Err(SilvertraderError::Quote {
                source_name: self.name().to_string(),
                reason: format!("estimate {estimate} is not a usable price"),
            })
        }
    }
}

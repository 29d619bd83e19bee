//! Unit and currency conversion applied to benchmark prices.

use serde::Serialize;

/// Troy ounces per kilogram.
pub const TROY_OUNCES_PER_KG: f64 = 32.15;

/// USD→INR rate used when no live rate is available.
pub const FALLBACK_USD_INR: f64 = 83.0;

/// Scales a source-unit, source-currency price into the retail unit and currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conversion {
    pub unit_multiplier: f64,
    pub currency_rate: f64,
}

impl Conversion {
    pub fn new(unit_multiplier: f64, currency_rate: f64) -> Self {
        Conversion {
            unit_multiplier,
            currency_rate,
        }
    }

    /// USD per troy ounce into INR per kilogram at the given rate.
    pub fn per_kg(currency_rate: f64) -> Self {
        Conversion::new(TROY_OUNCES_PER_KG, currency_rate)
    }

    /// Identity conversion; useful when the feed is already in the retail unit.
    pub fn identity() -> Self {
        Conversion::new(1.0, 1.0)
    }

    pub fn factor(&self) -> f64 {
        self.unit_multiplier * self.currency_rate
    }

    pub fn apply(&self, price: f64) -> f64 {
        price * self.unit_multiplier * self.currency_rate
    }
}

impl Default for Conversion {
    fn default() -> Self {
        Conversion::per_kg(FALLBACK_USD_INR)
    }
}

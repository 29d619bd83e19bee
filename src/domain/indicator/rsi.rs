//! RSI (Relative Strength Index) over a trailing window.
//!
//! Uses simple means of the trailing gains and losses (no Wilder smoothing):
//! - deltas: the last `min(period, len - 1)` close-to-close changes
//! - RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! Special cases:
//! - fewer than `period` closes: 50 (no signal)
//! - avg_loss == 0 and avg_gain > 0: 100
//! - avg_loss == 0 and avg_gain == 0 (flat window): 50

pub const NEUTRAL_RSI: f64 = 50.0;

/// Returns `None` when `period` is zero or the result is not finite.
pub fn trailing_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    if closes.len() < period || closes.len() < 2 {
        return Some(NEUTRAL_RSI);
    }

    let deltas = period.min(closes.len() - 1);
    let start = closes.len() - deltas - 1;
    let window = &closes[start..];

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gain_sum += change;
        } else if change < 0.0 {
            loss_sum -= change;
        }
    }

    let avg_gain = gain_sum / deltas as f64;
    let avg_loss = loss_sum / deltas as f64;

    let rsi = if avg_loss == 0.0 {
        if avg_gain == 0.0 { NEUTRAL_RSI } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    };

    if rsi.is_finite() {
        Some(rsi.clamp(0.0, 100.0))
    } else {
        None
    }
}

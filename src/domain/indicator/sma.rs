//! Simple moving average over a trailing window.

/// Mean of the last `window` closes, or of every close when fewer exist.
///
/// Returns `None` for an empty input or a zero window.
pub fn trailing_mean(closes: &[f64], window: usize) -> Option<f64> {
    if closes.is_empty() || window == 0 {
        return None;
    }
    let start = closes.len().saturating_sub(window);
    let tail = &closes[start..];
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_last_window() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let sma = trailing_mean(&closes, 5).unwrap();
        assert!((sma - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shorter_input_uses_all_closes() {
        let closes = [10.0, 20.0, 30.0];
        let sma = trailing_mean(&closes, 5).unwrap();
        assert!((sma - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_or_zero_window_is_none() {
        assert!(trailing_mean(&[], 5).is_none());
        assert!(trailing_mean(&[1.0], 0).is_none());
    }
}

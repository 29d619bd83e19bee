//! Support/resistance as the trailing min/max close.

/// `(min, max)` of the last `window` closes, or of all closes when fewer exist.
pub fn trailing_range(closes: &[f64], window: usize) -> Option<(f64, f64)> {
    if closes.is_empty() || window == 0 {
        return None;
    }
    let start = closes.len().saturating_sub(window);
    closes[start..].iter().fold(None, |acc, &c| match acc {
        None => Some((c, c)),
        Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_over_trailing_window() {
        let closes = [1.0, 50.0, 3.0, 7.0, 5.0];
        assert_eq!(trailing_range(&closes, 3), Some((3.0, 7.0)));
    }

    #[test]
    fn range_over_everything_when_short() {
        let closes = [4.0, 2.0, 9.0];
        assert_eq!(trailing_range(&closes, 20), Some((2.0, 9.0)));
    }

    #[test]
    fn range_of_nothing_is_none() {
        assert_eq!(trailing_range(&[], 20), None);
    }
}

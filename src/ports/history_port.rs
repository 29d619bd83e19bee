//! Historical price series port.

use crate::domain::error::SilvertraderError;
use crate::domain::price_series::RawQuote;

pub trait HistoryPort {
    /// The most recent `lookback` rows for `symbol`, in any order; closes may be missing.
    fn fetch_history(
        &self,
        symbol: &str,
        lookback: usize,
    ) -> Result<Vec<RawQuote>, SilvertraderError>;
}

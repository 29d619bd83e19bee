//! Single-value quote port (retail price, FX rate).

use crate::domain::error::SilvertraderError;

pub trait QuoteSource {
    /// Name recorded alongside the value when this source satisfies a request.
    fn name(&self) -> &str;

    fn fetch(&self) -> Result<f64, SilvertraderError>;
}

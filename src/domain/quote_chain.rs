//! Ordered fallback over quote sources.
//!
//! Sources are tried in order; the first finite, positive value wins. When
//! every source fails the chain answers with its last-known-good constant, so
//! resolution itself never fails.

use serde::Serialize;
use tracing::{debug, warn};

use crate::ports::quote_port::QuoteSource;

pub const FALLBACK_SOURCE: &str = "fallback";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuote {
    pub value: f64,
    pub source: String,
}

impl ResolvedQuote {
    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_SOURCE
    }
}

pub struct QuoteChain {
    label: String,
    sources: Vec<Box<dyn QuoteSource + Send + Sync>>,
    fallback: f64,
}

impl QuoteChain {
    pub fn new(label: &str, fallback: f64) -> Self {
        QuoteChain {
            label: label.to_string(),
            sources: Vec::new(),
            fallback,
        }
    }

    pub fn with_source(mut self, source: Box<dyn QuoteSource + Send + Sync>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self) -> ResolvedQuote {
        self.resolve_with(&[])
    }

    /// Like [`resolve`](Self::resolve), trying `extra` after the configured
    /// sources and before the fallback constant.
    pub fn resolve_with(&self, extra: &[&dyn QuoteSource]) -> ResolvedQuote {
        let configured = self
            .sources
            .iter()
            .map(|s| s.as_ref() as &dyn QuoteSource);
        for source in configured.chain(extra.iter().copied()) {
            match source.fetch() {
                Ok(value) if value.is_finite() && value > 0.0 => {
                    debug!(chain = %self.label, source = source.name(), value, "quote resolved");
                    return ResolvedQuote {
                        value,
                        source: source.name().to_string(),
                    };
                }
                Ok(value) => {
                    warn!(chain = %self.label, source = source.name(), value, "quote source returned unusable value");
                }
                Err(e) => {
                    warn!(chain = %self.label, source = source.name(), error = %e, "quote source failed");
                }
            }
        }
        warn!(chain = %self.label, value = self.fallback, "all quote sources failed, using fallback");
        ResolvedQuote {
            value: self.fallback,
            source: FALLBACK_SOURCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::SilvertraderError;

    struct Stub {
        name: &'static str,
        result: Result<f64, &'static str>,
    }

    impl QuoteSource for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn fetch(&self) -> Result<f64, SilvertraderError> {
            self.result.map_err(|reason| SilvertraderError::Quote {
                source_name: self.name.to_string(),
                reason: reason.to_string(),
            })
        }
    }

    fn stub(name: &'static str, result: Result<f64, &'static str>) -> Box<dyn QuoteSource + Send + Sync> {
        Box::new(Stub { name, result })
    }

    #[test]
    fn first_working_source_wins() {
        let chain = QuoteChain::new("retail", 116_000.0)
            .with_source(stub("scrape", Err("timeout")))
            .with_source(stub("file", Ok(118_500.0)))
            .with_source(stub("never", Ok(1.0)));
        let quote = chain.resolve();
        assert_eq!(quote.value, 118_500.0);
        assert_eq!(quote.source, "file");
        assert!(!quote.is_fallback());
    }

    #[test]
    fn unusable_values_are_skipped() {
        let chain = QuoteChain::new("fx", 83.0)
            .with_source(stub("zero", Ok(0.0)))
            .with_source(stub("nan", Ok(f64::NAN)));
        let quote = chain.resolve();
        assert_eq!(quote.value, 83.0);
        assert!(quote.is_fallback());
    }

    #[test]
    fn extra_sources_come_after_configured_ones() {
        let chain = QuoteChain::new("retail", 1.0).with_source(stub("scrape", Err("down")));
        let estimate = Stub {
            name: "estimate",
            result: Ok(117_000.0),
        };
        let quote = chain.resolve_with(&[&estimate]);
        assert_eq!(quote.source, "estimate");
        assert_eq!(chain.source_names(), vec!["scrape"]);
    }
}

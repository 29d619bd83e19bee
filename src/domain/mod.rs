//! Core domain types and logic.

pub mod error;
pub mod conversion;
pub mod price_series;
pub mod indicator;
pub mod premium;
pub mod snapshot;
pub mod trade;
pub mod ledger;
pub mod news;
pub mod correlation;
pub mod quote_chain;
pub mod analysis;
pub mod prompt;
pub mod config_validation;

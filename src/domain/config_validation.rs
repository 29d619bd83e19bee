//! Configuration validation.
//!
//! Validates every field the analysis pipeline reads before any port is touched.

use crate::domain::error::SilvertraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    validate_symbol(config)?;
    validate_unit_multiplier(config)?;
    validate_windows(config)?;
    validate_retail(config)?;
    validate_fx(config)?;
    validate_csv_dir(config)?;
    validate_correlations(config)?;
    validate_news(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> SilvertraderError {
    SilvertraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    if !config.keys("market").iter().any(|k| k == "symbol") {
        return Ok(());
    }
    match config.get_string("market", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(invalid("market", "symbol", "symbol must not be blank")),
    }
}

fn validate_unit_multiplier(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    let value = config.get_double("market", "unit_multiplier", 1.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "market",
            "unit_multiplier",
            "unit_multiplier must be positive",
        ));
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    for key in ["history_lookback", "short_window", "long_window", "rsi_period"] {
        if config.get_int("market", key, 1) < 1 {
            return Err(invalid("market", key, &format!("{key} must be at least 1")));
        }
    }
    let short = config.get_int("market", "short_window", 5);
    let long = config.get_int("market", "long_window", 20);
    if short > long {
        return Err(invalid(
            "market",
            "short_window",
            "short_window must not exceed long_window",
        ));
    }
    Ok(())
}

fn validate_retail(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    if config.get_string("retail", "fallback_price").is_none() {
        return Err(SilvertraderError::ConfigMissing {
            section: "retail".to_string(),
            key: "fallback_price".to_string(),
        });
    }
    let value = config.get_double("retail", "fallback_price", 0.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "retail",
            "fallback_price",
            "fallback_price must be positive",
        ));
    }
    let markup = config.get_double("retail", "estimate_markup_pct", 0.0);
    if !markup.is_finite() || markup <= -100.0 {
        return Err(invalid(
            "retail",
            "estimate_markup_pct",
            "estimate_markup_pct must be greater than -100",
        ));
    }
    Ok(())
}

fn validate_fx(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    let value = config.get_double("fx", "fallback_rate", 1.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid("fx", "fallback_rate", "fallback_rate must be positive"));
    }
    Ok(())
}

fn validate_csv_dir(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    match config.get_string("data", "csv_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SilvertraderError::ConfigMissing {
            section: "data".to_string(),
            key: "csv_dir".to_string(),
        }),
    }
}

fn validate_correlations(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    if config.get_int("correlations", "lookback", 2) < 2 {
        return Err(invalid(
            "correlations",
            "lookback",
            "lookback must be at least 2",
        ));
    }
    for key in config.keys("correlations") {
        if key == "lookback" {
            continue;
        }
        match config.get_string("correlations", &key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(invalid(
                    "correlations",
                    &key,
                    "correlation feed needs a symbol",
                ))
            }
        }
    }
    Ok(())
}

fn validate_news(config: &dyn ConfigPort) -> Result<(), SilvertraderError> {
    if config.get_int("news", "limit", 0) < 0 {
        return Err(invalid("news", "limit", "limit must be non-negative"));
    }
    Ok(())
}

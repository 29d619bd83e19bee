//! Domain error types.

/// Top-level error type for silvertrader.
#[derive(Debug, thiserror::Error)]
pub enum SilvertraderError {
    #[error("insufficient data for {symbol}: have {points} usable points, need {minimum}")]
    InsufficientData {
        symbol: String,
        points: usize,
        minimum: usize,
    },

    #[error("invalid price for {field}: {reason}")]
    InvalidPrice { field: String, reason: String },

    #[error("trade {id} not found")]
    TradeNotFound { id: String },

    #[error("snapshot composition failed: {0}")]
    Snapshot(Box<SilvertraderError>),

    #[error("quote source {source_name} failed: {reason}")]
    Quote { source_name: String, reason: String },

    #[error("history error: {reason}")]
    History { reason: String },

    #[error("news error: {reason}")]
    News { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SilvertraderError {
    /// Stable identifier for the error family, safe to match on across versions.
    pub fn kind(&self) -> &'static str {
        match self {
            SilvertraderError::InsufficientData { .. } => "insufficient_data",
            SilvertraderError::InvalidPrice { .. } => "invalid_price",
            SilvertraderError::TradeNotFound { .. } => "trade_not_found",
            SilvertraderError::Snapshot(_) => "snapshot_failed",
            SilvertraderError::Quote { .. } => "quote_unavailable",
            SilvertraderError::History { .. } => "history_unavailable",
            SilvertraderError::News { .. } => "news_unavailable",
            SilvertraderError::ConfigParse { .. } => "config_parse",
            SilvertraderError::ConfigMissing { .. } => "config_missing",
            SilvertraderError::ConfigInvalid { .. } => "config_invalid",
            SilvertraderError::Io(_) => "io",
        }
    }

    /// The innermost error, looking through `Snapshot` wrappers.
    pub fn root_cause(&self) -> &SilvertraderError {
        match self {
            SilvertraderError::Snapshot(inner) => inner.root_cause(),
            other => other,
        }
    }

    pub fn invalid_price(field: &str, reason: impl Into<String>) -> Self {
        SilvertraderError::InvalidPrice {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SilvertraderError> for std::process::ExitCode {
    fn from(err: &SilvertraderError) -> Self {
        let code: u8 = match err {
            SilvertraderError::Io(_) => 1,
            SilvertraderError::ConfigParse { .. }
            | SilvertraderError::ConfigMissing { .. }
            | SilvertraderError::ConfigInvalid { .. } => 2,
            SilvertraderError::History { .. }
            | SilvertraderError::Quote { .. }
            | SilvertraderError::News { .. } => 3,
            SilvertraderError::InvalidPrice { .. } | SilvertraderError::TradeNotFound { .. } => 4,
            SilvertraderError::InsufficientData { .. } | SilvertraderError::Snapshot(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}

//! Paper trades: open positions and their immutable closed records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::SilvertraderError;

const ID_PREFIX: &str = "trade_";

/// Monotonic trade identifier, rendered as `trade_N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ID_PREFIX, self.0)
    }
}

impl FromStr for TradeId {
    type Err = SilvertraderError;

    /// An id that cannot be parsed cannot name an active trade.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(ID_PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .map(TradeId)
            .ok_or_else(|| SilvertraderError::TradeNotFound { id: s.to_string() })
    }
}

impl Serialize for TradeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    #[default]
    Manual,
    Target,
    StopLoss,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::Manual => write!(f, "manual"),
            CloseReason::Target => write!(f, "target"),
            CloseReason::StopLoss => write!(f, "stop_loss"),
        }
    }
}

impl FromStr for CloseReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(CloseReason::Manual),
            "target" => Ok(CloseReason::Target),
            "stop_loss" => Ok(CloseReason::StopLoss),
            other => Err(format!("unknown close reason '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub id: TradeId,
    pub buy_price: f64,
    pub target_profit_price: f64,
    pub stop_loss_price: f64,
    pub opened_at: DateTime<Utc>,
}

impl Trade {
    pub fn unrealized_pnl(&self, mark: f64) -> f64 {
        mark - self.buy_price
    }

    pub fn unrealized_pnl_percent(&self, mark: f64) -> f64 {
        self.unrealized_pnl(mark) / self.buy_price * 100.0
    }

    pub fn target_reached(&self, mark: f64) -> bool {
        mark >= self.target_profit_price
    }

    pub fn stop_hit(&self, mark: f64) -> bool {
        mark <= self.stop_loss_price
    }

    /// The reason an automatic exit would close this trade at `mark`, if any.
    /// Target takes precedence over stop.
    pub fn exit_reason(&self, mark: f64) -> Option<CloseReason> {
        if self.target_reached(mark) {
            Some(CloseReason::Target)
        } else if self.stop_hit(mark) {
            Some(CloseReason::StopLoss)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedTrade {
    pub id: TradeId,
    pub buy_price: f64,
    pub sell_price: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub reason: CloseReason,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub target_profit_price: f64,
    pub stop_loss_price: f64,
}

impl CompletedTrade {
    pub fn from_trade(
        trade: Trade,
        sell_price: f64,
        reason: CloseReason,
        closed_at: DateTime<Utc>,
    ) -> Self {
        let pnl = sell_price - trade.buy_price;
        CompletedTrade {
            id: trade.id,
            buy_price: trade.buy_price,
            sell_price,
            pnl,
            pnl_percent: pnl / trade.buy_price * 100.0,
            reason,
            opened_at: trade.opened_at,
            closed_at,
            target_profit_price: trade.target_profit_price,
            stop_loss_price: trade.stop_loss_price,
        }
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_trade() -> Trade {
        Trade {
            id: TradeId(1),
            buy_price: 100_000.0,
            target_profit_price: 105_000.0,
            stop_loss_price: 97_000.0,
            opened_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn trade_id_round_trips_through_text() {
        assert_eq!(TradeId(12).to_string(), "trade_12");
        assert_eq!("trade_12".parse::<TradeId>().unwrap(), TradeId(12));
    }

    #[test]
    fn malformed_trade_id_is_not_found() {
        for bad in ["12", "trade_", "trade_x", "order_1"] {
            let err = bad.parse::<TradeId>().unwrap_err();
            assert_eq!(err.kind(), "trade_not_found", "{bad}");
        }
    }

    #[test]
    fn close_reason_parses_and_displays() {
        assert_eq!("stop_loss".parse::<CloseReason>(), Ok(CloseReason::StopLoss));
        assert_eq!(" Target ".parse::<CloseReason>(), Ok(CloseReason::Target));
        assert!("panic".parse::<CloseReason>().is_err());
        assert_eq!(CloseReason::default(), CloseReason::Manual);
        assert_eq!(CloseReason::StopLoss.to_string(), "stop_loss");
    }

    #[test]
    fn unrealized_pnl() {
        let trade = sample_trade();
        assert!((trade.unrealized_pnl(102_000.0) - 2_000.0).abs() < f64::EPSILON);
        assert!((trade.unrealized_pnl_percent(99_000.0) - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn exit_reason_thresholds_are_inclusive() {
        let trade = sample_trade();
        assert_eq!(trade.exit_reason(105_000.0), Some(CloseReason::Target));
        assert_eq!(trade.exit_reason(110_000.0), Some(CloseReason::Target));
        assert_eq!(trade.exit_reason(97_000.0), Some(CloseReason::StopLoss));
        assert_eq!(trade.exit_reason(90_000.0), Some(CloseReason::StopLoss));
        assert_eq!(trade.exit_reason(100_500.0), None);
    }

    #[test]
    fn completed_trade_pnl() {
        let closed_at = Utc.with_ymd_and_hms(2024, 6, 2, 9, 30, 0).unwrap();
        let done = CompletedTrade::from_trade(sample_trade(), 104_000.0, CloseReason::Target, closed_at);
        assert_eq!(done.id, TradeId(1));
        assert!((done.pnl - 4_000.0).abs() < f64::EPSILON);
        assert!((done.pnl_percent - 4.0).abs() < 1e-12);
        assert!(done.is_win());
        assert!(!done.is_loss());
        assert_eq!(done.target_profit_price, 105_000.0);
        assert_eq!(done.closed_at, closed_at);
    }

    #[test]
    fn breakeven_is_neither_win_nor_loss() {
        let done = CompletedTrade::from_trade(sample_trade(), 100_000.0, CloseReason::Manual, Utc::now());
        assert!(!done.is_win());
        assert!(!done.is_loss());
    }

    #[test]
    fn serializes_with_string_id() {
        let json = serde_json::to_value(sample_trade()).unwrap();
        assert_eq!(json["id"], "trade_1");
        let reason = serde_json::to_value(CloseReason::StopLoss).unwrap();
        assert_eq!(reason, "stop_loss");
    }
}

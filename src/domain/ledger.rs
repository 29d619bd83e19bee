//! Paper-trading ledger state machine.
//!
//! Each trade moves `Open` → `Closed(reason)` exactly once. [`Ledger`] holds
//! the active set, the append-only history and the running P&L; it is not
//! synchronized. [`SharedLedger`] wraps it behind a single `RwLock` so every
//! transition is atomic with respect to concurrent callers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use super::error::SilvertraderError;
use super::trade::{CloseReason, CompletedTrade, Trade, TradeId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseOutcome {
    pub trade: CompletedTrade,
    pub total_pnl: f64,
}

/// Trades closed by one [`Ledger::check_exits`] pass and the running P&L after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitOutcome {
    pub closed: Vec<CompletedTrade>,
    pub total_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub completed_trades: Vec<CompletedTrade>,
    pub total_pnl: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub active_trades: Vec<Trade>,
    pub active_positions: usize,
    pub total_pnl: f64,
}

/// An open trade valued at a mark price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionValue {
    pub trade: Trade,
    pub mark_price: f64,
    pub unrealized_pnl: f64,
    pub unrealized_pnl_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioValuation {
    #[serde(flatten)]
    pub summary: PortfolioSummary,
    pub mark_price: f64,
    pub positions: Vec<PositionValue>,
    pub unrealized_pnl: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    active: BTreeMap<TradeId, Trade>,
    history: Vec<CompletedTrade>,
    running_pnl: f64,
    next_id: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            active: BTreeMap::new(),
            history: Vec::new(),
            running_pnl: 0.0,
            next_id: 1,
        }
    }

    pub fn open_trade(
        &mut self,
        buy_price: f64,
        target_profit_price: f64,
        stop_loss_price: f64,
    ) -> Result<Trade, SilvertraderError> {
        self.open_trade_at(buy_price, target_profit_price, stop_loss_price, Utc::now())
    }

    pub fn open_trade_at(
        &mut self,
        buy_price: f64,
        target_profit_price: f64,
        stop_loss_price: f64,
        opened_at: DateTime<Utc>,
    ) -> Result<Trade, SilvertraderError> {
        require_positive("buy_price", buy_price)?;
        require_positive("target_profit_price", target_profit_price)?;
        require_positive("stop_loss_price", stop_loss_price)?;

        let id = TradeId(self.next_id);
        self.next_id += 1;

        let trade = Trade {
            id,
            buy_price,
            target_profit_price,
            stop_loss_price,
            opened_at,
        };
        self.active.insert(id, trade.clone());
        info!(%id, buy_price, target_profit_price, stop_loss_price, "opened trade");
        Ok(trade)
    }

    pub fn close_trade(
        &mut self,
        id: TradeId,
        sell_price: f64,
        reason: CloseReason,
    ) -> Result<CloseOutcome, SilvertraderError> {
        self.close_trade_at(id, sell_price, reason, Utc::now())
    }

    pub fn close_trade_at(
        &mut self,
        id: TradeId,
        sell_price: f64,
        reason: CloseReason,
        closed_at: DateTime<Utc>,
    ) -> Result<CloseOutcome, SilvertraderError> {
        if !self.active.contains_key(&id) {
            return Err(SilvertraderError::TradeNotFound { id: id.to_string() });
        }
        require_positive("sell_price", sell_price)?;

        let Some(trade) = self.active.remove(&id) else {
            return Err(SilvertraderError::TradeNotFound { id: id.to_string() });
        };
        let completed = CompletedTrade::from_trade(trade, sell_price, reason, closed_at);
        self.running_pnl += completed.pnl;
        self.history.push(completed.clone());

        info!(%id, sell_price, %reason, pnl = completed.pnl, total_pnl = self.running_pnl, "closed trade");
        Ok(CloseOutcome {
            trade: completed,
            total_pnl: self.running_pnl,
        })
    }

    /// Closes every active trade whose target or stop is met at `mark_price`,
    /// in id order, at that price.
    pub fn check_exits(&mut self, mark_price: f64) -> Result<ExitOutcome, SilvertraderError> {
        require_positive("mark_price", mark_price)?;

        let due: Vec<(TradeId, CloseReason)> = self
            .active
            .values()
            .filter_map(|t| t.exit_reason(mark_price).map(|r| (t.id, r)))
            .collect();

        let closed_at = Utc::now();
        let mut closed = Vec::with_capacity(due.len());
        for (id, reason) in due {
            closed.push(self.close_trade_at(id, mark_price, reason, closed_at)?.trade);
        }
        Ok(ExitOutcome {
            closed,
            total_pnl: self.running_pnl,
        })
    }

    pub fn active_trades(&self) -> Vec<Trade> {
        self.active.values().cloned().collect()
    }

    pub fn get_active(&self, id: TradeId) -> Option<&Trade> {
        self.active.get(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn completed(&self) -> &[CompletedTrade] {
        &self.history
    }

    pub fn running_pnl(&self) -> f64 {
        self.running_pnl
    }

    pub fn history(&self) -> HistorySummary {
        let winning_trades = self.history.iter().filter(|t| t.is_win()).count();
        let losing_trades = self.history.iter().filter(|t| t.is_loss()).count();
        let total_trades = self.history.len();
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };
        HistorySummary {
            completed_trades: self.history.clone(),
            total_pnl: self.running_pnl,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
        }
    }

    pub fn portfolio_summary(&self) -> PortfolioSummary {
        PortfolioSummary {
            active_trades: self.active_trades(),
            active_positions: self.active.len(),
            total_pnl: self.running_pnl,
        }
    }

    pub fn mark_to_market(&self, mark_price: f64) -> Vec<PositionValue> {
        self.active
            .values()
            .map(|t| PositionValue {
                trade: t.clone(),
                mark_price,
                unrealized_pnl: t.unrealized_pnl(mark_price),
                unrealized_pnl_percent: t.unrealized_pnl_percent(mark_price),
            })
            .collect()
    }

    pub fn valuation(&self, mark_price: f64) -> PortfolioValuation {
        let positions = self.mark_to_market(mark_price);
        let unrealized_pnl = positions.iter().map(|p| p.unrealized_pnl).sum();
        PortfolioValuation {
            summary: self.portfolio_summary(),
            mark_price,
            positions,
            unrealized_pnl,
        }
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), SilvertraderError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SilvertraderError::invalid_price(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}

/// Cloneable handle to one ledger shared across callers.
///
/// Mutations hold the write lock for the whole transition; queries hold the
/// read lock and return owned copies.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // Mutations validate before writing, so a poisoned lock still guards a
    // consistent ledger.
    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn open_trade(
        &self,
        buy_price: f64,
        target_profit_price: f64,
        stop_loss_price: f64,
    ) -> Result<Trade, SilvertraderError> {
        self.write()
            .open_trade(buy_price, target_profit_price, stop_loss_price)
    }

    pub fn close_trade(
        &self,
        id: TradeId,
        sell_price: f64,
        reason: CloseReason,
    ) -> Result<CloseOutcome, SilvertraderError> {
        self.write().close_trade(id, sell_price, reason)
    }

    pub fn check_exits(&self, mark_price: f64) -> Result<ExitOutcome, SilvertraderError> {
        self.write().check_exits(mark_price)
    }

    pub fn is_active(&self, id: TradeId) -> bool {
        self.read().get_active(id).is_some()
    }

    pub fn active_trades(&self) -> Vec<Trade> {
        self.read().active_trades()
    }

    pub fn history(&self) -> HistorySummary {
        self.read().history()
    }

    pub fn portfolio_summary(&self) -> PortfolioSummary {
        self.read().portfolio_summary()
    }

    pub fn valuation(&self, mark_price: f64) -> PortfolioValuation {
        self.read().valuation(mark_price)
    }
}

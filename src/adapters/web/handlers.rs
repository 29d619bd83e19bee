//! HTTP request handlers for web adapter.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::Uri,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::analysis::{run_analysis, AnalysisReport};
use crate::domain::error::SilvertraderError;
use crate::domain::ledger::{CloseOutcome, HistorySummary, PortfolioValuation};
use crate::domain::news::{rank_news, NewsItem};
use crate::domain::prompt::render_prompt;
use crate::domain::quote_chain::ResolvedQuote;
use crate::domain::trade::{CloseReason, CompletedTrade, Trade, TradeId};
use crate::ports::news_port::NewsPort;

use super::{AppState, WebError};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, WebError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| WebError::bad_request(rejection.body_text()))
}

/// Runs blocking port I/O off the async executor.
async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, WebError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> T + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| WebError::internal(format!("worker failed: {}", e)))
}

pub async fn silver_price(State(state): State<Arc<AppState>>) -> Result<Json<ResolvedQuote>, WebError> {
    let quote = blocking(&state, |s| s.retail_chain.resolve()).await?;
    Ok(Json(quote))
}

/// A monetary field the client must supply.
fn required(field: &str, value: Option<f64>) -> Result<f64, SilvertraderError> {
    value.ok_or_else(|| SilvertraderError::invalid_price(field, "missing"))
}

#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    #[serde(default)]
    pub buy_price: Option<f64>,
    #[serde(default, alias = "booked_profit")]
    pub target_profit_price: Option<f64>,
    #[serde(default, alias = "min_loss")]
    pub stop_loss_price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BuyResponse {
    pub success: bool,
    pub trade_id: TradeId,
    pub trade: Trade,
}

pub async fn buy(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BuyRequest>, JsonRejection>,
) -> Result<Json<BuyResponse>, WebError> {
    let req = body(payload)?;
    let trade = state.ledger.open_trade(
        required("buy_price", req.buy_price)?,
        required("target_profit_price", req.target_profit_price)?,
        required("stop_loss_price", req.stop_loss_price)?,
    )?;
    Ok(Json(BuyResponse {
        success: true,
        trade_id: trade.id,
        trade,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub trade_id: String,
    #[serde(default)]
    pub sell_price: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SellResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: CloseOutcome,
}

pub async fn sell(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SellRequest>, JsonRejection>,
) -> Result<Json<SellResponse>, WebError> {
    let req = body(payload)?;
    let id: TradeId = req.trade_id.parse()?;
    let reason = match req.reason.as_deref() {
        Some(r) => r.parse::<CloseReason>().map_err(WebError::bad_request)?,
        None => CloseReason::default(),
    };
    // an unknown id is reported before a missing price
    if req.sell_price.is_none() && !state.ledger.is_active(id) {
        return Err(SilvertraderError::TradeNotFound { id: id.to_string() }.into());
    }
    let sell_price = required("sell_price", req.sell_price)?;
    let outcome = state.ledger.close_trade(id, sell_price, reason)?;
    Ok(Json(SellResponse {
        success: true,
        outcome,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckExitsRequest {
    /// When absent the current retail quote is used.
    #[serde(default)]
    pub mark_price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CheckExitsResponse {
    pub mark_price: f64,
    pub mark_source: String,
    pub closed: Vec<CompletedTrade>,
    pub total_pnl: f64,
}

pub async fn check_exits(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckExitsRequest>, JsonRejection>,
) -> Result<Json<CheckExitsResponse>, WebError> {
    let req = body(payload)?;
    let (mark_price, mark_source) = match req.mark_price {
        Some(price) => (price, "request".to_string()),
        None => {
            let quote = blocking(&state, |s| s.retail_chain.resolve()).await?;
            (quote.value, quote.source)
        }
    };
    let outcome = state.ledger.check_exits(mark_price)?;
    if !outcome.closed.is_empty() {
        info!(mark_price, closed = outcome.closed.len(), "automatic exits triggered");
    }
    Ok(Json(CheckExitsResponse {
        mark_price,
        mark_source,
        closed: outcome.closed,
        total_pnl: outcome.total_pnl,
    }))
}

/// Open positions valued at the current retail quote.
pub async fn portfolio(State(state): State<Arc<AppState>>) -> Result<Json<PortfolioResponse>, WebError> {
    let quote = blocking(&state, |s| s.retail_chain.resolve()).await?;
    let valuation = state.ledger.valuation(quote.value);
    Ok(Json(PortfolioResponse {
        mark_source: quote.source,
        valuation,
    }))
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    #[serde(flatten)]
    pub valuation: PortfolioValuation,
    pub mark_source: String,
}

pub async fn history(State(state): State<Arc<AppState>>) -> Json<HistorySummary> {
    Json(state.ledger.history())
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub prompt: String,
}

pub async fn analysis(State(state): State<Arc<AppState>>) -> Result<Json<AnalysisResponse>, WebError> {
    let report = blocking(&state, |s| {
        run_analysis(
            s.history.as_ref(),
            &s.retail_chain,
            &s.fx_chain,
            s.news.as_deref().map(|n| n as &dyn NewsPort),
            &s.settings,
        )
    })
    .await??;
    let prompt = render_prompt(&report.snapshot, &report.news);
    Ok(Json(AnalysisResponse { report, prompt }))
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub news: Vec<NewsItem>,
}

pub async fn news(State(state): State<Arc<AppState>>) -> Result<Json<NewsResponse>, WebError> {
    let items = blocking(&state, |s| match &s.news {
        Some(port) => port
            .fetch_news()
            .map(|items| rank_news(items, s.settings.news_limit)),
        None => Ok(Vec::new()),
    })
    .await??;
    Ok(Json(NewsResponse { news: items }))
}

pub async fn not_found(uri: Uri) -> WebError {
    debug!(%uri, "no route");
    WebError::not_found(format!("no route for {}", uri.path()))
}

//! Web server adapter.
//!
//! JSON API over the shared paper-trading ledger and the analysis pipeline.
//! Port I/O runs on the blocking pool; ledger calls are in-memory.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::analysis::AnalysisSettings;
use crate::domain::error::SilvertraderError;
use crate::domain::ledger::SharedLedger;
use crate::domain::quote_chain::QuoteChain;
use crate::ports::history_port::HistoryPort;
use crate::ports::news_port::NewsPort;

pub struct AppState {
    pub ledger: SharedLedger,
    pub history: Arc<dyn HistoryPort + Send + Sync>,
    pub news: Option<Arc<dyn NewsPort + Send + Sync>>,
    pub retail_chain: QuoteChain,
    pub fx_chain: QuoteChain,
    pub settings: AnalysisSettings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/silver-price", get(handlers::silver_price))
        .route("/buy", post(handlers::buy))
        .route("/sell", post(handlers::sell))
        .route("/check-exits", post(handlers::check_exits))
        .route("/portfolio", get(handlers::portfolio))
        .route("/history", get(handlers::history))
        .route("/analysis", get(handlers::analysis))
        .route("/news", get(handlers::news))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, listen: &str) -> Result<(), SilvertraderError> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!(addr = %listen, "silvertrader API listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

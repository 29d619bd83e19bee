//! HTTP error responses for web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::error::SilvertraderError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }
}

pub fn status_from_error(err: &SilvertraderError) -> StatusCode {
    match err.root_cause() {
        SilvertraderError::TradeNotFound { .. } => StatusCode::NOT_FOUND,
        SilvertraderError::InvalidPrice { .. }
        | SilvertraderError::ConfigMissing { .. }
        | SilvertraderError::ConfigInvalid { .. }
        | SilvertraderError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
        SilvertraderError::InsufficientData { .. } | SilvertraderError::Snapshot(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SilvertraderError::Quote { .. }
        | SilvertraderError::History { .. }
        | SilvertraderError::News { .. }
        | SilvertraderError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SilvertraderError> for WebError {
    fn from(err: SilvertraderError) -> Self {
        Self::new(status_from_error(&err), err.kind(), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "kind": self.kind,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_root_cause() {
        let not_found = SilvertraderError::TradeNotFound { id: "trade_3".into() };
        assert_eq!(status_from_error(&not_found), StatusCode::NOT_FOUND);

        let wrapped = SilvertraderError::Snapshot(Box::new(SilvertraderError::invalid_price(
            "retail_price",
            "no retail price supplied",
        )));
        assert_eq!(status_from_error(&wrapped), StatusCode::BAD_REQUEST);

        let empty = SilvertraderError::Snapshot(Box::new(SilvertraderError::InsufficientData {
            symbol: "SI=F".into(),
            points: 0,
            minimum: 1,
        }));
        let web = WebError::from(empty);
        assert_eq!(web.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(web.kind, "snapshot_failed");
    }
}

//! HTTP-facing errors.
//!
//! Every handler returns [`ObserverError`]; its `IntoResponse` impl picks
//! the status code and renders `{"error": ..., "status": ...}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error returned by an Observer handler.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// Nothing to return yet (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body or parameters were rejected (400).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The server runs without a simulation attached (503).
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl ObserverError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::NotFound(msg) | Self::InvalidInput(msg) | Self::Unavailable(msg) => msg,
        };
        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

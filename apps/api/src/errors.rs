use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-caused: rejected before any provider call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider answered, but its content lacks the required fields.
    /// `raw` is the best-effort parse, returned for diagnostics.
    #[error("Upstream content error: {message}")]
    UpstreamContent { message: String, raw: Value },

    /// The provider call itself failed (transport, auth, rate limit, bad envelope).
    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),
}

/// A body the `Json` extractor cannot read is a client error like any other.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, raw) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None),
            AppError::UpstreamContent { message, raw } => {
                tracing::warn!("Upstream content rejected: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_CONTENT_ERROR",
                    message,
                    Some(raw),
                )
            }
            AppError::Provider(e) => {
                tracing::error!("Provider error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROVIDER_ERROR",
                    format!("Provider request failed: {}", e.user_message()),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(raw) = raw {
            body["raw"] = raw;
        }

        (status, Json(body)).into_response()
    }
}

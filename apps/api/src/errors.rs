use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::quotes::request::ValidationIssues;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{ "error": <message> }`; validation failures add
/// a `details` object with per-field diagnostics.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Validation(ValidationIssues),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingApiKey => {
                tracing::error!("Generate request rejected: OPENAI_API_KEY is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Missing OPENAI_API_KEY" }),
                )
            }
            AppError::InvalidJson(e) => {
                tracing::debug!("Rejected unparseable body: {e}");
                (StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON body" }))
            }
            AppError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request", "details": issues }),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to generate quotes" }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

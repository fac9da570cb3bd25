//! Axum route handlers for the quotes API.
//!
//! Bodies are taken as raw bytes so the credential check runs before any
//! parsing and so unparseable JSON maps to its own error.

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::quotes::export::{content_disposition, filename, parse_export_request, render_text};
use crate::quotes::generator::generate_quotes;
use crate::quotes::presets::{presets, Presets};
use crate::quotes::request::parse_generation_request;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub quotes: Vec<String>,
}

/// POST /api/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, AppError> {
    let llm = state.llm.as_deref().ok_or(AppError::MissingApiKey)?;
    let request = parse_generation_request(&body)?;
    let quotes = generate_quotes(llm, &request).await?;
    Ok(Json(GenerateResponse { quotes }))
}

/// GET /api/presets
pub async fn handle_presets() -> Json<Presets> {
    Json(presets())
}

/// POST /api/export
///
/// Renders a quote list as a downloadable text file.
pub async fn handle_export(body: Bytes) -> Result<impl IntoResponse, AppError> {
    let request = parse_export_request(&body)?;
    let disposition = HeaderValue::from_str(&content_disposition(&filename(request.occasion())))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid Content-Disposition: {e}")))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_text(&request.quotes),
    ))
}

//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use qrscan_core::{DetectedSymbol, ScanError, ScanRequest};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;

/// Response of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `POST /scan`: decode every QR code in a data-URL image.
pub async fn scan(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<Vec<DetectedSymbol>>, ApiError> {
    let Json(request) = payload?;
    let image = request
        .image
        .filter(|image| !image.trim().is_empty())
        .ok_or(ScanError::MissingField("image"))?;

    let symbols = state.processor.scan_data_url(&image).await?;
    Ok(Json(symbols))
}

/// `GET /health`: liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: qrscan_core::VERSION.to_string(),
    })
}

// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::inventory::recorder::{ScanError, ScanStage};
use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    BackendUnavailable(StoreError),
    NotFound(String),
    ValidationError(String),
    Conflict(String),
    Internal(String),
    Scan { error: ScanError, sound_url: String },
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn scan(error: ScanError, sound_url: impl Into<String>) -> Self {
        AppError::Scan { error, sound_url: sound_url.into() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::BackendUnavailable(err) => {
                tracing::error!(error = %err, "Backend request failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "backend_unavailable",
                    "Inventory backend is unavailable".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::Internal(msg) => {
                tracing::error!(%msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
            }
            AppError::Scan { error, sound_url } => return scan_failure(error, sound_url),
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

// Scan failures never leave an event behind; `stage` tells the client whether
// the attempt may be resubmitted as-is.
fn scan_failure(error: ScanError, sound_url: String) -> Response {
    let (status, code) = match &error {
        ScanError::InvalidCode => (StatusCode::BAD_REQUEST, "invalid_code"),
        ScanError::ProductNotFound { .. } => (StatusCode::NOT_FOUND, "product_not_found"),
        ScanError::LookupFailed(_) => (StatusCode::SERVICE_UNAVAILABLE, "backend_unavailable"),
        ScanError::RecordingFailed(_) => (StatusCode::BAD_GATEWAY, "recording_failed"),
    };
    let (stage, retry_safe) = match error.stage() {
        ScanStage::Resolution => ("resolution", true),
        ScanStage::Recording => ("recording", false),
    };

    let body = Json(json!({
        "error": error.to_string(),
        "code": code,
        "stage": stage,
        "retry_safe": retry_safe,
        "event_recorded": false,
        "sound_url": sound_url,
    }));

    (status, body).into_response()
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::BackendUnavailable(err)
    }
}

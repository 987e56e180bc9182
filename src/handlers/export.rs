// src/handlers/export.rs
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::export::{build_workbook, EXPORT_FILE_NAME, XLSX_CONTENT_TYPE};
use crate::inventory::recompute_all;
use crate::state::AppState;

// GET /export - Reconciled inventory as an xlsx download
#[instrument(skip(state))]
pub async fn export_inventory(State(state): State<AppState>) -> Result<Response, AppError> {
    let products = state.store.list_products().await?;
    let scans = state.store.list_scans().await?;
    let reconciled = recompute_all(products, &scans);

    let bytes = build_workbook(&reconciled)
        .map_err(|e| AppError::internal(format!("Failed to build workbook: {e}")))?;
    info!(rows = reconciled.len(), size = bytes.len(), "Inventory exported");

    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

// src/handlers/scan.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use crate::audio::SoundKind;
use crate::dtos::scan::{
    ClearScansResponse, DeleteScanResponse, RecentScansResponse, ScanRequest, ScanResponse,
};
use crate::error::AppError;
use crate::inventory::history::{group_by_minute, ScanHistory};
use crate::inventory::recent;
use crate::state::AppState;

// POST /scans - Record one scan of a product code
#[instrument(skip(state, payload), fields(code = %payload.code))]
pub async fn record_scan(
    State(state): State<AppState>,
    Json(payload): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ScanResponse>), AppError> {
    let Some(_permit) = state.scan_gate.try_begin() else {
        return Err(AppError::conflict("A scan is already being processed"));
    };

    match state.recorder.record_scan(&payload.code).await {
        Ok(outcome) => {
            let sound_url = state.sounds.read().await.resolve(SoundKind::Success);
            let recent_stale = outcome.recent.is_none();
            Ok((
                StatusCode::CREATED,
                Json(ScanResponse {
                    event: outcome.event,
                    product: outcome.product,
                    total_scanned: outcome.total_scanned,
                    recent: outcome.recent.unwrap_or_default(),
                    recent_stale,
                    sound_url,
                }),
            ))
        }
        Err(e) => {
            warn!(error = %e, "Scan rejected");
            let sound_url = state.sounds.read().await.resolve(SoundKind::Error);
            Err(AppError::scan(e, sound_url))
        }
    }
}

// GET /scans/recent - Latest scans, newest first
#[instrument(skip(state))]
pub async fn get_recent_scans(State(state): State<AppState>) -> Result<Json<RecentScansResponse>, AppError> {
    let scans = recent::refresh(state.store.as_ref()).await?;
    Ok(Json(RecentScansResponse { scans }))
}

// GET /scans/history - All scans grouped by minute
#[instrument(skip(state))]
pub async fn get_scan_history(State(state): State<AppState>) -> Result<Json<ScanHistory>, AppError> {
    let rows = state.store.list_scans_with_products(None).await?;
    Ok(Json(group_by_minute(rows)))
}

// DELETE /scans/{id} - Undo a single scan
#[instrument(skip(state))]
pub async fn delete_scan(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<DeleteScanResponse>, AppError> {
    if !state.store.delete_scan(id).await? {
        return Err(AppError::not_found("Scan not found"));
    }

    let catalog_stale = !state.sync_catalog().await;
    let total_scanned = if catalog_stale {
        None
    } else {
        Some(state.catalog.read().await.total_scanned())
    };
    let (recent, recent_stale) = match recent::refresh(state.store.as_ref()).await {
        Ok(rows) => (rows, false),
        Err(e) => {
            warn!(error = %e, scan_id = id, "Scan deleted but recent scans could not be refreshed");
            (Vec::new(), true)
        }
    };
    info!(scan_id = id, ?total_scanned, "Scan deleted");

    Ok(Json(DeleteScanResponse { deleted: true, total_scanned, catalog_stale, recent, recent_stale }))
}

// DELETE /scans - Clear every scan, quantities fall back to their initial values
#[instrument(skip(state))]
pub async fn clear_scans(State(state): State<AppState>) -> Result<Json<ClearScansResponse>, AppError> {
    let deleted = state.store.delete_all_scans().await?;
    let catalog_stale = !state.sync_catalog().await;
    info!(deleted, "All scans cleared");

    Ok(Json(ClearScansResponse { deleted, catalog_stale }))
}

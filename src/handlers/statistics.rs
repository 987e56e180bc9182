// src/handlers/statistics.rs
use axum::{extract::State, Json};
use tracing::instrument;

use crate::error::AppError;
use crate::inventory::stats::{self, Stats};
use crate::state::AppState;

// GET /statistics - Totals computed from the backend, not the cache
#[instrument(skip(state))]
pub async fn get_statistics(State(state): State<AppState>) -> Result<Json<Stats>, AppError> {
    let products = state.store.list_products().await?;
    let scans = state.store.list_scans().await?;

    Ok(Json(stats::compute(products, &scans)))
}

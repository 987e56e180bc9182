// src/handlers/catalog.rs
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;

use crate::dtos::product::{CatalogQuery, CatalogResponse};
use crate::error::AppError;
use crate::inventory::filter::CatalogFilter;
use crate::inventory::CatalogCache;
use crate::state::AppState;

// GET /catalog - Cached catalog with current quantities, optionally filtered
#[instrument(skip(state))]
pub async fn get_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>, AppError> {
    {
        let catalog = state.catalog.read().await;
        if catalog.is_loaded() {
            return Ok(Json(catalog_response(&catalog, &query)));
        }
    }

    let mut catalog = state.catalog.write().await;
    catalog.ensure_loaded(state.store.as_ref()).await?;
    Ok(Json(catalog_response(&catalog, &query)))
}

// POST /catalog/reload - Full reconciliation from the backend
#[instrument(skip(state))]
pub async fn reload_catalog(State(state): State<AppState>) -> Result<Json<CatalogResponse>, AppError> {
    let mut catalog = state.catalog.write().await;
    catalog.load(state.store.as_ref()).await?;
    Ok(Json(catalog_response(&catalog, &CatalogQuery::default())))
}

fn catalog_response(catalog: &CatalogCache, query: &CatalogQuery) -> CatalogResponse {
    let filter = CatalogFilter::from_lists(
        query.search.as_deref(),
        query.brands.as_deref(),
        query.categories.as_deref(),
    );
    let products: Vec<_> = filter.apply(catalog.products()).cloned().collect();

    CatalogResponse {
        total_products: catalog.products().len(),
        total_scanned: catalog.total_scanned(),
        brands: catalog.brands(),
        categories: catalog.categories(),
        loaded_at: catalog.loaded_at().map(|dt| dt.to_rfc3339()),
        products,
    }
}

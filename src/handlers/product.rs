// src/handlers/product.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use crate::dtos::product::{
    CreateProductRequest, DeleteAllResponse, ImportProductsRequest, ImportProductsResponse,
    ProductResponse, UpdateProductRequest,
};
use crate::error::AppError;
use crate::state::AppState;

// GET /products - List all products
#[instrument(skip(state))]
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.store.list_products().await?;
    let response = products.into_iter().map(ProductResponse::from).collect();
    Ok(Json(response))
}

// GET /products/{id} - Get single product
#[instrument(skip(state))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .store
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    payload.validate().map_err(AppError::validation)?;

    let product = state.store.insert_product(&payload).await?;
    state.sync_catalog().await;
    info!(id = product.id, code = %product.code, "Product created");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// POST /products/import - Bulk catalog import
#[instrument(skip(state, payload), fields(count = payload.products.len()))]
pub async fn import_products(
    State(state): State<AppState>,
    Json(payload): Json<ImportProductsRequest>,
) -> Result<(StatusCode, Json<ImportProductsResponse>), AppError> {
    if payload.products.is_empty() {
        return Err(AppError::validation("Nothing to import"));
    }
    for (index, product) in payload.products.iter().enumerate() {
        product
            .validate()
            .map_err(|msg| AppError::validation(format!("Row {}: {msg}", index + 1)))?;
    }

    let source_name = payload
        .source_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("import");
    let upload = state.store.import_products(source_name, &payload.products).await?;
    let catalog_stale = !state.sync_catalog().await;
    info!(upload_id = upload.id, imported = payload.products.len(), "Catalog imported");

    Ok((
        StatusCode::CREATED,
        Json(ImportProductsResponse { imported: payload.products.len(), upload, catalog_stale }),
    ))
}

// PUT /products/{id} - Update product
#[instrument(skip(state, payload))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    payload.validate().map_err(AppError::validation)?;

    let product = state
        .store
        .update_product(id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    state.sync_catalog().await;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/{id} - Delete product and its scans
#[instrument(skip(state))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<()>, AppError> {
    if !state.store.delete_product(id).await? {
        return Err(AppError::not_found("Product not found"));
    }
    state.sync_catalog().await;

    Ok(Json(()))
}

// DELETE /data - Delete scans, products and upload history
#[instrument(skip(state))]
pub async fn delete_all_data(State(state): State<AppState>) -> Result<Json<DeleteAllResponse>, AppError> {
    state.store.delete_all_data().await?;
    let catalog_stale = !state.sync_catalog().await;
    info!("All inventory data deleted");

    Ok(Json(DeleteAllResponse { deleted: true, catalog_stale }))
}

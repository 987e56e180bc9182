// src/dtos/product.rs
use serde::{Deserialize, Serialize};

use crate::inventory::{normalize, CatalogProduct};
use crate::models::upload::UploadRecord;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub code: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub initial_quantity: i32,
    pub cost: Option<f64>,
    pub price: Option<f64>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        if normalize(&self.code).is_empty() {
            return Err("Product code is required".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("Product name is required".to_string());
        }
        validate_amounts(self.cost, self.price)
    }
}

/// Field edits. The initial quantity is the recount baseline and cannot be changed here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub cost: Option<f64>,
    pub price: Option<f64>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.code, Some(code) if normalize(code).is_empty()) {
            return Err("Product code cannot be empty".to_string());
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err("Product name cannot be empty".to_string());
        }
        validate_amounts(self.cost, self.price)
    }
}

fn validate_amounts(cost: Option<f64>, price: Option<f64>) -> Result<(), String> {
    if cost.is_some_and(|c| c < 0.0) {
        return Err("Cost cannot be negative".to_string());
    }
    if price.is_some_and(|p| p < 0.0) {
        return Err("Price cannot be negative".to_string());
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ImportProductsRequest {
    pub source_name: Option<String>,
    pub products: Vec<CreateProductRequest>,
}

#[derive(Debug, Serialize)]
pub struct ImportProductsResponse {
    pub imported: usize,
    pub upload: UploadRecord,
    pub catalog_stale: bool,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub code: String,
    pub normalized_code: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub initial_quantity: i32,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub created_at: Option<String>,
}

// Convert from Model to Response DTO
impl From<crate::models::product::Product> for ProductResponse {
    fn from(product: crate::models::product::Product) -> Self {
        Self {
            id: product.id,
            normalized_code: normalize(&product.code),
            code: product.code,
            name: product.name,
            brand: product.brand,
            category: product.category,
            initial_quantity: product.initial_quantity,
            cost: product.cost,
            price: product.price,
            created_at: product.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// Comma separated lists are accepted for `brands` and `categories`.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub brands: Option<String>,
    pub categories: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<CatalogProduct>,
    pub total_products: usize,
    pub total_scanned: i64,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub loaded_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub deleted: bool,
    pub catalog_stale: bool,
}

//! Persistence seam. Everything the service knows about products and scans
//! comes through [`InventoryStore`]; local copies are rebuildable at any time.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::dtos::product::{CreateProductRequest, UpdateProductRequest};
use crate::models::product::Product;
use crate::models::scan::{ScanEvent, ScanWithProduct};
use crate::models::upload::UploadRecord;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

// Connection-level failures mean the backend could not be reached at all.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// All products, ordered by name.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Point lookup by a code already passed through [`normalize`](crate::inventory::normalize).
    /// Stored codes are compared in the same normalized form.
    async fn find_product_by_code(&self, normalized_code: &str) -> Result<Option<Product>, StoreError>;

    async fn insert_product(&self, product: &CreateProductRequest) -> Result<Product, StoreError>;

    /// Inserts a batch of products and records the import in the upload history.
    async fn import_products(
        &self,
        source_name: &str,
        products: &[CreateProductRequest],
    ) -> Result<UploadRecord, StoreError>;

    async fn update_product(
        &self,
        id: i64,
        changes: &UpdateProductRequest,
    ) -> Result<Option<Product>, StoreError>;

    /// Deletes the product together with its scans. Returns false when nothing matched.
    async fn delete_product(&self, id: i64) -> Result<bool, StoreError>;

    async fn list_scans(&self) -> Result<Vec<ScanEvent>, StoreError>;

    /// Scans joined with their product, newest first, optionally capped at `limit` rows.
    async fn list_scans_with_products(&self, limit: Option<i64>) -> Result<Vec<ScanWithProduct>, StoreError>;

    async fn insert_scan(&self, product_id: i64, scanned_quantity: i32) -> Result<ScanEvent, StoreError>;

    async fn delete_scan(&self, id: i64) -> Result<bool, StoreError>;

    async fn delete_all_scans(&self) -> Result<u64, StoreError>;

    /// Clears scans, products and the upload history.
    async fn delete_all_data(&self) -> Result<(), StoreError>;
}

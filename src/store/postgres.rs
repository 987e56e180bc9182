// src/store/postgres.rs
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, instrument};

use super::{InventoryStore, StoreError};
use crate::dtos::product::{CreateProductRequest, UpdateProductRequest};
use crate::inventory::normalize;
use crate::models::product::Product;
use crate::models::scan::{ScanEvent, ScanWithProduct};
use crate::models::upload::UploadRecord;

const PRODUCT_COLUMNS: &str = "id, code, name, brand, category, initial_quantity,
                cost::FLOAT8  AS cost,
                price::FLOAT8 AS price,
                created_at";

#[derive(Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id");
        match sqlx::query_as::<_, Product>(&query).fetch_all(&self.db_pool).await {
            Ok(products) => Ok(products),
            Err(e) => {
                error!(?e, "Failed to fetch products");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_product_by_code(&self, normalized_code: &str) -> Result<Option<Product>, StoreError> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE COALESCE(normalized_code, UPPER(BTRIM(code))) = $1
             ORDER BY id
             LIMIT 1"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(normalized_code)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(product)
    }

    #[instrument(skip(self, product), fields(code = %product.code))]
    async fn insert_product(&self, product: &CreateProductRequest) -> Result<Product, StoreError> {
        let query = format!(
            "INSERT INTO products (code, name, brand, category, initial_quantity, cost, price, normalized_code)
             VALUES ($1, $2, $3, $4, $5, $6::FLOAT8, $7::FLOAT8, $8)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Product>(&query)
            .bind(product.code.trim())
            .bind(product.name.trim())
            .bind(&product.brand)
            .bind(&product.category)
            .bind(product.initial_quantity)
            .bind(product.cost)
            .bind(product.price)
            .bind(normalize(&product.code))
            .fetch_one(&self.db_pool)
            .await?;
        Ok(created)
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn import_products(
        &self,
        source_name: &str,
        products: &[CreateProductRequest],
    ) -> Result<UploadRecord, StoreError> {
        let mut tx = self.db_pool.begin().await?;

        for product in products {
            sqlx::query(
                "INSERT INTO products (code, name, brand, category, initial_quantity, cost, price, normalized_code)
                 VALUES ($1, $2, $3, $4, $5, $6::FLOAT8, $7::FLOAT8, $8)",
            )
            .bind(product.code.trim())
            .bind(product.name.trim())
            .bind(&product.brand)
            .bind(&product.category)
            .bind(product.initial_quantity)
            .bind(product.cost)
            .bind(product.price)
            .bind(normalize(&product.code))
            .execute(&mut *tx)
            .await?;
        }

        let upload = sqlx::query_as::<_, UploadRecord>(
            "INSERT INTO uploads_history (source_name, product_count)
             VALUES ($1, $2)
             RETURNING id, source_name, product_count, uploaded_at",
        )
        .bind(source_name)
        .bind(products.len() as i32)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(upload)
    }

    #[instrument(skip(self, changes))]
    async fn update_product(
        &self,
        id: i64,
        changes: &UpdateProductRequest,
    ) -> Result<Option<Product>, StoreError> {
        let query = format!(
            "UPDATE products SET
             code = COALESCE($1, code),
             normalized_code = COALESCE($8, normalized_code),
             name = COALESCE($2, name),
             brand = COALESCE($3, brand),
             category = COALESCE($4, category),
             cost = COALESCE($5::FLOAT8::NUMERIC, cost),
             price = COALESCE($6::FLOAT8::NUMERIC, price)
             WHERE id = $7
             RETURNING {PRODUCT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Product>(&query)
            .bind(changes.code.as_deref().map(str::trim))
            .bind(changes.name.as_deref().map(str::trim))
            .bind(&changes.brand)
            .bind(&changes.category)
            .bind(changes.cost)
            .bind(changes.price)
            .bind(id)
            .bind(changes.code.as_deref().map(normalize))
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_scans(&self) -> Result<Vec<ScanEvent>, StoreError> {
        match sqlx::query_as::<_, ScanEvent>(
            "SELECT id, product_id, scanned_quantity, scan_time FROM inventory_scans",
        )
        .fetch_all(&self.db_pool)
        .await
        {
            Ok(scans) => Ok(scans),
            Err(e) => {
                error!(?e, "Failed to fetch scans");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_scans_with_products(&self, limit: Option<i64>) -> Result<Vec<ScanWithProduct>, StoreError> {
        // LIMIT NULL means no limit
        let rows = sqlx::query_as::<_, ScanWithProduct>(
            "SELECT s.id, s.product_id, s.scanned_quantity, s.scan_time,
                    p.code, p.name, p.brand, p.category,
                    p.price::FLOAT8 AS price
             FROM inventory_scans s
             JOIN products p ON p.id = s.product_id
             ORDER BY s.scan_time DESC, s.id DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn insert_scan(&self, product_id: i64, scanned_quantity: i32) -> Result<ScanEvent, StoreError> {
        let event = sqlx::query_as::<_, ScanEvent>(
            "INSERT INTO inventory_scans (product_id, scanned_quantity)
             VALUES ($1, $2)
             RETURNING id, product_id, scanned_quantity, scan_time",
        )
        .bind(product_id)
        .bind(scanned_quantity)
        .fetch_one(&self.db_pool)
        .await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn delete_scan(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM inventory_scans WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_all_scans(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM inventory_scans")
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_all_data(&self) -> Result<(), StoreError> {
        let mut tx = self.db_pool.begin().await?;
        sqlx::query("DELETE FROM inventory_scans").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM uploads_history").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

// src/database.rs
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Creates the backend tables when they are missing. Existing tables are left as they are.
pub async fn initialize(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL PRIMARY KEY,
            code TEXT NOT NULL,
            name TEXT NOT NULL,
            brand TEXT,
            category TEXT,
            initial_quantity INTEGER NOT NULL DEFAULT 0,
            cost NUMERIC(12, 2),
            price NUMERIC(12, 2),
            created_at TIMESTAMPTZ DEFAULT NOW()
        );

        -- Written by the service from its own normalizer. Rows from other
        -- writers fall back to the SQL approximation.
        ALTER TABLE products ADD COLUMN IF NOT EXISTS normalized_code TEXT;

        DROP INDEX IF EXISTS products_normalized_code_idx;
        CREATE INDEX IF NOT EXISTS products_code_key_idx
            ON products ((COALESCE(normalized_code, UPPER(BTRIM(code)))));

        CREATE TABLE IF NOT EXISTS inventory_scans (
            id BIGSERIAL PRIMARY KEY,
            product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            scanned_quantity INTEGER NOT NULL DEFAULT 1,
            scan_time TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );

        CREATE INDEX IF NOT EXISTS inventory_scans_scan_time_idx
            ON inventory_scans (scan_time DESC, id DESC);

        CREATE TABLE IF NOT EXISTS uploads_history (
            id BIGSERIAL PRIMARY KEY,
            source_name TEXT NOT NULL,
            product_count INTEGER NOT NULL,
            uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema ready");
    Ok(())
}

use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UploadRecord {
    pub id: i64,
    pub source_name: String,
    pub product_count: i32,
    pub uploaded_at: DateTime<Utc>,
}

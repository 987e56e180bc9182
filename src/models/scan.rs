use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

/// One recorded scan. Never updated after insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanEvent {
    pub id: i64,
    pub product_id: i64,
    pub scanned_quantity: i32,
    pub scan_time: DateTime<Utc>,
}

/// A scan joined with the product fields shown next to it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanWithProduct {
    #[serde(rename = "scan_id")]
    pub id: i64,
    pub product_id: i64,
    pub scanned_quantity: i32,
    pub scan_time: DateTime<Utc>,
    pub code: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
}

use serde::Serialize;
use sqlx::FromRow;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub initial_quantity: i32,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

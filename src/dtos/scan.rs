// src/dtos/scan.rs
use serde::{Deserialize, Serialize};

use crate::inventory::CatalogProduct;
use crate::models::scan::{ScanEvent, ScanWithProduct};

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub event: ScanEvent,
    pub product: CatalogProduct,
    pub total_scanned: i64,
    /// Empty with `recent_stale` set when the event was stored but the view could not be refreshed.
    pub recent: Vec<ScanWithProduct>,
    pub recent_stale: bool,
    pub sound_url: String,
}

#[derive(Debug, Serialize)]
pub struct RecentScansResponse {
    pub scans: Vec<ScanWithProduct>,
}

#[derive(Debug, Serialize)]
pub struct DeleteScanResponse {
    pub deleted: bool,
    /// `None` while the catalog could not be reconciled.
    pub total_scanned: Option<i64>,
    pub catalog_stale: bool,
    pub recent: Vec<ScanWithProduct>,
    pub recent_stale: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearScansResponse {
    pub deleted: u64,
    /// The scans are gone but the cached quantities reload on next use.
    pub catalog_stale: bool,
}

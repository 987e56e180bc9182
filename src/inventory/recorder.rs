use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use super::catalog::CatalogCache;
use super::normalize::normalize;
use super::recent;
use super::reconcile::CatalogProduct;
use crate::models::scan::{ScanEvent, ScanWithProduct};
use crate::store::{InventoryStore, StoreError};

/// Quantity recorded by one scan action.
pub const SCAN_QUANTITY: i32 = 1;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scanned code is empty")]
    InvalidCode,

    #[error("code \"{code}\" not found")]
    ProductNotFound { code: String },

    #[error("product lookup failed: {0}")]
    LookupFailed(#[source] StoreError),

    #[error("scan could not be recorded: {0}")]
    RecordingFailed(#[source] StoreError),
}

/// Where a scan attempt stopped. No event exists after a failure at either stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    /// Before any write: the same input can be resubmitted.
    Resolution,
    /// The event insert itself failed: terminal for this attempt.
    Recording,
}

impl ScanError {
    pub fn stage(&self) -> ScanStage {
        match self {
            ScanError::InvalidCode | ScanError::ProductNotFound { .. } | ScanError::LookupFailed(_) => {
                ScanStage::Resolution
            }
            ScanError::RecordingFailed(_) => ScanStage::Recording,
        }
    }
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub event: ScanEvent,
    /// The product after the optimistic update.
    pub product: CatalogProduct,
    pub total_scanned: i64,
    /// `None` when the event was recorded but the recent-scans refresh failed.
    pub recent: Option<Vec<ScanWithProduct>>,
}

pub struct ScanRecorder {
    store: Arc<dyn InventoryStore>,
    catalog: Arc<RwLock<CatalogCache>>,
}

impl ScanRecorder {
    pub fn new(store: Arc<dyn InventoryStore>, catalog: Arc<RwLock<CatalogCache>>) -> Self {
        Self { store, catalog }
    }

    #[instrument(skip(self))]
    pub async fn record_scan(&self, raw_code: &str) -> Result<ScanOutcome, ScanError> {
        let code = normalize(raw_code);
        if code.is_empty() {
            return Err(ScanError::InvalidCode);
        }

        // Held through the optimistic update so a concurrent reload cannot
        // count the new event twice.
        let mut catalog = self.catalog.write().await;
        catalog
            .ensure_loaded(self.store.as_ref())
            .await
            .map_err(ScanError::LookupFailed)?;

        let resolved = match catalog.find_by_normalized_code(&code) {
            Some(product) => product.clone(),
            None => {
                let found = self
                    .store
                    .find_product_by_code(&code)
                    .await
                    .map_err(ScanError::LookupFailed)?
                    .ok_or_else(|| ScanError::ProductNotFound { code: raw_code.trim().to_string() })?;
                info!(%code, product_id = found.id, "Product resolved by remote lookup");
                catalog.insert(found).clone()
            }
        };
        let product_id = resolved.id();

        let event = self
            .store
            .insert_scan(product_id, SCAN_QUANTITY)
            .await
            .map_err(ScanError::RecordingFailed)?;

        let product = match catalog.apply_scan(product_id, event.scanned_quantity) {
            Some(updated) => updated.clone(),
            None => CatalogProduct {
                current_quantity: resolved.current_quantity + i64::from(event.scanned_quantity),
                ..resolved
            },
        };
        let total_scanned = catalog.total_scanned();
        drop(catalog);

        let recent = match recent::refresh(self.store.as_ref()).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(error = %e, scan_id = event.id, "Scan recorded but recent scans could not be refreshed");
                None
            }
        };

        info!(
            %code,
            product_id,
            current_quantity = product.current_quantity,
            total_scanned,
            "Scan recorded"
        );

        Ok(ScanOutcome { event, product, total_scanned, recent })
    }
}

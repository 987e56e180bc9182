use crate::models::scan::ScanWithProduct;
use crate::store::{InventoryStore, StoreError};

/// Number of entries kept in the recent-scans view.
pub const RECENT_SCAN_LIMIT: usize = 5;

/// Re-fetches the most recent scans, newest first.
pub async fn refresh(store: &dyn InventoryStore) -> Result<Vec<ScanWithProduct>, StoreError> {
    let rows = store.list_scans_with_products(Some(RECENT_SCAN_LIMIT as i64)).await?;
    Ok(project(rows))
}

/// Orders rows newest first (id breaks ties between equal timestamps) and
/// keeps at most [`RECENT_SCAN_LIMIT`]. The backend ordering is not relied on.
pub fn project(mut rows: Vec<ScanWithProduct>) -> Vec<ScanWithProduct> {
    rows.sort_by(|a, b| b.scan_time.cmp(&a.scan_time).then(b.id.cmp(&a.id)));
    rows.truncate(RECENT_SCAN_LIMIT);
    rows
}

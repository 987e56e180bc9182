use serde::Serialize;

use crate::models::scan::ScanWithProduct;

#[derive(Debug, Serialize)]
pub struct HistoryGroup {
    /// `HH:MM` of the scans in this group (UTC).
    pub label: String,
    pub total_items: i64,
    pub scans: Vec<ScanWithProduct>,
}

#[derive(Debug, Serialize)]
pub struct ScanHistory {
    pub total_scans: usize,
    pub total_items: i64,
    pub groups: Vec<HistoryGroup>,
}

/// Buckets scans by the minute they were taken, newest minute first.
/// Scans from different days never share a bucket.
pub fn group_by_minute(mut rows: Vec<ScanWithProduct>) -> ScanHistory {
    rows.sort_by(|a, b| b.scan_time.cmp(&a.scan_time).then(b.id.cmp(&a.id)));

    let total_scans = rows.len();
    let total_items = rows.iter().map(|r| i64::from(r.scanned_quantity)).sum();

    let mut groups: Vec<(String, HistoryGroup)> = Vec::new();
    for row in rows {
        let key = row.scan_time.format("%Y-%m-%d %H:%M").to_string();
        if groups.last().is_some_and(|(last_key, _)| *last_key == key) {
            if let Some((_, group)) = groups.last_mut() {
                group.total_items += i64::from(row.scanned_quantity);
                group.scans.push(row);
            }
        } else {
            let label = row.scan_time.format("%H:%M").to_string();
            groups.push((
                key,
                HistoryGroup { label, total_items: i64::from(row.scanned_quantity), scans: vec![row] },
            ));
        }
    }

    ScanHistory {
        total_scans,
        total_items,
        groups: groups.into_iter().map(|(_, group)| group).collect(),
    }
}

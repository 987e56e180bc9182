use std::collections::HashMap;

use serde::Serialize;

use super::normalize::{normalize, normalize_label};
use crate::models::product::Product;
use crate::models::scan::ScanEvent;

/// A product as the catalog presents it: derived keys plus the reconciled quantity.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogProduct {
    #[serde(flatten)]
    pub product: Product,
    pub normalized_code: String,
    pub normalized_brand: String,
    pub normalized_category: String,
    pub current_quantity: i64,
}

impl CatalogProduct {
    pub fn new(product: Product, scanned: i64) -> Self {
        let normalized_code = normalize(&product.code);
        let normalized_brand = product.brand.as_deref().map(normalize_label).unwrap_or_default();
        let normalized_category = product.category.as_deref().map(normalize_label).unwrap_or_default();
        let current_quantity = i64::from(product.initial_quantity) + scanned;

        Self {
            product,
            normalized_code,
            normalized_brand,
            normalized_category,
            current_quantity,
        }
    }

    pub fn id(&self) -> i64 {
        self.product.id
    }

    /// Units counted on top of the initial quantity.
    pub fn scanned_quantity(&self) -> i64 {
        self.current_quantity - i64::from(self.product.initial_quantity)
    }
}

/// Sum of `scanned_quantity` per product id.
pub fn scanned_totals(scans: &[ScanEvent]) -> HashMap<i64, i64> {
    let mut totals = HashMap::new();
    for scan in scans {
        *totals.entry(scan.product_id).or_insert(0) += i64::from(scan.scanned_quantity);
    }
    totals
}

/// Full reconciliation: `current_quantity = initial_quantity + Σ scanned_quantity`
/// for every product. Scans of unknown products are ignored. Product order is kept.
pub fn recompute_all(products: Vec<Product>, scans: &[ScanEvent]) -> Vec<CatalogProduct> {
    let totals = scanned_totals(scans);
    products
        .into_iter()
        .map(|product| {
            let scanned = totals.get(&product.id).copied().unwrap_or(0);
            CatalogProduct::new(product, scanned)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub(crate) fn product(id: i64, code: &str, initial_quantity: i32) -> Product {
        Product {
            id,
            code: code.to_string(),
            name: format!("Product {id}"),
            brand: None,
            category: None,
            initial_quantity,
            cost: None,
            price: None,
            created_at: None,
        }
    }

    pub(crate) fn scan(id: i64, product_id: i64, scanned_quantity: i32) -> ScanEvent {
        ScanEvent {
            id,
            product_id,
            scanned_quantity,
            scan_time: Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap() + chrono::Duration::seconds(id),
        }
    }

    #[test]
    fn current_quantity_is_initial_plus_scans() {
        let products = vec![product(1, "A", 10), product(2, "B", 0), product(3, "C", 4)];
        let scans = vec![scan(10, 1, 1), scan(11, 1, 1), scan(12, 2, 3), scan(13, 1, -1)];

        let reconciled = recompute_all(products.clone(), &scans);

        for (original, result) in products.iter().zip(&reconciled) {
            let expected: i64 = i64::from(original.initial_quantity)
                + scans
                    .iter()
                    .filter(|s| s.product_id == original.id)
                    .map(|s| i64::from(s.scanned_quantity))
                    .sum::<i64>();
            assert_eq!(result.current_quantity, expected);
        }
        assert_eq!(reconciled[0].current_quantity, 11);
        assert_eq!(reconciled[1].current_quantity, 3);
        assert_eq!(reconciled[2].current_quantity, 4);
    }

    #[test]
    fn deleting_a_scan_matches_never_having_it() {
        let products = vec![product(1, "A", 5)];
        let with_extra = vec![scan(10, 1, 1), scan(11, 1, 1), scan(12, 1, 1)];
        let without: Vec<ScanEvent> = with_extra.iter().filter(|s| s.id != 11).cloned().collect();
        let never = vec![scan(10, 1, 1), scan(12, 1, 1)];

        let after_delete = recompute_all(products.clone(), &without);
        let baseline = recompute_all(products, &never);
        assert_eq!(after_delete[0].current_quantity, baseline[0].current_quantity);
        assert_eq!(after_delete[0].current_quantity, 7);
    }

    #[test]
    fn orphan_scans_are_ignored() {
        let reconciled = recompute_all(vec![product(1, "A", 2)], &[scan(10, 99, 5)]);
        assert_eq!(reconciled[0].current_quantity, 2);
        assert_eq!(reconciled[0].scanned_quantity(), 0);
    }

    #[test]
    fn derived_keys_are_normalized() {
        let mut p = product(1, " ab-1 ", 0);
        p.brand = Some(" Acme ".to_string());
        p.category = Some("DAIRY".to_string());
        let item = CatalogProduct::new(p, 0);
        assert_eq!(item.normalized_code, "AB-1");
        assert_eq!(item.normalized_brand, "acme");
        assert_eq!(item.normalized_category, "dairy");
    }
}

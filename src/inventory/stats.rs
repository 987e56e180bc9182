use std::collections::HashMap;

use serde::Serialize;

use super::reconcile::recompute_all;
use crate::models::product::Product;
use crate::models::scan::ScanEvent;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total_products: usize,
    pub total_scanned_items: i64,
    pub total_cost_value: f64,
    pub total_price_value: f64,
    pub brands_count: usize,
    pub categories_count: usize,
    pub by_brand: Vec<GroupTotal>,
    pub by_category: Vec<GroupTotal>,
}

/// Reconciles `products` against `scans` and aggregates the result.
///
/// Brand and category groups use the same normalized keys as the catalog
/// filters; products without a brand (or category) are left out of that grouping.
pub fn compute(products: Vec<Product>, scans: &[ScanEvent]) -> Stats {
    let reconciled = recompute_all(products, scans);

    let mut total_scanned_items = 0i64;
    let mut total_cost_value = 0f64;
    let mut total_price_value = 0f64;
    let mut by_brand: HashMap<&str, i64> = HashMap::new();
    let mut by_category: HashMap<&str, i64> = HashMap::new();

    for item in &reconciled {
        total_scanned_items += item.scanned_quantity();
        let quantity = item.current_quantity as f64;
        total_cost_value += quantity * item.product.cost.unwrap_or(0.0);
        total_price_value += quantity * item.product.price.unwrap_or(0.0);

        if !item.normalized_brand.is_empty() {
            *by_brand.entry(item.normalized_brand.as_str()).or_insert(0) += item.current_quantity;
        }
        if !item.normalized_category.is_empty() {
            *by_category.entry(item.normalized_category.as_str()).or_insert(0) += item.current_quantity;
        }
    }

    Stats {
        total_products: reconciled.len(),
        total_scanned_items,
        total_cost_value: round_cents(total_cost_value),
        total_price_value: round_cents(total_price_value),
        brands_count: by_brand.len(),
        categories_count: by_category.len(),
        by_brand: sorted_groups(by_brand),
        by_category: sorted_groups(by_category),
    }
}

fn sorted_groups(groups: HashMap<&str, i64>) -> Vec<GroupTotal> {
    let mut totals: Vec<GroupTotal> = groups
        .into_iter()
        .map(|(key, quantity)| GroupTotal { key: key.to_string(), quantity })
        .collect();
    totals.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.key.cmp(&b.key)));
    totals
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

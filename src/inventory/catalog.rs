use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tracing::info;

use super::reconcile::{recompute_all, CatalogProduct};
use crate::models::product::Product;
use crate::models::scan::ScanEvent;
use crate::store::{InventoryStore, StoreError};

/// Process-local read-through copy of the catalog.
///
/// Quantities are reconciled from the full scan log on every [`load`](Self::load).
/// Between loads, [`apply_scan`](Self::apply_scan) patches them optimistically;
/// those patches do not see writes made by other sessions, so the cache is
/// stale until the next load.
#[derive(Debug, Default)]
pub struct CatalogCache {
    products: Vec<CatalogProduct>,
    by_code: HashMap<String, usize>,
    brands: BTreeSet<String>,
    categories: BTreeSet<String>,
    total_scanned: i64,
    loaded_at: Option<DateTime<Utc>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with a fresh reconciliation of the backend state.
    /// On failure the previous contents stay in place.
    pub async fn load(&mut self, store: &dyn InventoryStore) -> Result<&[CatalogProduct], StoreError> {
        let products = store.list_products().await?;
        let scans = store.list_scans().await?;
        self.replace(products, &scans);
        info!(
            products = self.products.len(),
            total_scanned = self.total_scanned,
            "Catalog loaded"
        );
        Ok(&self.products)
    }

    pub async fn ensure_loaded(&mut self, store: &dyn InventoryStore) -> Result<(), StoreError> {
        if !self.is_loaded() {
            self.load(store).await?;
        }
        Ok(())
    }

    pub fn replace(&mut self, products: Vec<Product>, scans: &[ScanEvent]) {
        let known: BTreeSet<i64> = products.iter().map(|p| p.id).collect();
        self.total_scanned = scans
            .iter()
            .filter(|s| known.contains(&s.product_id))
            .map(|s| i64::from(s.scanned_quantity))
            .sum();

        self.products = recompute_all(products, scans);
        self.by_code.clear();
        self.brands.clear();
        self.categories.clear();
        for index in 0..self.products.len() {
            self.index_at(index);
        }
        self.loaded_at = Some(Utc::now());
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    /// Marks the contents as outdated so the next [`ensure_loaded`](Self::ensure_loaded)
    /// reconciles again. The old contents stay readable until then.
    pub fn invalidate(&mut self) {
        self.loaded_at = None;
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn find_by_normalized_code(&self, code: &str) -> Option<&CatalogProduct> {
        self.by_code.get(code).map(|&index| &self.products[index])
    }

    #[cfg(test)]
    pub fn get(&self, product_id: i64) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id() == product_id)
    }

    /// Adds a product found by a remote lookup. Its quantity starts at the
    /// initial quantity; the next load reconciles it.
    pub fn insert(&mut self, product: Product) -> &CatalogProduct {
        if let Some(index) = self.products.iter().position(|p| p.id() == product.id) {
            return &self.products[index];
        }
        self.products.push(CatalogProduct::new(product, 0));
        let index = self.products.len() - 1;
        self.index_at(index);
        &self.products[index]
    }

    /// Optimistic point update after a recorded scan.
    pub fn apply_scan(&mut self, product_id: i64, scanned_quantity: i32) -> Option<&CatalogProduct> {
        self.total_scanned += i64::from(scanned_quantity);
        let product = self.products.iter_mut().find(|p| p.product.id == product_id)?;
        product.current_quantity += i64::from(scanned_quantity);
        Some(&*product)
    }

    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    pub fn brands(&self) -> Vec<String> {
        self.brands.iter().cloned().collect()
    }

    pub fn categories(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }

    pub fn total_scanned(&self) -> i64 {
        self.total_scanned
    }

    // First product wins when two share a normalized code.
    fn index_at(&mut self, index: usize) {
        let product = &self.products[index];
        self.by_code.entry(product.normalized_code.clone()).or_insert(index);
        if !product.normalized_brand.is_empty() {
            self.brands.insert(product.normalized_brand.clone());
        }
        if !product.normalized_category.is_empty() {
            self.categories.insert(product.normalized_category.clone());
        }
    }
}

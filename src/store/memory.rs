//! In-process [`InventoryStore`] used by the unit and router tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{InventoryStore, StoreError};
use crate::dtos::product::{CreateProductRequest, UpdateProductRequest};
use crate::inventory::normalize;
use crate::models::product::Product;
use crate::models::scan::{ScanEvent, ScanWithProduct};
use crate::models::upload::UploadRecord;

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    scans: Vec<ScanEvent>,
    uploads: Vec<UploadRecord>,
    next_id: i64,
    ticks: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    // Scan times advance one second per insert so ordering is deterministic.
    fn next_time(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        base_time() + Duration::seconds(self.ticks)
    }

    fn product_from(&mut self, request: &CreateProductRequest) -> Product {
        Product {
            id: self.next_id(),
            code: request.code.trim().to_string(),
            name: request.name.trim().to_string(),
            brand: request.brand.clone(),
            category: request.category.clone(),
            initial_quantity: request.initial_quantity,
            cost: request.cost,
            price: request.price,
            created_at: Some(base_time()),
        }
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap()
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_scan_inserts: AtomicBool,
    fail_recent_reads: AtomicBool,
    code_lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_product(&self, code: &str, name: &str, initial_quantity: i32) -> Product {
        self.seed(CreateProductRequest {
            code: code.to_string(),
            name: name.to_string(),
            brand: None,
            category: None,
            initial_quantity,
            cost: None,
            price: None,
        })
    }

    pub fn seed(&self, request: CreateProductRequest) -> Product {
        let mut tables = self.tables.lock().unwrap();
        let product = tables.product_from(&request);
        tables.products.push(product.clone());
        product
    }

    pub fn seed_scan(&self, product_id: i64, scanned_quantity: i32) -> ScanEvent {
        let mut tables = self.tables.lock().unwrap();
        let scan_time = tables.next_time();
        self.push_scan(&mut tables, product_id, scanned_quantity, scan_time)
    }

    pub fn seed_scan_at(&self, product_id: i64, scanned_quantity: i32, scan_time: DateTime<Utc>) -> ScanEvent {
        let mut tables = self.tables.lock().unwrap();
        self.push_scan(&mut tables, product_id, scanned_quantity, scan_time)
    }

    fn push_scan(
        &self,
        tables: &mut Tables,
        product_id: i64,
        scanned_quantity: i32,
        scan_time: DateTime<Utc>,
    ) -> ScanEvent {
        let event = ScanEvent { id: tables.next_id(), product_id, scanned_quantity, scan_time };
        tables.scans.push(event.clone());
        event
    }

    pub fn scan_count(&self) -> usize {
        self.tables.lock().unwrap().scans.len()
    }

    pub fn upload_count(&self) -> usize {
        self.tables.lock().unwrap().uploads.len()
    }

    pub fn code_lookups(&self) -> usize {
        self.code_lookups.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_scan_inserts(&self, fail: bool) {
        self.fail_scan_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_recent_reads(&self, fail: bool) {
        self.fail_recent_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.check_reads()?;
        let mut products = self.tables.lock().unwrap().products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        self.check_reads()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_product_by_code(&self, normalized_code: &str) -> Result<Option<Product>, StoreError> {
        self.code_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.products.iter().find(|p| normalize(&p.code) == normalized_code).cloned())
    }

    async fn insert_product(&self, product: &CreateProductRequest) -> Result<Product, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let created = tables.product_from(product);
        tables.products.push(created.clone());
        Ok(created)
    }

    async fn import_products(
        &self,
        source_name: &str,
        products: &[CreateProductRequest],
    ) -> Result<UploadRecord, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        for request in products {
            let created = tables.product_from(request);
            tables.products.push(created);
        }
        let upload = UploadRecord {
            id: tables.next_id(),
            source_name: source_name.to_string(),
            product_count: products.len() as i32,
            uploaded_at: base_time(),
        };
        tables.uploads.push(upload.clone());
        Ok(upload)
    }

    async fn update_product(
        &self,
        id: i64,
        changes: &UpdateProductRequest,
    ) -> Result<Option<Product>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(product) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(code) = &changes.code {
            product.code = code.trim().to_string();
        }
        if let Some(name) = &changes.name {
            product.name = name.trim().to_string();
        }
        if changes.brand.is_some() {
            product.brand = changes.brand.clone();
        }
        if changes.category.is_some() {
            product.category = changes.category.clone();
        }
        if changes.cost.is_some() {
            product.cost = changes.cost;
        }
        if changes.price.is_some() {
            product.price = changes.price;
        }
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        tables.scans.retain(|s| s.product_id != id);
        Ok(tables.products.len() != before)
    }

    async fn list_scans(&self) -> Result<Vec<ScanEvent>, StoreError> {
        self.check_reads()?;
        Ok(self.tables.lock().unwrap().scans.clone())
    }

    async fn list_scans_with_products(&self, limit: Option<i64>) -> Result<Vec<ScanWithProduct>, StoreError> {
        self.check_reads()?;
        if self.fail_recent_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("recent scans disabled".to_string()));
        }
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<ScanWithProduct> = tables
            .scans
            .iter()
            .filter_map(|scan| {
                let product = tables.products.iter().find(|p| p.id == scan.product_id)?;
                Some(ScanWithProduct {
                    id: scan.id,
                    product_id: scan.product_id,
                    scanned_quantity: scan.scanned_quantity,
                    scan_time: scan.scan_time,
                    code: product.code.clone(),
                    name: product.name.clone(),
                    brand: product.brand.clone(),
                    category: product.category.clone(),
                    price: product.price,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.scan_time.cmp(&a.scan_time).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows)
    }

    async fn insert_scan(&self, product_id: i64, scanned_quantity: i32) -> Result<ScanEvent, StoreError> {
        if self.fail_scan_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("scan inserts disabled".to_string()));
        }
        let mut tables = self.tables.lock().unwrap();
        let scan_time = tables.next_time();
        Ok(self.push_scan(&mut tables, product_id, scanned_quantity, scan_time))
    }

    async fn delete_scan(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.scans.len();
        tables.scans.retain(|s| s.id != id);
        Ok(tables.scans.len() != before)
    }

    async fn delete_all_scans(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let deleted = tables.scans.len() as u64;
        tables.scans.clear();
        Ok(deleted)
    }

    async fn delete_all_data(&self) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.scans.clear();
        tables.products.clear();
        tables.uploads.clear();
        Ok(())
    }
}

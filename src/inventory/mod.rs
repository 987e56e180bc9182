//! Scan ingestion and quantity reconciliation.

pub mod catalog;
pub mod filter;
pub mod history;
pub mod normalize;
pub mod recent;
pub mod reconcile;
pub mod recorder;
pub mod stats;

pub use catalog::CatalogCache;
pub use normalize::normalize;
pub use reconcile::{recompute_all, CatalogProduct};
pub use recorder::ScanRecorder;

// src/state.rs
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::audio::SoundSettings;
use crate::config::Config;
use crate::inventory::{CatalogCache, ScanRecorder};
use crate::scanner::ScanGate;
use crate::storage::ObjectStorage;
use crate::store::{InventoryStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub catalog: Arc<RwLock<CatalogCache>>,
    pub recorder: Arc<ScanRecorder>,
    pub scan_gate: Arc<ScanGate>,
    pub sounds: Arc<RwLock<SoundSettings>>,
    pub storage: Arc<dyn ObjectStorage>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn InventoryStore>,
        storage: Arc<dyn ObjectStorage>,
        sounds: SoundSettings,
        config: Config,
    ) -> Self {
        let catalog = Arc::new(RwLock::new(CatalogCache::new()));
        let recorder = Arc::new(ScanRecorder::new(store.clone(), catalog.clone()));

        Self {
            store,
            catalog,
            recorder,
            scan_gate: Arc::new(ScanGate::new()),
            sounds: Arc::new(RwLock::new(sounds)),
            storage,
            config: Arc::new(config),
        }
    }

    /// Full reconciliation of the catalog cache against the backend.
    pub async fn reload_catalog(&self) -> Result<(), StoreError> {
        let mut catalog = self.catalog.write().await;
        catalog.load(self.store.as_ref()).await?;
        Ok(())
    }

    /// Reconciles the cache after a committed write. Returns false when the
    /// reload failed; the cache is then invalidated so the next reader reloads
    /// instead of serving quantities from before the write.
    pub async fn sync_catalog(&self) -> bool {
        let mut catalog = self.catalog.write().await;
        match catalog.load(self.store.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Write committed but catalog reload failed");
                catalog.invalidate();
                false
            }
        }
    }
}

// src/main.rs
mod audio;
mod config;
mod database;
mod dtos;
mod error;
mod export;
mod handlers;
mod inventory;
mod models;
mod routes;
mod scanner;
mod state;
mod storage;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::audio::SoundSettings;
use crate::config::Config;
use crate::routes::{BASE_PATH, SOUND_MEDIA_PATH};
use crate::storage::LocalObjectStorage;
use crate::store::PgStore;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return;
        }
    };

    // Create database pool
    let db_pool = match database::create_pool(&config.database_url, config.database_max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database pool");
            return;
        }
    };
    if let Err(e) = database::initialize(&db_pool).await {
        tracing::error!(error = %e, "Failed to initialize database schema");
        return;
    }

    let sounds = match SoundSettings::load(&config.sound_settings_path).await {
        Ok(sounds) => sounds,
        Err(e) => {
            tracing::warn!(error = %e, path = %config.sound_settings_path.display(), "Using default sounds");
            SoundSettings::default()
        }
    };
    let storage = LocalObjectStorage::new(
        &config.sound_storage_dir,
        format!("{}{BASE_PATH}{SOUND_MEDIA_PATH}", config.public_base_url),
    );

    // Create application state
    let host = config.host;
    let base_port = config.port;
    let scanner_stdin = config.scanner_stdin;
    let app_state = state::AppState::new(
        Arc::new(PgStore::new(db_pool)),
        Arc::new(storage),
        sounds,
        config,
    );

    match app_state.reload_catalog().await {
        Ok(()) => {
            let catalog = app_state.catalog.read().await;
            tracing::info!(products = catalog.products().len(), total_scanned = catalog.total_scanned(), "Catalog loaded");
        }
        Err(e) => tracing::warn!(error = %e, "Catalog not loaded, retrying on first request"),
    }

    if scanner_stdin {
        tokio::spawn(scanner::run_stdin_scanner(app_state.clone()));
    }

    let app = routes::build_app(app_state);

    // Try base_port..base_port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = base_port.saturating_add(offset);
            let addr = SocketAddr::from((host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => { bound = Some((l, addr)); break; }
                Err(e) => {
                    if offset == 0 { tracing::warn!(%addr, error=%e, "Port in use, trying next"); }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on http://{}{}", addr, BASE_PATH);
                l
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", base_port, host);
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}

pub mod catalog;
pub mod products;
pub mod reports;
pub mod scans;
pub mod sounds;


use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Every route is served under this prefix.
pub const BASE_PATH: &str = "/recount";

/// Public path of uploaded sound files, relative to `BASE_PATH`.
pub const SOUND_MEDIA_PATH: &str = "/media/sounds";

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(catalog::routes())
        .merge(products::routes())
        .merge(scans::routes())
        .merge(reports::routes())
        .merge(sounds::routes())
}

pub fn build_app(state: AppState) -> Router {
    let api = create_router()
        .route("/", get(|| async { "Recount API" }))
        .route("/health", get(health_check))
        .nest_service(SOUND_MEDIA_PATH, ServeDir::new(&state.config.sound_storage_dir));

    Router::new()
        .nest(BASE_PATH, api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

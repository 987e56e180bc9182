use axum::{
    routing::{get, post},
    Router,
};
use crate::handlers::catalog::{get_catalog, reload_catalog};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/catalog/reload", post(reload_catalog))
}

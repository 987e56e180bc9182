use axum::{
    routing::{delete, get, post},
    Router,
};
use crate::handlers::scan::{
    clear_scans, delete_scan, get_recent_scans, get_scan_history, record_scan,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/scans", post(record_scan).delete(clear_scans))
        .route("/scans/recent", get(get_recent_scans))
        .route("/scans/history", get(get_scan_history))
        .route("/scans/{id}", delete(delete_scan))
}

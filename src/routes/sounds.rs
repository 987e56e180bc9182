use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use crate::audio::MAX_SOUND_BYTES;
use crate::handlers::sound::{delete_sound, get_sounds, set_sound, upload_sound};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sounds", get(get_sounds))
        .route("/sounds/{kind}", put(set_sound).delete(delete_sound))
        .route(
            "/sounds/{kind}/upload",
            // Leaves room above the handler's own size check.
            post(upload_sound).layer(DefaultBodyLimit::max(MAX_SOUND_BYTES + 1024)),
        )
}

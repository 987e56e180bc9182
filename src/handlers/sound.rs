// src/handlers/sound.rs
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::audio::{extension_for, SoundKind, SoundSettings, ALLOWED_SOUND_TYPES, MAX_SOUND_BYTES};
use crate::dtos::sound::{SetSoundRequest, SoundSettingsResponse, UploadSoundResponse};
use crate::error::AppError;
use crate::state::AppState;

// GET /sounds - Resolved success and error sound URLs
#[instrument(skip(state))]
pub async fn get_sounds(State(state): State<AppState>) -> Json<SoundSettingsResponse> {
    let settings = state.sounds.read().await;
    Json(SoundSettingsResponse::from(&*settings))
}

// PUT /sounds/{kind} - Point a sound at an existing URL
#[instrument(skip(state, payload))]
pub async fn set_sound(
    Path(kind): Path<SoundKind>,
    State(state): State<AppState>,
    Json(payload): Json<SetSoundRequest>,
) -> Result<Json<SoundSettingsResponse>, AppError> {
    let url = payload.url.trim();
    if url.is_empty() {
        return Err(AppError::validation("Sound URL is required"));
    }

    let (previous, response) = update_settings(&state, kind, Some(url.to_string())).await?;
    if let Some(previous) = previous.filter(|previous| previous != url) {
        remove_stored(&state, &previous).await;
    }
    info!(%kind, %url, "Sound override set");

    Ok(Json(response))
}

// POST /sounds/{kind}/upload - Store a custom sound file and use it
#[instrument(skip(state, headers, body), fields(size = body.len()))]
pub async fn upload_sound(
    Path(kind): Path<SoundKind>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadSoundResponse>), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_SOUND_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported audio type \"{content_type}\", expected one of: {}",
            ALLOWED_SOUND_TYPES.join(", ")
        )));
    }
    if body.is_empty() {
        return Err(AppError::validation("Sound file is empty"));
    }
    if body.len() > MAX_SOUND_BYTES {
        return Err(AppError::validation("Sound file exceeds 5 MB"));
    }
    let extension = extension_for(&content_type)
        .ok_or_else(|| AppError::validation("Unsupported audio type"))?;

    let path = format!("{kind}-custom-{}.{extension}", Utc::now().timestamp_millis());
    let url = state
        .storage
        .upload(&path, &body, &content_type)
        .await
        .map_err(|e| AppError::internal(format!("Failed to store sound: {e}")))?;

    let previous = match update_settings(&state, kind, Some(url.clone())).await {
        Ok((previous, _)) => previous,
        Err(e) => {
            remove_stored(&state, &url).await;
            return Err(e);
        }
    };
    if let Some(previous) = previous {
        remove_stored(&state, &previous).await;
    }

    Ok((StatusCode::CREATED, Json(UploadSoundResponse { url, path })))
}

// DELETE /sounds/{kind} - Back to the built-in sound
#[instrument(skip(state))]
pub async fn delete_sound(
    Path(kind): Path<SoundKind>,
    State(state): State<AppState>,
) -> Result<Json<SoundSettingsResponse>, AppError> {
    let (previous, response) = update_settings(&state, kind, None).await?;
    if let Some(previous) = previous {
        remove_stored(&state, &previous).await;
    }
    info!(%kind, "Sound reset to default");

    Ok(Json(response))
}

/// Saves the changed settings and only then makes them live. Returns the
/// override that was replaced.
async fn update_settings(
    state: &AppState,
    kind: SoundKind,
    url: Option<String>,
) -> Result<(Option<String>, SoundSettingsResponse), AppError> {
    let mut settings = state.sounds.write().await;
    let previous = settings.custom(kind).map(str::to_string);

    let mut updated: SoundSettings = settings.clone();
    updated.set(kind, url);
    updated
        .save(&state.config.sound_settings_path)
        .await
        .map_err(|e| AppError::internal(format!("Failed to save sound settings: {e}")))?;

    *settings = updated;
    Ok((previous, SoundSettingsResponse::from(&*settings)))
}

// Only files we issued are removed. A failed removal leaves an orphan file.
async fn remove_stored(state: &AppState, url: &str) {
    let Some(path) = state.storage.object_path(url) else {
        return;
    };
    if let Err(e) = state.storage.delete(&path).await {
        warn!(%path, error = %e, "Failed to remove sound file");
    }
}

// src/dtos/sound.rs
use serde::{Deserialize, Serialize};

use crate::audio::{SoundKind, SoundSettings};

#[derive(Debug, Serialize)]
pub struct SoundSettingsResponse {
    pub success: SoundEntry,
    pub error: SoundEntry,
}

#[derive(Debug, Serialize)]
pub struct SoundEntry {
    /// URL the client should play.
    pub url: String,
    pub custom: bool,
}

impl From<&SoundSettings> for SoundSettingsResponse {
    fn from(settings: &SoundSettings) -> Self {
        let entry = |kind: SoundKind| SoundEntry {
            url: settings.resolve(kind),
            custom: settings.custom(kind).is_some(),
        };
        Self {
            success: entry(SoundKind::Success),
            error: entry(SoundKind::Error),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetSoundRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadSoundResponse {
    pub url: String,
    pub path: String,
}

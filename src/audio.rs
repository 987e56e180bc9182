// src/audio.rs
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SUCCESS_SOUND: &str = "/sounds/success.mp3";
pub const DEFAULT_ERROR_SOUND: &str = "/sounds/error.mp3";

/// Largest accepted custom sound upload.
pub const MAX_SOUND_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_SOUND_TYPES: &[&str] = &["audio/mpeg", "audio/mp3", "audio/wav", "audio/ogg", "audio/webm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    #[serde(alias = "Success")]
    Success,
    #[serde(alias = "Error")]
    Error,
}

impl SoundKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundKind::Success => "success",
            SoundKind::Error => "error",
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            SoundKind::Success => DEFAULT_SUCCESS_SOUND,
            SoundKind::Error => DEFAULT_ERROR_SOUND,
        }
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("sound settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("sound settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-kind sound URL overrides. Loaded from and saved to a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SoundSettings {
    /// A missing file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self, SettingsError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn custom(&self, kind: SoundKind) -> Option<&str> {
        match kind {
            SoundKind::Success => self.success.as_deref(),
            SoundKind::Error => self.error.as_deref(),
        }
    }

    /// URL to play for `kind`: the override when set, otherwise the built-in asset.
    pub fn resolve(&self, kind: SoundKind) -> String {
        self.custom(kind)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(kind.default_url())
            .to_string()
    }

    pub fn set(&mut self, kind: SoundKind, url: Option<String>) {
        let slot = match kind {
            SoundKind::Success => &mut self.success,
            SoundKind::Error => &mut self.error,
        };
        *slot = url;
    }
}

/// File extension used for an uploaded sound of the given content type.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/wav" => Some("wav"),
        "audio/ogg" => Some("ogg"),
        "audio/webm" => Some("webm"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_override() {
        let mut settings = SoundSettings::default();
        assert_eq!(settings.resolve(SoundKind::Success), DEFAULT_SUCCESS_SOUND);
        assert_eq!(settings.resolve(SoundKind::Error), DEFAULT_ERROR_SOUND);

        settings.set(SoundKind::Error, Some("https://cdn.example.com/buzz.ogg".to_string()));
        assert_eq!(settings.resolve(SoundKind::Error), "https://cdn.example.com/buzz.ogg");
        assert_eq!(settings.resolve(SoundKind::Success), DEFAULT_SUCCESS_SOUND);

        settings.set(SoundKind::Error, Some("  ".to_string()));
        assert_eq!(settings.resolve(SoundKind::Error), DEFAULT_ERROR_SOUND);
    }

    #[tokio::test]
    async fn save_then_load_restores_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sounds.json");

        assert_eq!(SoundSettings::load(&path).await.unwrap(), SoundSettings::default());

        let mut settings = SoundSettings::default();
        settings.set(SoundKind::Success, Some("/media/sounds/ding.mp3".to_string()));
        settings.save(&path).await.unwrap();

        let loaded = SoundSettings::load(&path).await.unwrap();
        assert_eq!(loaded.resolve(SoundKind::Success), "/media/sounds/ding.mp3");
        assert_eq!(loaded.custom(SoundKind::Error), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sounds.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        assert!(matches!(SoundSettings::load(&path).await, Err(SettingsError::Json(_))));
    }

    #[test]
    fn kind_parses_both_spellings() {
        let kind: SoundKind = serde_json::from_str("\"Success\"").unwrap();
        assert_eq!(kind, SoundKind::Success);
        let kind: SoundKind = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(kind, SoundKind::Error);
    }
}

//! Game settings and preferences
//!
//! Gameplay itself is fixed; these only cover audio and where things are kept.
//! Persisted in LocalStorage on the web and `settings.json` natively.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Pause music when the tab/window loses visibility
    pub mute_on_blur: bool,

    // === Storage ===
    /// Score log file (native only)
    pub score_log_path: String,

    // === Reproducibility ===
    /// Fixed RNG seed; a fresh one per launch when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.5,
            mute_on_blur: true,
            score_log_path: "scores.csv".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    /// Volume clamped to the valid range
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_volume.is_finite() {
            self.music_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Parse settings JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "capybara_evasion_settings";
    /// Settings file name (native only)
    #[cfg(not(target_arch = "wasm32"))]
    const FILE_NAME: &'static str = "settings.json";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from `settings.json` in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(Self::FILE_NAME))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("Using default settings ({} not found)", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"music_volume": 0.2}"#);
        assert_eq!(settings.music_volume, 0.2);
        assert_eq!(settings.score_log_path, "scores.csv");
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_garbage_json_is_default() {
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }

    #[test]
    fn test_volume_clamped() {
        let mut settings = Settings::default();
        settings.music_volume = 3.0;
        assert_eq!(settings.effective_music_volume(), 1.0);
        settings.music_volume = f32::NAN;
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"seed": 42, "score_log_path": "runs.csv"}"#)?;

        let settings = Settings::load_from(&path);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.score_log_path, "runs.csv");
        assert_eq!(settings.music_volume, Settings::default().music_volume);

        // Missing file is not an error
        assert_eq!(
            Settings::load_from(&dir.path().join("absent.json")),
            Settings::default()
        );
        Ok(())
    }
}

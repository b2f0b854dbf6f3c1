//! Application settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::Lang;

/// Default generative model for shape suggestions
pub const DEFAULT_AI_MODEL: &str = "gemini-3-flash-preview";

/// Default REST endpoint of the generative language API
pub const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Grid display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub visible: bool,
    /// Grid cell size in scene units
    pub size: f32,
    /// Number of grid lines in each direction from origin
    pub range: i32,
    /// Grid line opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 1.0,
            range: 10,
            opacity: 0.6,
        }
    }
}

/// Axis display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSettings {
    pub visible: bool,
    /// Axis arrow length
    pub length: f32,
    /// Show axis labels (X, Y, Z)
    pub show_labels: bool,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            visible: true,
            length: 1.5,
            show_labels: true,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Length of the transform gizmo handles in scene units
    pub gizmo_size: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [24, 24, 32],
            gizmo_size: 1.2,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    #[serde(default)]
    pub language: Lang,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Lang::default(),
        }
    }
}

/// Generative model settings. The API key is read from the environment,
/// never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    pub model: String,
    pub endpoint: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_AI_MODEL.to_string(),
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub axes: AxisSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub ai: AiSettings,
}

impl AppSettings {
    /// Platform config file location
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "maker3d", "maker3d")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path; a missing or unreadable file gives defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring malformed settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Err(e) = self.save_to(&path) {
            tracing::warn!("Failed to save settings to {}: {e}", path.display());
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

/// API key from `GEMINI_API_KEY`, falling back to `API_KEY`
pub fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = AppSettings::default();
        settings.grid.range = 3;
        settings.ui.language = Lang::En;
        settings.ai.model = "other-model".into();
        settings.save_to(&path).unwrap();

        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_and_malformed_files_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(AppSettings::load_from(&missing), AppSettings::default());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&bad), AppSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"grid": {"visible": false, "size": 2.0, "range": 4, "opacity": 1.0}}"#)
            .unwrap();
        let settings = AppSettings::load_from(&path);
        assert!(!settings.grid.visible);
        assert_eq!(settings.ai.model, DEFAULT_AI_MODEL);
        assert_eq!(settings.ui.language, Lang::Fr);
    }
}

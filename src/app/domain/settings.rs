//! Persisted session preferences. Old settings files missing newer fields
//! keep working through per-field defaults; margins are re-clamped on load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::domain::form::InsertionMode;
use crate::app::domain::layout::{Margins, Orientation, PageLayoutConfig};
use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub insertion_mode: InsertionMode,

    #[serde(default)]
    pub orientation: Orientation,

    #[serde(default)]
    pub margins: Margins,
}

impl AppSettings {
    /// Current page layout as an explicit config passed to the coordinator.
    pub fn layout(&self) -> PageLayoutConfig {
        PageLayoutConfig::new(self.orientation, self.margins)
    }

    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        let config_path = Self::get_config_path();

        let mut settings = match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, use defaults
                let default = Self::default();
                // Try to save defaults for next time
                let _ = default.save();
                default
            }
        };

        settings.margins = settings.margins.clamped();
        settings
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.write_to(&Self::get_config_path())
    }

    fn write_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Settings(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Settings(e.to_string()))?;
        fs::write(config_path, json).map_err(|e| {
            AppError::Settings(format!("cannot write {}: {}", config_path.display(), e))
        })?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("editalgen");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.insertion_mode, InsertionMode::Token);
        assert_eq!(settings.orientation, Orientation::Portrait);
        assert_eq!(settings.margins, Margins::uniform(20));
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = AppSettings {
            insertion_mode: InsertionMode::Value,
            orientation: Orientation::Landscape,
            margins: Margins::uniform(15),
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_partial_config() {
        // Simulate old config missing new fields
        let json = r#"{"insertion_mode": "inserir_valor"}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.insertion_mode, InsertionMode::Value);
        assert_eq!(settings.orientation, Orientation::Portrait);
        assert_eq!(settings.margins, Margins::uniform(20));
    }

    #[test]
    fn test_layout_clamps_margins() {
        let settings = AppSettings {
            margins: Margins::uniform(200),
            ..Default::default()
        };
        assert_eq!(settings.layout().margins, Margins::uniform(50));
    }

    #[test]
    fn test_write_to_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editalgen").join("settings.json");
        let settings = AppSettings {
            orientation: Orientation::Landscape,
            margins: Margins::uniform(15),
            ..Default::default()
        };
        settings.write_to(&path).unwrap();

        let loaded: AppSettings =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_write_failure_reports_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the parent directory should be.
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let err = AppSettings::default()
            .write_to(&blocker.join("settings.json"))
            .unwrap_err();
        assert!(matches!(err, AppError::Settings(_)));
    }

    #[test]
    fn test_orientation_serialization() {
        let settings = AppSettings {
            orientation: Orientation::Landscape,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"landscape\""));
    }
}

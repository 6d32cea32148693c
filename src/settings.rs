//! Settings with persistence
//!
//! Settings are saved to `~/.config/stride/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stride_core::TimeConfig;
use stride_game::PlayerConfig;
use tracing::{info, warn};

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub window: WindowSettings,
    pub time: TimeConfig,
    pub player: PlayerConfig,
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stride"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        self.save_to(&dir.join("settings.toml"))
    }

    /// Save settings to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Window settings for the interactive viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window width
    pub width: u32,
    /// Window height
    pub height: u32,
    /// World units visible vertically through the orthographic camera
    pub view_height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            view_height: 12.0,
        }
    }
}

impl WindowSettings {
    /// Width over height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("stride-settings-{}-{}", name, std::process::id()))
            .join("settings.toml")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = GameSettings::load_from(&temp_path("missing"));
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut settings = GameSettings::default();
        settings.player.locomotion.run_speed = 0.05;
        settings.window.width = 800;

        settings.save_to(&path).unwrap();
        let loaded = GameSettings::load_from(&path);
        let _ = fs::remove_dir_all(path.parent().unwrap());

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "player = 3").unwrap();

        let settings = GameSettings::load_from(&path);
        let _ = fs::remove_dir_all(path.parent().unwrap());

        assert_eq!(settings, GameSettings::default());
    }
}

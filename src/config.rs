//! Configuration parsing and management for kuma3d
//!
//! The pose table and blend factors are deliberately NOT configurable;
//! they are the avatar's behavioral contract and live as constants in
//! `crate::avatar::pose`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, KumaError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub avatar: AvatarConfig,
    pub camera: CameraConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, KumaError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, KumaError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, KumaError> {
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), KumaError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window".to_string(),
                message: "Window dimensions must be greater than 0".to_string(),
            }
            .into());
        }

        if self.camera.orbit_sensitivity <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "camera.orbit_sensitivity".to_string(),
                message: "Orbit sensitivity must be positive".to_string(),
            }
            .into());
        }

        if self.camera.zoom_min <= 0.0 || self.camera.zoom_min >= self.camera.zoom_max {
            return Err(ConfigError::InvalidValue {
                field: "camera.zoom_min".to_string(),
                message: "Zoom range must satisfy 0 < zoom_min < zoom_max".to_string(),
            }
            .into());
        }

        if !(self.camera.zoom_min..=self.camera.zoom_max).contains(&self.camera.initial_radius) {
            return Err(ConfigError::InvalidValue {
                field: "camera.initial_radius".to_string(),
                message: "Initial radius must lie within the zoom range".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Avatar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Mood on startup. Unrecognized names fall back to "idle".
    pub default_mood: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            default_mood: "idle".to_string(),
        }
    }
}

/// Orbit camera configuration. The polar clamp is a behavioral constant and
/// stays in `crate::ui::camera`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Radians of rotation per dragged pixel
    pub orbit_sensitivity: f32,
    /// Closest zoom distance
    pub zoom_min: f32,
    /// Farthest zoom distance
    pub zoom_max: f32,
    /// Starting distance from the avatar
    pub initial_radius: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.008,
            zoom_min: 3.0,
            zoom_max: 12.0,
            initial_radius: 6.0,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show the title/hint overlay text
    pub show_hints: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { show_hints: true }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("kuma3d");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/kuma3d");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/kuma3d");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("kuma3d");
        }
    }

    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.avatar.default_mood, "idle");
        assert!(config.ui.show_hints);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [window]
            width = 1920
            height = 1080

            [avatar]
            default_mood = "happy"

            [camera]
            initial_radius = 8.0
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.window.height, 1080);
        assert_eq!(config.avatar.default_mood, "happy");
        assert_eq!(config.camera.initial_radius, 8.0);
        // Untouched sections keep their defaults
        assert!(config.ui.show_hints);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed = Config::from_str(&serialized).unwrap();
        assert_eq!(parsed.window.width, config.window.width);
        assert_eq!(parsed.camera.zoom_max, config.camera.zoom_max);
        assert_eq!(parsed.avatar.default_mood, config.avatar.default_mood);
    }

    #[test]
    fn test_invalid_zoom_range_rejected() {
        let mut config = Config::default();
        config.camera.zoom_min = 10.0;
        config.camera.zoom_max = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_radius_outside_range_rejected() {
        let mut config = Config::default();
        config.camera.initial_radius = 100.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config::default();
        config.window.width = 0;
        assert!(config.validate().is_err());
    }
}

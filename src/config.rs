// src/config.rs
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::palette::{Color, PaletteEntry};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "AIR_CANVAS_CONFIG";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub detector: DetectorConfig,
    pub drawing: DrawingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Program that runs the hand landmark model.
    pub command: String,
    pub args: Vec<String>,
    pub min_confidence: f32,
    pub show_skeleton: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            command: "python3".to_string(),
            args: vec!["scripts/hand_detect.py".to_string()],
            min_confidence: 0.5,
            show_skeleton: true,
        }
    }
}

/// Minimum pixel separation between index and thumb tips for the pen pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    pub min_dx: i32,
    pub min_dy: i32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self { min_dx: 50, min_dy: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    pub palette: Vec<PaletteEntry>,
    pub box_size: u32,
    pub spacing: u32,
    /// Palette starts this many pixels left of the frame's right edge.
    pub origin_offset: i32,
    pub top: i32,
    pub line_thickness: u32,
    pub open_hand_clears: bool,
    pub pen_pose_thresholds: GestureThresholds,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                PaletteEntry::new("red", Color(255, 0, 0)),
                PaletteEntry::new("yellow", Color(255, 255, 0)),
                PaletteEntry::new("blue", Color(0, 0, 255)),
                PaletteEntry::new("green", Color(0, 255, 0)),
            ],
            box_size: 100,
            spacing: 20,
            origin_offset: 540,
            top: 10,
            line_thickness: 5,
            open_hand_clears: true,
            pen_pose_thresholds: GestureThresholds::default(),
        }
    }
}

impl DrawingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must contain at least one color".into()));
        }
        if self.box_size == 0 {
            return Err(ConfigError::Invalid("box_size must be positive".into()));
        }
        if self.line_thickness == 0 {
            return Err(ConfigError::Invalid("line_thickness must be positive".into()));
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from `$AIR_CANVAS_CONFIG`, then the per-user config directory,
    /// falling back to the built-in defaults when neither exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            info!("Loading config from {}", explicit);
            return Self::load(explicit);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::load(path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "aircanvas", "AirCanvas")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.drawing.validate()?;
        if !(0.0..=1.0).contains(&self.detector.min_confidence) {
            return Err(ConfigError::Invalid("detector.min_confidence must be within [0, 1]".into()));
        }
        Ok(())
    }
}

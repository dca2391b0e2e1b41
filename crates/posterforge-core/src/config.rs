//! Editor configuration.

use crate::document::DUPLICATE_OFFSET;
use crate::geometry::{
    DEFAULT_GRID_SIZE, GRID_SIZE_STEP, GridSettings, MAX_GRID_SIZE, MIN_GRID_SIZE, ROTATE_STEP,
};
use crate::sizes::SizePreset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub grid_size: f64,
    pub snap_to_grid: bool,
    /// Height of the on-screen preview viewport in pixels.
    pub preview_height: f64,
    pub duplicate_offset: f64,
    pub rotate_step: f64,
    /// Output size a fresh document opens with.
    pub default_size: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: false,
            preview_height: 600.0,
            duplicate_offset: DUPLICATE_OFFSET,
            rotate_step: ROTATE_STEP,
            default_size: SizePreset::default_preset().id.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration. Missing fields use defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size)
            || self.grid_size % GRID_SIZE_STEP != 0.0
        {
            return Err(ConfigError::Invalid(format!(
                "gridSize must be a multiple of {GRID_SIZE_STEP} \
                 between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        if self.preview_height.is_nan() || self.preview_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "previewHeight must be positive, got {}",
                self.preview_height
            )));
        }
        if self.duplicate_offset < 0.0 || self.rotate_step < 0.0 {
            return Err(ConfigError::Invalid(
                "duplicateOffset and rotateStep must be non-negative".to_string(),
            ));
        }
        if SizePreset::find(&self.default_size).is_none() {
            return Err(ConfigError::Invalid(format!("unknown defaultSize {}", self.default_size)));
        }
        Ok(())
    }

    pub fn grid(&self) -> GridSettings {
        GridSettings::new(self.snap_to_grid, self.grid_size)
    }
}

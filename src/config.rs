use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_title: String,
    pub width: u32,
    pub height: u32,
    /// Fixed simulation ticks per second, independent of the render rate.
    pub ticks_per_second: u32,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "orrery".to_string(),
            width: 1280,
            height: 720,
            ticks_per_second: 90,
            field_of_view: 70.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid(
                "ticks_per_second must be at least 1".to_string(),
            ));
        }

        if !(self.near_plane > 0.0 && self.far_plane > self.near_plane) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near {} and far {}",
                self.near_plane, self.far_plane
            )));
        }

        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "field_of_view must be between 0 and 180 degrees, got {}",
                self.field_of_view
            )));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Result<Duration, ConfigError> {
        self.validate()?;
        Ok(Duration::from_secs(1) / self.ticks_per_second)
    }
}

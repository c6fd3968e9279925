mod loader;

use crate::renderer::Axis;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use loader::load_config;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub gif: GifConfig,
}

/// Character grid and animation sweep
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Frames per full rotation
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default)]
    pub axis: Axis,
    /// Shading characters, sparsest first
    #[serde(default = "default_ramp")]
    pub ramp: String,
    /// Draw mesh-space +y at the top row
    #[serde(default)]
    pub flip_vertical: bool,
    /// Render frames on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_width() -> usize {
    120
}

fn default_height() -> usize {
    60
}

fn default_steps() -> usize {
    60
}

fn default_ramp() -> String {
    crate::ASCII_RAMP.to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            steps: default_steps(),
            axis: Axis::default(),
            ramp: default_ramp(),
            flip_vertical: false,
            parallel: false,
        }
    }
}

/// Animated GIF output
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GifConfig {
    /// Pixels per character cell along each axis
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u32,
    /// Quantizer speed, 1 (best) to 30 (fastest)
    #[serde(default = "default_speed")]
    pub speed: i32,
}

fn default_scale() -> u32 {
    6
}

fn default_delay_ms() -> u32 {
    100
}

fn default_speed() -> i32 {
    10
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            delay_ms: default_delay_ms(),
            speed: default_speed(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load an explicit file, or fall back to defaults when none is given
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(ConfigError::Validation(format!(
                "render grid must be at least 1x1, got {}x{}",
                render.width, render.height
            )));
        }
        if render.steps == 0 {
            return Err(ConfigError::Validation("render.steps must be at least 1".to_string()));
        }
        if render.ramp.is_empty() {
            return Err(ConfigError::Validation("render.ramp must not be empty".to_string()));
        }

        let gif = &self.gif;
        if gif.scale == 0 {
            return Err(ConfigError::Validation("gif.scale must be at least 1".to_string()));
        }
        if !(1..=30).contains(&gif.speed) {
            return Err(ConfigError::Validation(format!(
                "gif.speed must be between 1 and 30, got {}",
                gif.speed
            )));
        }
        Ok(())
    }

    /// Extra checks for GIF output on top of `validate`
    pub fn validate_gif(&self) -> Result<(), ConfigError> {
        self.validate()?;
        let (render, gif) = (&self.render, &self.gif);
        // GIF logical screen dimensions are 16-bit
        let fits = |cells: usize| cells as u64 * gif.scale as u64 <= u16::MAX as u64;
        if !fits(render.width) || !fits(render.height) {
            return Err(ConfigError::Validation(format!(
                "{}x{} cells at scale {} exceeds the GIF size limit",
                render.width, render.height, gif.scale
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

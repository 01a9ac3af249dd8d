//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod types;

pub use types::{LayoutConfig, LoggingConfig, RenderAreaConfig};

use crate::layout::AreaSize;
use crate::session::SessionOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Layout engine configuration
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Arrangement area configuration
    #[serde(default)]
    pub render_area: RenderAreaConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Config::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let scale = self.layout.min_visual_scale;
        if !scale.is_finite() || scale <= 0.0 {
            anyhow::bail!("Invalid min_visual_scale: {} (must be > 0)", scale);
        }

        if self.render_area.width == 0 || self.render_area.height == 0 {
            anyhow::bail!(
                "Invalid render area: {}x{}",
                self.render_area.width,
                self.render_area.height
            );
        }

        // Snapping farther than half the area would pin every drag to an edge.
        if self.layout.snap_distance_px > self.render_area.width / 2 {
            anyhow::bail!(
                "snap_distance_px ({}) cannot exceed half the render area width ({})",
                self.layout.snap_distance_px,
                self.render_area.width / 2
            );
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, area_width: Option<u32>, area_height: Option<u32>) -> Self {
        if let Some(width) = area_width {
            self.render_area.width = width;
        }
        if let Some(height) = area_height {
            self.render_area.height = height;
        }

        self
    }

    /// Parameters for an arrangement session
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            area: AreaSize::new(self.render_area.width, self.render_area.height),
            min_visual_scale: self.layout.min_visual_scale,
            tuning: self.layout.tuning(),
        }
    }
}

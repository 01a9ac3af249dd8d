//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::layout::LayoutTuning;

/// Layout engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Upper bound of the visual scale (1.0 = never magnify)
    #[serde(default = "default_min_visual_scale")]
    pub min_visual_scale: f64,

    /// Edges closer than this many rendered pixels snap into alignment
    #[serde(default = "default_snap_distance_px")]
    pub snap_distance_px: u32,

    /// Minimum shared edge, in rendered pixels, kept between adjacent displays
    #[serde(default = "default_min_overlap_px")]
    pub min_overlap_px: u32,
}

impl LayoutConfig {
    /// Drag tunables for the layout manager
    pub fn tuning(&self) -> LayoutTuning {
        LayoutTuning {
            snap_distance_px: self.snap_distance_px,
            min_overlap_px: self.min_overlap_px,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_visual_scale: default_min_visual_scale(),
            snap_distance_px: default_snap_distance_px(),
            min_overlap_px: default_min_overlap_px(),
        }
    }
}

fn default_min_visual_scale() -> f64 {
    1.0
}

fn default_snap_distance_px() -> u32 {
    10
}

fn default_min_overlap_px() -> u32 {
    5
}

/// Arrangement area configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderAreaConfig {
    /// Area width in rendered pixels
    pub width: u32,

    /// Area height in rendered pixels
    pub height: u32,
}

impl Default for RenderAreaConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 320,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file written in addition to stderr (None = console only)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

//! In-Memory Display Service
//!
//! Keeps display units and layouts in process, seeded from a TOML snapshot:
//!
//! ```toml
//! [[display]]
//! id = "0"
//! name = "Built-in"
//! left = 0
//! top = 0
//! width = 1920
//! height = 1080
//! primary = true
//!
//! [[display]]
//! id = "1"
//! name = "External"
//! left = 1920
//! top = 0
//! width = 1280
//! height = 720
//!
//! # Optional; inferred from bounds when missing
//! [[layout]]
//! id = "1"
//! parent_id = "0"
//! position = "right"
//! offset = 0
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{child_bounds, DisplayConfigService, DisplayLayoutEntry, DisplayUnit, Result, ServiceError};
use crate::layout::{extent, infer_layout_from_bounds, Bounds};

/// Display record of a snapshot file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDisplay {
    /// Display id
    pub id: String,
    /// Display label
    #[serde(default)]
    pub name: String,
    /// Left edge, physical pixels
    pub left: i32,
    /// Top edge, physical pixels
    pub top: i32,
    /// Width, physical pixels
    pub width: u32,
    /// Height, physical pixels
    pub height: u32,
    /// Primary flag
    #[serde(default)]
    pub primary: bool,
}

impl From<SnapshotDisplay> for DisplayUnit {
    fn from(display: SnapshotDisplay) -> Self {
        let name = if display.name.is_empty() {
            format!("Display {}", display.id)
        } else {
            display.name
        };

        Self {
            id: display.id,
            name,
            bounds: Bounds::new(display.left, display.top, display.width, display.height),
            is_primary: display.primary,
        }
    }
}

/// Contents of a snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Displays
    #[serde(default, rename = "display")]
    pub displays: Vec<SnapshotDisplay>,
    /// Explicit layouts
    #[serde(default, rename = "layout")]
    pub layouts: Vec<DisplayLayoutEntry>,
}

#[derive(Debug, Default)]
struct ServiceState {
    units: Vec<DisplayUnit>,
    layouts: Vec<DisplayLayoutEntry>,
}

/// Display service holding its state in memory
#[derive(Debug, Clone)]
pub struct InMemoryDisplayService {
    state: Arc<RwLock<ServiceState>>,
}

impl InMemoryDisplayService {
    /// Create a service from units and (possibly partial) layouts
    ///
    /// Non-primary displays without a layout entry are attached to the
    /// primary display on the side their bounds suggest.
    ///
    /// # Errors
    ///
    /// Returns error unless exactly one display is primary, or if a layout
    /// references an unknown display.
    pub fn new(units: Vec<DisplayUnit>, mut layouts: Vec<DisplayLayoutEntry>) -> Result<Self> {
        let primaries: Vec<&DisplayUnit> = units.iter().filter(|unit| unit.is_primary).collect();
        if primaries.len() != 1 {
            return Err(ServiceError::PrimaryCount(primaries.len()));
        }
        let primary = primaries[0].clone();

        for entry in &layouts {
            for id in [&entry.id, &entry.parent_id] {
                if !units.iter().any(|unit| &unit.id == id) {
                    return Err(ServiceError::UnknownDisplay(id.clone()));
                }
            }
        }

        for unit in units.iter().filter(|unit| !unit.is_primary) {
            if layouts.iter().any(|entry| entry.id == unit.id) {
                continue;
            }

            let (position, offset) = infer_layout_from_bounds(&primary.bounds, &unit.bounds)?;
            debug!(
                "Inferred layout for {}: {} of {} offset {}",
                unit.id, position, primary.id, offset
            );
            layouts.push(DisplayLayoutEntry {
                id: unit.id.clone(),
                parent_id: primary.id.clone(),
                position,
                offset,
            });
        }

        info!("Display service holds {} displays", units.len());

        Ok(Self {
            state: Arc::new(RwLock::new(ServiceState { units, layouts })),
        })
    }

    /// Create a service from a parsed snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let units = snapshot.displays.into_iter().map(DisplayUnit::from).collect();
        Self::new(units, snapshot.layouts)
    }

    /// Parse a TOML snapshot
    pub fn from_snapshot_str(content: &str) -> Result<Self> {
        let snapshot: Snapshot = toml::from_str(content)?;
        Self::from_snapshot(snapshot)
    }

    /// Load a TOML snapshot file
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        debug!("Loaded display snapshot from {}", path.as_ref().display());
        Self::from_snapshot_str(&content)
    }
}

#[async_trait]
impl DisplayConfigService for InMemoryDisplayService {
    async fn display_units(&self) -> Result<Vec<DisplayUnit>> {
        Ok(self.state.read().await.units.clone())
    }

    async fn display_layouts(&self) -> Result<Vec<DisplayLayoutEntry>> {
        Ok(self.state.read().await.layouts.clone())
    }

    async fn set_display_layout(&self, layouts: Vec<DisplayLayoutEntry>) -> Result<()> {
        let mut state = self.state.write().await;

        // Applied to copies; the batch lands only if every entry is valid.
        let mut units = state.units.clone();
        let mut staged = state.layouts.clone();
        let mut placed = Vec::with_capacity(layouts.len());

        for mut entry in layouts {
            if entry.id == entry.parent_id {
                return Err(ServiceError::Rejected(format!(
                    "display {} cannot be its own parent",
                    entry.id
                )));
            }

            let parent = units
                .iter()
                .find(|unit| unit.id == entry.parent_id)
                .map(|unit| unit.bounds)
                .ok_or_else(|| ServiceError::UnknownDisplay(entry.parent_id.clone()))?;
            let child = units
                .iter()
                .find(|unit| unit.id == entry.id)
                .map(|unit| unit.bounds)
                .ok_or_else(|| ServiceError::UnknownDisplay(entry.id.clone()))?;

            // Keep at least one pixel of shared edge.
            let (child_extent, parent_extent) = if entry.position.is_horizontal() {
                (extent(child.height), extent(parent.height))
            } else {
                (extent(child.width), extent(parent.width))
            };
            let lowest = 1i32.saturating_sub(child_extent);
            let highest = parent_extent.saturating_sub(1).max(lowest);
            let clamped = entry.offset.clamp(lowest, highest);
            if clamped != entry.offset {
                warn!(
                    "Offset {} for display {} leaves no shared edge, clamped to {}",
                    entry.offset, entry.id, clamped
                );
                entry.offset = clamped;
            }

            let bounds = child_bounds(&parent, &child, entry.position, entry.offset);
            if let Some(unit) = units.iter_mut().find(|unit| unit.id == entry.id) {
                unit.bounds = bounds;
            }
            placed.push((entry.clone(), bounds));

            match staged.iter_mut().find(|existing| existing.id == entry.id) {
                Some(existing) => *existing = entry,
                None => staged.push(entry),
            }
        }

        state.units = units;
        state.layouts = staged;

        for (entry, bounds) in placed {
            info!(
                "Display {} placed {} of {} at offset {} ({},{})",
                entry.id, entry.position, entry.parent_id, entry.offset, bounds.left, bounds.top
            );
        }

        Ok(())
    }
}

//! Display Configuration Service
//!
//! The platform side of the arrangement editor: where the current displays
//! come from and where a finished layout is sent. The editor only ever talks
//! to it through [`DisplayConfigService`], so the real platform backend and
//! the in-memory implementation used by the CLI and tests are interchangeable.
//!
//! # Data shapes
//!
//! - [`DisplayUnit`]: one enumerated display (id, name, bounds, primary flag)
//! - [`DisplayLayoutEntry`]: placement of a child display relative to its
//!   parent, as accepted by [`DisplayConfigService::set_display_layout`]

mod memory;

pub use memory::{InMemoryDisplayService, Snapshot, SnapshotDisplay};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{extent, Bounds, LayoutCommit, LayoutError, LayoutType};

/// Display service result type
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Display service error types
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Snapshot file could not be read
    #[error("Failed to read display snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid TOML or misses fields
    #[error("Failed to parse display snapshot: {0}")]
    Parse(#[from] toml::de::Error),

    /// A layout referenced a display that does not exist
    #[error("Unknown display: {0}")]
    UnknownDisplay(String),

    /// Exactly one primary display is required
    #[error("Expected exactly one primary display, found {0}")]
    PrimaryCount(usize),

    /// Layout the service refuses to apply
    #[error("Layout rejected: {0}")]
    Rejected(String),

    /// Geometry error while inferring or applying a layout
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// One display as enumerated by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayUnit {
    /// Opaque unique identifier
    pub id: String,
    /// Human readable label
    pub name: String,
    /// Bounds in physical pixels
    pub bounds: Bounds,
    /// Whether this is the primary display
    pub is_primary: bool,
}

/// Placement of a child display relative to its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLayoutEntry {
    /// Child display
    pub id: String,
    /// Display the child is attached to
    pub parent_id: String,
    /// Side of the parent
    pub position: LayoutType,
    /// Offset along the shared edge, physical pixels
    pub offset: i32,
}

impl From<LayoutCommit> for DisplayLayoutEntry {
    fn from(commit: LayoutCommit) -> Self {
        Self {
            id: commit.display_id,
            parent_id: commit.parent_id,
            position: commit.layout_type,
            offset: commit.offset,
        }
    }
}

/// Platform display configuration, consumed through opaque async calls
#[async_trait]
pub trait DisplayConfigService: Send + Sync {
    /// Enumerate the connected displays
    async fn display_units(&self) -> Result<Vec<DisplayUnit>>;

    /// Current placement of every non-primary display
    async fn display_layouts(&self) -> Result<Vec<DisplayLayoutEntry>>;

    /// Apply new placements
    ///
    /// # Errors
    ///
    /// Returns error if an entry references an unknown display or cannot be
    /// applied.
    async fn set_display_layout(&self, layouts: Vec<DisplayLayoutEntry>) -> Result<()>;
}

/// Bounds of a child placed against `parent` with `position` and `offset`
///
/// This is how the platform turns a committed layout back into screen
/// coordinates.
pub fn child_bounds(parent: &Bounds, child: &Bounds, position: LayoutType, offset: i32) -> Bounds {
    let (left, top) = match position {
        LayoutType::Right => (parent.right(), parent.top.saturating_add(offset)),
        LayoutType::Left => (
            parent.left.saturating_sub(extent(child.width)),
            parent.top.saturating_add(offset),
        ),
        LayoutType::Top => (
            parent.left.saturating_add(offset),
            parent.top.saturating_sub(extent(child.height)),
        ),
        LayoutType::Bottom => (parent.left.saturating_add(offset), parent.bottom()),
    };

    Bounds::new(left, top, child.width, child.height)
}

//! Display Layout Engine
//!
//! Geometry behind a display-arrangement editor: displays are drawn as scaled
//! rectangles inside an arrangement area, the user drags one of them around
//! its base display, and the engine decides which edge it attaches to.
//!
//! # Overview
//!
//! ```text
//!        physical space                      arrangement area
//! ┌──────────────┐┌────────┐           ┌──────────────────────────┐
//! │   primary    ││ child  │  scale +  │       ┌────┐┌──┐         │
//! │  1920x1080   ││1280x720│ ────────> │       │ P  ││C │         │
//! │   (0, 0)     │└────────┘  offset   │       └────┘└──┘         │
//! └──────────────┘                     └──────────────────────────┘
//! ```
//!
//! 1. [`DisplayLayoutManager::add_display`] mirrors the platform's displays.
//! 2. [`DisplayLayoutManager::compute_render_area`] picks the visual scale and
//!    centers the bounding box, then creates every rendered rectangle.
//! 3. [`DisplayLayoutManager::update_position`] handles each pointer move:
//!    snap, classify with the diagonal quadrant rule, correct at the base's
//!    boundaries, and place the rectangle flush against the chosen edge.
//! 4. [`DisplayLayoutManager::finalize_position`] runs on drop: keeps the two
//!    rectangles edge-adjacent, converts the child's offset back to physical
//!    pixels and reports whether anything changed.
//!
//! # Layout types
//!
//! The layout type always lives on the child display and describes the
//! child's position relative to its parent. Dragging the primary display
//! classifies the base's position relative to it, so the result is inverted
//! before it is stored on the child.

mod display;
mod manager;
mod quadrant;
mod types;

pub use display::{infer_layout_from_bounds, DisplayLayout};
pub use manager::{DisplayLayoutManager, LayoutCommit, LayoutTuning, RenderGeometry};
pub use quadrant::{invert_layout_type, layout_type_for_position};
pub use types::{AreaSize, Bounds, LayoutType, Position, RectF, RenderedRect};
pub(crate) use types::extent;

use thiserror::Error;

/// Layout engine result type
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Layout engine error types
///
/// None of these are user-facing failures; they describe a malformed display
/// topology or input the caller should have rejected earlier.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// No displays were added before computing the render area
    #[error("No displays configured")]
    NoDisplays,

    /// Lookup of an id that was never added
    #[error("Unknown display: {0}")]
    UnknownDisplay(String),

    /// Neither a parent nor a child exists to position the display against
    #[error("No base display found for {0}")]
    MissingBase(String),

    /// Display bounds with zero width or height
    #[error("Invalid dimensions for display {id}: {width}x{height}")]
    InvalidDimensions {
        /// Offending display
        id: String,
        /// Reported width
        width: u32,
        /// Reported height
        height: u32,
    },

    /// Rectangle without a usable diagonal slope
    #[error("Degenerate rectangle: {width}x{height}")]
    DegenerateRect {
        /// Rectangle width
        width: f64,
        /// Rectangle height
        height: f64,
    },

    /// Minimum scale that is not a positive finite number
    #[error("Invalid visual scale: {0}")]
    InvalidScale(f64),

    /// Arrangement area with no width
    #[error("Invalid render area: {0}x{1}")]
    InvalidArea(u32, u32),

    /// Operation that needs rendered rectangles ran before the render area
    #[error("Display {0} has not been rendered")]
    NotRendered(String),

    /// Parent chain that never reaches a primary display
    #[error("Display {0} is not connected to a primary display")]
    Unanchored(String),
}

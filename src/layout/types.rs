//! Geometry primitives shared by the layout engine
//!
//! Two coordinate spaces are in play:
//!
//! - **Physical space** ([`Bounds`]): display pixels as reported by the
//!   platform display service.
//! - **Rendered space** ([`RenderedRect`], [`Position`]): pixels inside the
//!   arrangement area, after scaling by the visual scale and shifting by the
//!   area offset.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a base display on which another display is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    /// Attached to the left edge
    Left,
    /// Attached to the right edge
    Right,
    /// Attached to the top edge
    Top,
    /// Attached to the bottom edge
    Bottom,
}

impl LayoutType {
    /// All four layout types, in a fixed order
    pub const ALL: [LayoutType; 4] = [
        LayoutType::Left,
        LayoutType::Right,
        LayoutType::Top,
        LayoutType::Bottom,
    ];

    /// The opposite side (LEFT↔RIGHT, TOP↔BOTTOM)
    pub fn inverted(self) -> Self {
        match self {
            LayoutType::Left => LayoutType::Right,
            LayoutType::Right => LayoutType::Left,
            LayoutType::Top => LayoutType::Bottom,
            LayoutType::Bottom => LayoutType::Top,
        }
    }

    /// True for LEFT and RIGHT, where the shared edge is vertical
    pub fn is_horizontal(self) -> bool {
        matches!(self, LayoutType::Left | LayoutType::Right)
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutType::Left => write!(f, "left"),
            LayoutType::Right => write!(f, "right"),
            LayoutType::Top => write!(f, "top"),
            LayoutType::Bottom => write!(f, "bottom"),
        }
    }
}

/// Display rectangle in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// X of the top-left corner
    pub left: i32,
    /// Y of the top-left corner
    pub top: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Bounds {
    /// Create a new bounds rectangle
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.left.saturating_add(extent(self.width))
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(extent(self.height))
    }

    /// Zero-area rectangles cannot take part in layout classification
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Center point
    pub fn center(&self) -> (f64, f64) {
        (
            self.left as f64 + self.width as f64 / 2.0,
            self.top as f64 + self.height as f64 / 2.0,
        )
    }
}

/// Point in rendered-area pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

impl Position {
    /// Create a new position
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Rectangle of a display inside the arrangement area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRect {
    /// X of the top-left corner
    pub left: i32,
    /// Y of the top-left corner
    pub top: i32,
    /// Width in rendered pixels
    pub width: i32,
    /// Height in rendered pixels
    pub height: i32,
}

impl RenderedRect {
    /// Create a new rendered rectangle
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }

    /// Top-left corner
    pub fn position(&self) -> Position {
        Position::new(self.left, self.top)
    }

    /// Same size, moved to `position`
    pub fn moved_to(&self, position: Position) -> Self {
        Self::new(position.x, position.y, self.width, self.height)
    }

    /// Center point
    pub fn center(&self) -> (f64, f64) {
        (
            self.left as f64 + self.width as f64 / 2.0,
            self.top as f64 + self.height as f64 / 2.0,
        )
    }

    /// Point containment (right and bottom edges exclusive)
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }
}

/// Size of the arrangement area in rendered pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl AreaSize {
    /// Create a new area size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Floating point rectangle used by the quadrant classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    /// X of the top-left corner
    pub left: f64,
    /// Y of the top-left corner
    pub top: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl From<RenderedRect> for RectF {
    fn from(rect: RenderedRect) -> Self {
        Self {
            left: rect.left as f64,
            top: rect.top as f64,
            width: rect.width as f64,
            height: rect.height as f64,
        }
    }
}

impl From<Bounds> for RectF {
    fn from(bounds: Bounds) -> Self {
        Self {
            left: bounds.left as f64,
            top: bounds.top as f64,
            width: bounds.width as f64,
            height: bounds.height as f64,
        }
    }
}

/// Physical extent as a signed coordinate delta, clamped to `i32::MAX`
pub(crate) fn extent(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

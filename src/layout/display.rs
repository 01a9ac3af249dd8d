//! Display Descriptor
//!
//! One display of the arrangement: its platform-reported bounds, its relation
//! to a parent display and the rectangle it occupies in the arrangement area.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::quadrant::layout_type_for_position;
use super::types::{Bounds, LayoutType, Position, RenderedRect};
use super::{LayoutError, Result};

/// A display taking part in the arrangement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayLayout {
    /// Opaque unique identifier
    pub id: String,

    /// Human readable label
    pub name: String,

    /// Bounds in physical pixels, as last reported by the display service
    pub bounds: Bounds,

    /// Display this one is positioned relative to (empty for the primary)
    pub parent_id: String,

    /// Side of the parent this display is attached to (children only)
    pub layout_type: LayoutType,

    /// Offset along the shared edge, in physical pixels, relative to the parent
    pub offset: i32,

    /// Rendered rectangle, created by the layout manager
    #[serde(skip)]
    rect: Option<RenderedRect>,

    /// Rendered position captured when the rectangle was (re)created
    #[serde(skip)]
    original_offset: Position,
}

impl DisplayLayout {
    /// Create a child display attached to `parent_id`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        bounds: Bounds,
        parent_id: impl Into<String>,
        layout_type: LayoutType,
        offset: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bounds,
            parent_id: parent_id.into(),
            layout_type,
            offset,
            rect: None,
            original_offset: Position::default(),
        }
    }

    /// Create a primary display (no parent)
    pub fn primary(id: impl Into<String>, name: impl Into<String>, bounds: Bounds) -> Self {
        Self::new(id, name, bounds, "", LayoutType::Right, 0)
    }

    /// True when this display has no parent
    pub fn is_primary(&self) -> bool {
        self.parent_id.is_empty()
    }

    /// Rendered rectangle, if the render area has been computed
    pub fn rect(&self) -> Option<RenderedRect> {
        self.rect
    }

    /// Rendered position captured at creation or last finalize
    pub fn original_offset(&self) -> Position {
        self.original_offset
    }

    /// Whether the rendered rectangle moved since it was captured
    pub fn has_moved(&self) -> bool {
        self.rect
            .map(|rect| rect.position() != self.original_offset)
            .unwrap_or(false)
    }

    pub(crate) fn set_rect(&mut self, rect: RenderedRect) {
        self.rect = Some(rect);
    }

    pub(crate) fn capture_original_offset(&mut self) {
        if let Some(rect) = self.rect {
            self.original_offset = rect.position();
        }
    }

    /// Derive the rendered rectangle from bounds (primary) or from the
    /// parent's rectangle, the layout type and the offset (child).
    pub(crate) fn layout_rect_from_bounds(
        &mut self,
        area_offset: Position,
        scale: f64,
        parent: Option<&RenderedRect>,
    ) -> RenderedRect {
        let width = scaled_extent(self.bounds.width, scale);
        let height = scaled_extent(self.bounds.height, scale);

        let rect = match parent {
            None => RenderedRect::new(
                area_offset
                    .x
                    .saturating_add((self.bounds.left as f64 * scale).trunc() as i32),
                area_offset
                    .y
                    .saturating_add((self.bounds.top as f64 * scale).trunc() as i32),
                width,
                height,
            ),
            Some(parent) => {
                let offset = (self.offset as f64 * scale).round() as i32;
                let along_x = parent.left.saturating_add(offset);
                let along_y = parent.top.saturating_add(offset);
                match self.layout_type {
                    LayoutType::Top => RenderedRect::new(
                        along_x,
                        parent.top.saturating_sub(height),
                        width,
                        height,
                    ),
                    LayoutType::Bottom => RenderedRect::new(along_x, parent.bottom(), width, height),
                    LayoutType::Left => RenderedRect::new(
                        parent.left.saturating_sub(width),
                        along_y,
                        width,
                        height,
                    ),
                    LayoutType::Right => RenderedRect::new(parent.right(), along_y, width, height),
                }
            }
        };

        self.rect = Some(rect);
        rect
    }

    /// Snap a candidate X so that one of our vertical edges lines up with one
    /// of the base's vertical edges, when within `snap_distance`.
    pub(crate) fn snap_to_x(&self, x: i32, base: &RenderedRect, snap_distance: i32) -> i32 {
        let width = self.rect.map(|r| r.width).unwrap_or(0);
        let candidates = [
            (x, base.left),
            (x.saturating_add(width), base.left),
            (x, base.right()),
            (x.saturating_add(width), base.right()),
        ];

        for (idx, (edge, target)) in candidates.iter().enumerate() {
            if edge.abs_diff(*target) < snap_distance.unsigned_abs() {
                // Shift by the same amount the edge moves.
                let snapped = x.saturating_add(target - edge);
                trace!(display = %self.id, x, snapped, rule = idx, "Snapped x");
                return snapped;
            }
        }

        x
    }

    /// Vertical counterpart of [`Self::snap_to_x`].
    pub(crate) fn snap_to_y(&self, y: i32, base: &RenderedRect, snap_distance: i32) -> i32 {
        let height = self.rect.map(|r| r.height).unwrap_or(0);
        let candidates = [
            (y, base.top),
            (y.saturating_add(height), base.top),
            (y, base.bottom()),
            (y.saturating_add(height), base.bottom()),
        ];

        for (idx, (edge, target)) in candidates.iter().enumerate() {
            if edge.abs_diff(*target) < snap_distance.unsigned_abs() {
                let snapped = y.saturating_add(target - edge);
                trace!(display = %self.id, y, snapped, rule = idx, "Snapped y");
                return snapped;
            }
        }

        y
    }

    /// Move the rectangle flush against the `layout_type` edge of `base`,
    /// keeping `position` along the shared edge.
    ///
    /// `layout_type` is the position of this display relative to `base`.
    pub(crate) fn set_rect_position(
        &mut self,
        position: Position,
        base: &RenderedRect,
        layout_type: LayoutType,
    ) -> Option<RenderedRect> {
        let rect = self.rect?;
        let moved = match layout_type {
            LayoutType::Right => Position::new(base.right(), position.y),
            LayoutType::Left => Position::new(base.left.saturating_sub(rect.width), position.y),
            LayoutType::Top => Position::new(position.x, base.top.saturating_sub(rect.height)),
            LayoutType::Bottom => Position::new(position.x, base.bottom()),
        };

        let moved = rect.moved_to(moved);
        self.rect = Some(moved);
        Some(moved)
    }

    /// Keep the rectangle edge-adjacent to `base` with at least `min_overlap`
    /// pixels of shared edge, so the two never touch only at a corner.
    pub(crate) fn adjust_corners(
        &mut self,
        base: &RenderedRect,
        layout_type: LayoutType,
        min_overlap: i32,
    ) -> Option<RenderedRect> {
        let rect = self.rect?;

        let adjusted = if layout_type.is_horizontal() {
            let overlap = min_overlap.min(rect.height).min(base.height).max(0);
            let top = rect
                .top
                .max(base.top.saturating_sub(rect.height).saturating_add(overlap))
                .min(base.bottom().saturating_sub(overlap));
            let left = if layout_type == LayoutType::Right {
                base.right()
            } else {
                base.left.saturating_sub(rect.width)
            };
            RenderedRect::new(left, top, rect.width, rect.height)
        } else {
            let overlap = min_overlap.min(rect.width).min(base.width).max(0);
            let left = rect
                .left
                .max(base.left.saturating_sub(rect.width).saturating_add(overlap))
                .min(base.right().saturating_sub(overlap));
            let top = if layout_type == LayoutType::Bottom {
                base.bottom()
            } else {
                base.top.saturating_sub(rect.height)
            };
            RenderedRect::new(left, top, rect.width, rect.height)
        };

        self.rect = Some(adjusted);
        Some(adjusted)
    }
}

/// Offset of `child` along the edge it shares with `parent`, converted back to
/// physical pixels.
pub(crate) fn calculate_offset(
    child: &RenderedRect,
    parent: &RenderedRect,
    layout_type: LayoutType,
    scale: f64,
) -> i32 {
    let rendered = if layout_type.is_horizontal() {
        child.top.saturating_sub(parent.top)
    } else {
        child.left.saturating_sub(parent.left)
    };

    (rendered as f64 / scale).round() as i32
}

/// Infer where `child` sits relative to `parent` from their physical bounds
///
/// Used when the display service reports positions but no explicit layout.
/// Returns the layout type of the child and its offset along the shared edge.
pub fn infer_layout_from_bounds(parent: &Bounds, child: &Bounds) -> Result<(LayoutType, i32)> {
    if parent.is_degenerate() {
        return Err(LayoutError::DegenerateRect {
            width: parent.width as f64,
            height: parent.height as f64,
        });
    }

    let layout_type = layout_type_for_position((*parent).into(), child.center())?;
    let offset = if layout_type.is_horizontal() {
        child.top.saturating_sub(parent.top)
    } else {
        child.left.saturating_sub(parent.left)
    };

    Ok((layout_type, offset))
}

/// Scaled extent, never collapsing a display to zero pixels
fn scaled_extent(extent: u32, scale: f64) -> i32 {
    ((extent as f64 * scale).floor() as i32).max(1)
}

//! Display Layout Manager
//!
//! Owns the in-memory mirror of the displays being arranged and turns pointer
//! drags into layout decisions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::display::{calculate_offset, DisplayLayout};
use super::quadrant::layout_type_for_position;
use super::types::{extent, AreaSize, LayoutType, Position, RenderedRect};
use super::{LayoutError, Result};

/// Tunables for drag handling, in rendered pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTuning {
    /// Edges closer than this snap into alignment with the base
    pub snap_distance_px: u32,

    /// Minimum shared edge kept between two adjacent displays
    pub min_overlap_px: u32,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            snap_distance_px: 10,
            min_overlap_px: 5,
        }
    }
}

/// Layout to push to the display service after a drag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutCommit {
    /// Child display whose placement changed
    pub display_id: String,
    /// Display the child is attached to
    pub parent_id: String,
    /// Side of the parent
    pub layout_type: LayoutType,
    /// Offset along the shared edge, physical pixels
    pub offset: i32,
}

/// Everything the rendering layer needs to draw the arrangement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderGeometry {
    /// Physical to rendered pixel ratio
    pub scale: f64,
    /// Offset centering the displays in the area
    pub area_offset: Position,
    /// Rendered rectangle per display id
    pub rects: BTreeMap<String, RenderedRect>,
}

/// Computes rendered placement of displays and interprets drags
#[derive(Debug, Clone)]
pub struct DisplayLayoutManager {
    /// Displays keyed by id
    displays: HashMap<String, DisplayLayout>,

    /// Ratio between physical and rendered pixels
    visual_scale: f64,

    /// Offset centering the bounding box in the arrangement area
    area_offset: Position,

    tuning: LayoutTuning,
}

impl Default for DisplayLayoutManager {
    fn default() -> Self {
        Self::new(LayoutTuning::default())
    }
}

impl DisplayLayoutManager {
    /// Create an empty manager
    pub fn new(tuning: LayoutTuning) -> Self {
        Self {
            displays: HashMap::new(),
            visual_scale: 1.0,
            area_offset: Position::default(),
            tuning,
        }
    }

    /// Add a display, replacing any display with the same id
    pub fn add_display(&mut self, layout: DisplayLayout) {
        trace!(
            "Adding display {} ({}x{} at {},{}), parent '{}'",
            layout.id,
            layout.bounds.width,
            layout.bounds.height,
            layout.bounds.left,
            layout.bounds.top,
            layout.parent_id
        );

        if let Some(previous) = self.displays.insert(layout.id.clone(), layout) {
            debug!("Replaced existing display {}", previous.id);
        }
    }

    /// Display by id
    pub fn display(&self, id: &str) -> Option<&DisplayLayout> {
        self.displays.get(id)
    }

    /// All displays, sorted by id
    pub fn displays(&self) -> Vec<&DisplayLayout> {
        let mut displays: Vec<&DisplayLayout> = self.displays.values().collect();
        displays.sort_by(|a, b| a.id.cmp(&b.id));
        displays
    }

    /// Number of displays
    pub fn len(&self) -> usize {
        self.displays.len()
    }

    /// True when no display was added
    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    /// Current visual scale
    pub fn visual_scale(&self) -> f64 {
        self.visual_scale
    }

    /// Current area offset
    pub fn area_offset(&self) -> Position {
        self.area_offset
    }

    /// Drag tunables
    pub fn tuning(&self) -> LayoutTuning {
        self.tuning
    }

    /// Fit all displays into `area` and create their rendered rectangles
    ///
    /// The scale never exceeds `min_scale` and leaves one display's worth of
    /// margin on each side so there is room to drag around the outside.
    ///
    /// # Returns
    ///
    /// The visual scale, so callers can size labels and overlays to match.
    ///
    /// # Errors
    ///
    /// Fails on an empty manager, zero-area bounds, an unusable scale or area,
    /// or a parent chain that never reaches a primary display.
    pub fn compute_render_area(&mut self, area: AreaSize, min_scale: f64) -> Result<f64> {
        if self.displays.is_empty() {
            return Err(LayoutError::NoDisplays);
        }
        if !(min_scale.is_finite() && min_scale > 0.0) {
            return Err(LayoutError::InvalidScale(min_scale));
        }
        if area.width == 0 {
            return Err(LayoutError::InvalidArea(area.width, area.height));
        }

        let mut left = f64::MAX;
        let mut top = f64::MAX;
        let mut right = f64::MIN;
        let mut bottom = f64::MIN;
        let mut max_width = 0u32;

        for display in self.displays.values() {
            let bounds = &display.bounds;
            if bounds.is_degenerate() {
                return Err(LayoutError::InvalidDimensions {
                    id: display.id.clone(),
                    width: bounds.width,
                    height: bounds.height,
                });
            }

            left = left.min(bounds.left as f64);
            top = top.min(bounds.top as f64);
            right = right.max(bounds.right() as f64);
            bottom = bottom.max(bounds.bottom() as f64);
            max_width = max_width.max(bounds.width);
        }

        // TODO: also fit the bounding box height; tall arrangements can
        // overflow the area vertically.
        let area_width = (right - left) + 2.0 * max_width as f64;
        let scale = min_scale.min(area.width as f64 / area_width);

        let area_offset = Position::new(
            (area.width as f64 / 2.0 - (left + right) * scale / 2.0).floor() as i32,
            (area.height as f64 / 2.0 - (top + bottom) * scale / 2.0).floor() as i32,
        );

        debug!(
            "Render area {}x{}: bounding box {}x{}, scale {:.4}, offset ({}, {})",
            area.width,
            area.height,
            right - left,
            bottom - top,
            scale,
            area_offset.x,
            area_offset.y
        );

        self.visual_scale = scale;
        self.area_offset = area_offset;
        self.rebuild_rects()?;

        Ok(scale)
    }

    /// Re-derive every rendered rectangle from bounds (primaries) and from
    /// layout type and offset (children), then capture the original offsets.
    pub fn rebuild_rects(&mut self) -> Result<()> {
        for display in self.displays.values() {
            if !display.is_primary() && !self.displays.contains_key(&display.parent_id) {
                return Err(LayoutError::Unanchored(display.id.clone()));
            }
        }

        let scale = self.visual_scale;
        let area_offset = self.area_offset;

        let mut pending: Vec<String> = self.displays.keys().cloned().collect();
        pending.sort();
        let mut placed: HashMap<String, RenderedRect> = HashMap::with_capacity(pending.len());

        // Parents are placed before their children; chains settle in passes.
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();

            for id in pending {
                let display = self
                    .displays
                    .get_mut(&id)
                    .ok_or_else(|| LayoutError::UnknownDisplay(id.clone()))?;

                let parent = if display.is_primary() {
                    None
                } else {
                    match placed.get(&display.parent_id) {
                        Some(rect) => Some(*rect),
                        None => {
                            deferred.push(id);
                            continue;
                        }
                    }
                };

                let rect = display.layout_rect_from_bounds(area_offset, scale, parent.as_ref());
                display.capture_original_offset();
                placed.insert(id, rect);
            }

            if deferred.len() == before {
                return Err(LayoutError::Unanchored(deferred[0].clone()));
            }
            pending = deferred;
        }

        Ok(())
    }

    /// Move display `id` toward `candidate` (top-left corner, rendered pixels)
    ///
    /// Snaps to the base's edges, classifies the new center against the base
    /// with the diagonal quadrant rule, corrects the classification when the
    /// display has left the base's extent entirely, stores the result on the
    /// child display and places the rectangle flush against the chosen edge.
    ///
    /// Pointer moves must be fed in arrival order.
    ///
    /// # Returns
    ///
    /// The layout type now stored on the child of the pair.
    pub fn update_position(&mut self, id: &str, candidate: Position) -> Result<LayoutType> {
        let base_id = self.base_id(id)?;
        let base_rect = self.rect_of(&base_id)?;
        let snap_distance = extent(self.tuning.snap_distance_px);

        let display = self
            .displays
            .get_mut(id)
            .ok_or_else(|| LayoutError::UnknownDisplay(id.to_string()))?;
        let rect = display
            .rect()
            .ok_or_else(|| LayoutError::NotRendered(id.to_string()))?;
        let is_primary = display.is_primary();

        let snapped = Position::new(
            display.snap_to_x(candidate.x, &base_rect, snap_distance),
            display.snap_to_y(candidate.y, &base_rect, snap_distance),
        );
        let candidate_rect = rect.moved_to(snapped);

        // Position of the dragged display relative to its base.
        let classified = layout_type_for_position(base_rect.into(), candidate_rect.center())?;
        let relative = correct_for_boundaries(classified, &candidate_rect, &base_rect);
        if relative != classified {
            trace!("Boundary correction for {}: {} -> {}", id, classified, relative);
        }

        display.set_rect_position(snapped, &base_rect, relative);

        // The layout type always describes the child relative to its parent.
        let (child_id, child_type) = if is_primary {
            (base_id, relative.inverted())
        } else {
            (id.to_string(), relative)
        };

        let child = self
            .displays
            .get_mut(&child_id)
            .ok_or_else(|| LayoutError::UnknownDisplay(child_id.clone()))?;
        if child.layout_type != child_type {
            debug!("Display {} now {} of {}", child.id, child_type, child.parent_id);
        }
        child.layout_type = child_type;

        Ok(child_type)
    }

    /// Settle display `id` after a drag
    ///
    /// Keeps the pair edge-adjacent, stores the child's offset in physical
    /// pixels and re-captures the original offset of the dragged display.
    ///
    /// # Returns
    ///
    /// `true` when the dragged display ended up somewhere other than where it
    /// started, i.e. the layout should be committed.
    pub fn finalize_position(&mut self, id: &str) -> Result<bool> {
        let base_id = self.base_id(id)?;
        let base_rect = self.rect_of(&base_id)?;
        let scale = self.visual_scale;
        let min_overlap = extent(self.tuning.min_overlap_px);

        let is_primary = self.display_ref(id)?.is_primary();
        let child_id = if is_primary { base_id } else { id.to_string() };
        let child_type = self.display_ref(&child_id)?.layout_type;
        let relative = if is_primary {
            child_type.inverted()
        } else {
            child_type
        };

        let display = self
            .displays
            .get_mut(id)
            .ok_or_else(|| LayoutError::UnknownDisplay(id.to_string()))?;
        let moved_rect = display
            .adjust_corners(&base_rect, relative, min_overlap)
            .ok_or_else(|| LayoutError::NotRendered(id.to_string()))?;
        let changed = display.has_moved();
        display.capture_original_offset();

        let (child_rect, parent_rect) = if is_primary {
            (base_rect, moved_rect)
        } else {
            (moved_rect, base_rect)
        };
        let offset = calculate_offset(&child_rect, &parent_rect, child_type, scale);

        let child = self
            .displays
            .get_mut(&child_id)
            .ok_or_else(|| LayoutError::UnknownDisplay(child_id.clone()))?;
        child.offset = offset;

        debug!(
            "Finalized {}: {} {} of {} offset {} (changed: {})",
            id, child.id, child.layout_type, child.parent_id, offset, changed
        );

        Ok(changed)
    }

    /// Layout of the child in the pair containing `id`
    pub fn layout_commit(&self, id: &str) -> Result<LayoutCommit> {
        let display = self.display_ref(id)?;
        let child = if display.is_primary() {
            self.display_ref(&self.base_id(id)?)?
        } else {
            display
        };

        Ok(LayoutCommit {
            display_id: child.id.clone(),
            parent_id: child.parent_id.clone(),
            layout_type: child.layout_type,
            offset: child.offset,
        })
    }

    /// Rendered geometry of every display that has a rectangle
    pub fn render_geometry(&self) -> RenderGeometry {
        let rects = self
            .displays
            .values()
            .filter_map(|display| display.rect().map(|rect| (display.id.clone(), rect)))
            .collect();

        RenderGeometry {
            scale: self.visual_scale,
            area_offset: self.area_offset,
            rects,
        }
    }

    /// Display whose rendered rectangle contains `point`
    pub fn display_at(&self, point: Position) -> Option<&DisplayLayout> {
        self.displays()
            .into_iter()
            .find(|display| display.rect().is_some_and(|rect| rect.contains(point)))
    }

    /// Id of the display `id` is positioned against: its parent, or for a
    /// primary display the child attached to it.
    fn base_id(&self, id: &str) -> Result<String> {
        let display = self.display_ref(id)?;

        if !display.is_primary() {
            return if self.displays.contains_key(&display.parent_id) {
                Ok(display.parent_id.clone())
            } else {
                Err(LayoutError::MissingBase(id.to_string()))
            };
        }

        let mut children: Vec<&str> = self
            .displays
            .values()
            .filter(|candidate| candidate.parent_id == id)
            .map(|candidate| candidate.id.as_str())
            .collect();
        children.sort_unstable();

        if children.len() > 1 {
            debug!(
                "Primary {} has {} children, using {} as base",
                id,
                children.len(),
                children[0]
            );
        }

        children
            .first()
            .map(|child| child.to_string())
            .ok_or_else(|| LayoutError::MissingBase(id.to_string()))
    }

    fn display_ref(&self, id: &str) -> Result<&DisplayLayout> {
        self.displays
            .get(id)
            .ok_or_else(|| LayoutError::UnknownDisplay(id.to_string()))
    }

    fn rect_of(&self, id: &str) -> Result<RenderedRect> {
        self.display_ref(id)?
            .rect()
            .ok_or_else(|| LayoutError::NotRendered(id.to_string()))
    }
}

/// Override a side classification when the rectangle has no extent in common
/// with the base along the shared edge: attaching it there would leave no
/// edge contact.
fn correct_for_boundaries(
    layout_type: LayoutType,
    rect: &RenderedRect,
    base: &RenderedRect,
) -> LayoutType {
    if layout_type.is_horizontal() {
        if rect.top > base.bottom() {
            return LayoutType::Bottom;
        }
        if rect.bottom() < base.top {
            return LayoutType::Top;
        }
    } else {
        if rect.left > base.right() {
            return LayoutType::Right;
        }
        if rect.right() < base.left {
            return LayoutType::Left;
        }
    }

    layout_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Bounds;
    use proptest::prelude::*;

    // =========================================================================
    // Fixtures
    // =========================================================================

    /// Primary 1920x1080 with a 1280x720 child on its right, rendered at 0.1.
    ///
    /// Rendered: P = (192, 146, 192x108), S = (384, 146, 128x72).
    fn two_displays() -> DisplayLayoutManager {
        let mut manager = DisplayLayoutManager::default();
        manager.add_display(DisplayLayout::primary("P", "Built-in", Bounds::new(0, 0, 1920, 1080)));
        manager.add_display(DisplayLayout::new(
            "S",
            "External",
            Bounds::new(1920, 0, 1280, 720),
            "P",
            LayoutType::Right,
            0,
        ));

        let scale = manager.compute_render_area(AreaSize::new(704, 400), 1.0).unwrap();
        assert!((scale - 0.1).abs() < 1e-12);
        manager
    }

    fn rect(manager: &DisplayLayoutManager, id: &str) -> RenderedRect {
        manager.display(id).unwrap().rect().unwrap()
    }

    // =========================================================================
    // Render Area
    // =========================================================================

    #[test]
    fn test_render_area_centers_bounding_box() {
        let manager = two_displays();

        assert_eq!(manager.area_offset(), Position::new(192, 146));
        assert_eq!(rect(&manager, "P"), RenderedRect::new(192, 146, 192, 108));
        assert_eq!(rect(&manager, "S"), RenderedRect::new(384, 146, 128, 72));
        assert_eq!(manager.display("S").unwrap().original_offset(), Position::new(384, 146));
    }

    #[test]
    fn test_render_area_caps_scale() {
        let mut manager = DisplayLayoutManager::default();
        manager.add_display(DisplayLayout::primary("P", "Built-in", Bounds::new(0, 0, 100, 100)));

        let scale = manager.compute_render_area(AreaSize::new(4000, 4000), 0.5).unwrap();
        assert_eq!(scale, 0.5);
    }

    #[test]
    fn test_render_area_errors() {
        let mut manager = DisplayLayoutManager::default();
        assert!(matches!(
            manager.compute_render_area(AreaSize::new(640, 320), 1.0),
            Err(LayoutError::NoDisplays)
        ));

        manager.add_display(DisplayLayout::primary("P", "Built-in", Bounds::new(0, 0, 1920, 0)));
        assert!(matches!(
            manager.compute_render_area(AreaSize::new(640, 320), 1.0),
            Err(LayoutError::InvalidDimensions { .. })
        ));

        manager.add_display(DisplayLayout::primary("P", "Built-in", Bounds::new(0, 0, 1920, 1080)));
        assert!(matches!(
            manager.compute_render_area(AreaSize::new(0, 320), 1.0),
            Err(LayoutError::InvalidArea(0, 320))
        ));
        assert!(matches!(
            manager.compute_render_area(AreaSize::new(640, 320), f64::NAN),
            Err(LayoutError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_unanchored_child_rejected() {
        let mut manager = DisplayLayoutManager::default();
        manager.add_display(DisplayLayout::new(
            "A",
            "A",
            Bounds::new(0, 0, 100, 100),
            "B",
            LayoutType::Left,
            0,
        ));
        manager.add_display(DisplayLayout::new(
            "B",
            "B",
            Bounds::new(100, 0, 100, 100),
            "A",
            LayoutType::Right,
            0,
        ));

        assert!(matches!(
            manager.compute_render_area(AreaSize::new(640, 320), 1.0),
            Err(LayoutError::Unanchored(_))
        ));
    }

    #[test]
    fn test_add_display_replaces_duplicate() {
        let mut manager = DisplayLayoutManager::default();
        manager.add_display(DisplayLayout::primary("P", "Old", Bounds::new(0, 0, 100, 100)));
        manager.add_display(DisplayLayout::primary("P", "New", Bounds::new(0, 0, 200, 100)));

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.display("P").unwrap().name, "New");
    }

    // =========================================================================
    // Dragging
    // =========================================================================

    #[test]
    fn test_drag_far_right_is_right() {
        let mut manager = two_displays();
        let layout_type = manager.update_position("S", Position::new(700, 150)).unwrap();

        assert_eq!(layout_type, LayoutType::Right);
        assert_eq!(manager.display("S").unwrap().layout_type, LayoutType::Right);
        // Snapped to the base top and flush against its right edge.
        assert_eq!(rect(&manager, "S"), RenderedRect::new(384, 146, 128, 72));
    }

    #[test]
    fn test_drag_far_below_is_bottom() {
        let mut manager = two_displays();
        let layout_type = manager.update_position("S", Position::new(250, 600)).unwrap();

        assert_eq!(layout_type, LayoutType::Bottom);
        // Right edge snapped to the base right edge, flush below.
        assert_eq!(rect(&manager, "S"), RenderedRect::new(256, 254, 128, 72));
    }

    #[test]
    fn test_drag_above_top_edge_corrected_to_top() {
        let mut manager = two_displays();
        // Center classifies as RIGHT, but the whole display is above the base.
        let layout_type = manager.update_position("S", Position::new(700, 40)).unwrap();

        assert_eq!(layout_type, LayoutType::Top);
        assert_eq!(rect(&manager, "S").top, 146 - 72);
    }

    #[test]
    fn test_drag_primary_inverts_layout_type() {
        let mut manager = two_displays();
        // Move the primary below the child: the child is now on top.
        let layout_type = manager.update_position("P", Position::new(384, 300)).unwrap();

        assert_eq!(layout_type, LayoutType::Top);
        assert_eq!(manager.display("S").unwrap().layout_type, LayoutType::Top);
        assert_eq!(manager.display("P").unwrap().layout_type, LayoutType::Right);
        assert_eq!(rect(&manager, "P"), RenderedRect::new(384, 218, 192, 108));

        assert!(manager.finalize_position("P").unwrap());
        let commit = manager.layout_commit("P").unwrap();
        assert_eq!(
            commit,
            LayoutCommit {
                display_id: "S".to_string(),
                parent_id: "P".to_string(),
                layout_type: LayoutType::Top,
                offset: 0,
            }
        );
    }

    #[test]
    fn test_side_entirely_below_corrected_to_bottom() {
        let mut manager = two_displays();
        let base = rect(&manager, "P");
        let candidate = RenderedRect::new(700, 270, 128, 72);
        assert_eq!(
            layout_type_for_position(base.into(), candidate.center()).unwrap(),
            LayoutType::Right
        );

        let layout_type = manager.update_position("S", candidate.position()).unwrap();
        assert_eq!(layout_type, LayoutType::Bottom);
        assert_eq!(rect(&manager, "S"), RenderedRect::new(700, 254, 128, 72));
    }

    #[test]
    fn test_bottom_entirely_right_corrected_to_right() {
        let mut manager = two_displays();
        let base = rect(&manager, "P");
        let candidate = RenderedRect::new(400, 400, 128, 72);
        assert_eq!(
            layout_type_for_position(base.into(), candidate.center()).unwrap(),
            LayoutType::Bottom
        );

        let layout_type = manager.update_position("S", candidate.position()).unwrap();
        assert_eq!(layout_type, LayoutType::Right);
        assert_eq!(rect(&manager, "S"), RenderedRect::new(384, 400, 128, 72));
    }

    #[test]
    fn test_top_entirely_left_corrected_to_left() {
        let mut manager = two_displays();
        let base = rect(&manager, "P");
        let candidate = RenderedRect::new(0, -100, 128, 72);
        assert_eq!(
            layout_type_for_position(base.into(), candidate.center()).unwrap(),
            LayoutType::Top
        );

        let layout_type = manager.update_position("S", candidate.position()).unwrap();
        assert_eq!(layout_type, LayoutType::Left);
        assert_eq!(rect(&manager, "S"), RenderedRect::new(64, -100, 128, 72));
    }

    #[test]
    fn test_primary_below_child_corrected_then_inverted() {
        let mut manager = two_displays();
        let base = rect(&manager, "S");
        // Left of the child by the diagonals, but entirely below it.
        let candidate = RenderedRect::new(-96, 230, 192, 108);
        assert_eq!(
            layout_type_for_position(base.into(), candidate.center()).unwrap(),
            LayoutType::Left
        );

        let layout_type = manager.update_position("P", candidate.position()).unwrap();

        // Primary corrected to BOTTOM of the child, stored on the child as TOP.
        assert_eq!(layout_type, LayoutType::Top);
        assert_eq!(manager.display("S").unwrap().layout_type, LayoutType::Top);
        assert_eq!(rect(&manager, "P"), RenderedRect::new(-96, 218, 192, 108));
    }

    #[test]
    fn test_drag_to_coordinate_limits() {
        let mut manager = two_displays();

        let layout_type = manager
            .update_position("S", Position::new(i32::MIN, 140))
            .unwrap();
        assert_eq!(layout_type, LayoutType::Left);
        assert_eq!(rect(&manager, "S"), RenderedRect::new(64, 146, 128, 72));

        let layout_type = manager
            .update_position("S", Position::new(i32::MAX, i32::MAX))
            .unwrap();
        assert_eq!(layout_type, LayoutType::Right);
        assert_eq!(rect(&manager, "S").left, 384);

        // Pulled back to a real shared edge on release.
        assert!(manager.finalize_position("S").unwrap());
        assert_eq!(rect(&manager, "S"), RenderedRect::new(384, 249, 128, 72));
        assert_eq!(manager.display("S").unwrap().offset, 1030);
    }

    #[test]
    fn test_unknown_display() {
        let mut manager = two_displays();
        assert!(matches!(
            manager.update_position("X", Position::new(0, 0)),
            Err(LayoutError::UnknownDisplay(_))
        ));
    }

    #[test]
    fn test_lone_primary_has_no_base() {
        let mut manager = DisplayLayoutManager::default();
        manager.add_display(DisplayLayout::primary("P", "Built-in", Bounds::new(0, 0, 1920, 1080)));
        manager.compute_render_area(AreaSize::new(640, 320), 1.0).unwrap();

        assert!(matches!(
            manager.update_position("P", Position::new(0, 0)),
            Err(LayoutError::MissingBase(_))
        ));
        assert!(matches!(manager.finalize_position("P"), Err(LayoutError::MissingBase(_))));
    }

    #[test]
    fn test_update_before_render_fails() {
        let mut manager = DisplayLayoutManager::default();
        manager.add_display(DisplayLayout::primary("P", "Built-in", Bounds::new(0, 0, 1920, 1080)));
        manager.add_display(DisplayLayout::new(
            "S",
            "External",
            Bounds::new(1920, 0, 1280, 720),
            "P",
            LayoutType::Right,
            0,
        ));

        assert!(matches!(
            manager.update_position("S", Position::new(0, 0)),
            Err(LayoutError::NotRendered(_))
        ));
    }

    // =========================================================================
    // Finalize
    // =========================================================================

    #[test]
    fn test_finalize_computes_offset_and_change() {
        let mut manager = two_displays();
        manager.update_position("S", Position::new(250, 600)).unwrap();

        assert!(manager.finalize_position("S").unwrap());
        let display = manager.display("S").unwrap();
        assert_eq!(display.layout_type, LayoutType::Bottom);
        assert_eq!(display.offset, 640);
    }

    #[test]
    fn test_finalize_twice_reports_no_change() {
        let mut manager = two_displays();
        manager.update_position("S", Position::new(250, 600)).unwrap();

        assert!(manager.finalize_position("S").unwrap());
        assert!(!manager.finalize_position("S").unwrap());
    }

    #[test]
    fn test_drag_back_to_start_is_unchanged() {
        let mut manager = two_displays();
        manager.update_position("S", Position::new(700, 150)).unwrap();
        assert!(!manager.finalize_position("S").unwrap());
    }

    #[test]
    fn test_finalize_pulls_corner_contact_into_overlap() {
        let mut manager = two_displays();
        // Right of the base, hanging below it: y snaps to the base bottom.
        manager.update_position("S", Position::new(600, 250)).unwrap();
        assert_eq!(rect(&manager, "S"), RenderedRect::new(384, 254, 128, 72));

        // Touching only at the corner; finalize keeps 5px of shared edge.
        manager.finalize_position("S").unwrap();
        assert_eq!(manager.display("S").unwrap().layout_type, LayoutType::Right);
        assert_eq!(rect(&manager, "S"), RenderedRect::new(384, 249, 128, 72));
        assert_eq!(manager.display("S").unwrap().offset, 1030);
    }

    #[test]
    fn test_round_trip_rebuild_reproduces_rect() {
        let mut manager = two_displays();
        manager.update_position("S", Position::new(250, 600)).unwrap();
        manager.finalize_position("S").unwrap();
        let dragged = rect(&manager, "S");

        manager.rebuild_rects().unwrap();
        let rebuilt = rect(&manager, "S");

        assert!((dragged.left - rebuilt.left).abs() <= 1);
        assert!((dragged.top - rebuilt.top).abs() <= 1);
    }

    #[test]
    fn test_render_geometry_and_hit_test() {
        let manager = two_displays();
        let geometry = manager.render_geometry();

        assert_eq!(geometry.rects.len(), 2);
        assert_eq!(geometry.area_offset, Position::new(192, 146));
        assert_eq!(manager.display_at(Position::new(200, 150)).unwrap().id, "P");
        assert_eq!(manager.display_at(Position::new(400, 150)).unwrap().id, "S");
        assert!(manager.display_at(Position::new(0, 0)).is_none());
    }

    proptest! {
        #[test]
        fn prop_scale_bounded_and_fits(
            primary_w in 320u32..8000,
            primary_h in 240u32..5000,
            child_w in 320u32..8000,
            child_h in 240u32..5000,
            area_w in 100u32..3000,
            min_scale in 0.01f64..2.0,
        ) {
            let mut manager = DisplayLayoutManager::default();
            manager.add_display(DisplayLayout::primary("P", "P", Bounds::new(0, 0, primary_w, primary_h)));
            manager.add_display(DisplayLayout::new(
                "S", "S", Bounds::new(primary_w as i32, 0, child_w, child_h), "P", LayoutType::Right, 0,
            ));

            let scale = manager.compute_render_area(AreaSize::new(area_w, 400), min_scale).unwrap();
            let bbox_width = (primary_w + child_w) as f64;

            prop_assert!(scale <= min_scale);
            prop_assert!(bbox_width <= area_w as f64 / scale + 1e-6);
        }

        #[test]
        fn prop_finalize_idempotent(x in -200i32..900, y in -200i32..700) {
            let mut manager = two_displays();
            manager.update_position("S", Position::new(x, y)).unwrap();
            manager.finalize_position("S").unwrap();
            prop_assert!(!manager.finalize_position("S").unwrap());
        }
    }
}

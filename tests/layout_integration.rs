//! Layout manager integration tests
//!
//! Drives the public manager API the way the arrangement editor does: build
//! displays, compute the render area, drag, finalize, and re-derive the
//! arrangement from the committed layout.

use lamco_display_layout::layout::{
    AreaSize, Bounds, DisplayLayout, DisplayLayoutManager, LayoutError, LayoutTuning, LayoutType,
    Position, RenderedRect,
};
use lamco_display_layout::service::child_bounds;
use proptest::prelude::*;

const PRIMARY: Bounds = Bounds {
    left: 0,
    top: 0,
    width: 1920,
    height: 1080,
};
const AREA: AreaSize = AreaSize {
    width: 704,
    height: 400,
};

/// Primary plus one 1280x720 child placed by `layout_type` and `offset`
fn pair(layout_type: LayoutType, offset: i32) -> DisplayLayoutManager {
    let child = child_bounds(
        &PRIMARY,
        &Bounds::new(0, 0, 1280, 720),
        layout_type,
        offset,
    );

    let mut manager = DisplayLayoutManager::new(LayoutTuning::default());
    manager.add_display(DisplayLayout::primary("P", "Built-in", PRIMARY));
    manager.add_display(DisplayLayout::new("S", "External", child, "P", layout_type, offset));
    manager
}

fn rect(manager: &DisplayLayoutManager, id: &str) -> RenderedRect {
    manager.display(id).and_then(|d| d.rect()).unwrap()
}

/// Child position relative to the primary, rendered pixels
fn relative(manager: &DisplayLayoutManager) -> (i32, i32) {
    let p = rect(manager, "P");
    let s = rect(manager, "S");
    (s.left - p.left, s.top - p.top)
}

#[test]
fn test_far_right_and_far_below() {
    let mut manager = pair(LayoutType::Right, 0);
    manager.compute_render_area(AREA, 1.0).unwrap();

    assert_eq!(
        manager.update_position("S", Position::new(700, 150)).unwrap(),
        LayoutType::Right
    );
    assert_eq!(
        manager.update_position("S", Position::new(250, 600)).unwrap(),
        LayoutType::Bottom
    );

    // Flush against the primary's bottom edge.
    assert_eq!(rect(&manager, "S").top, rect(&manager, "P").bottom());
}

#[test]
fn test_entirely_above_is_top() {
    let mut manager = pair(LayoutType::Right, 0);
    manager.compute_render_area(AREA, 1.0).unwrap();

    let layout_type = manager.update_position("S", Position::new(700, 40)).unwrap();
    assert_eq!(layout_type, LayoutType::Top);
    assert_eq!(rect(&manager, "S").bottom(), rect(&manager, "P").top);
}

#[test]
fn test_three_display_chain() {
    let mut manager = pair(LayoutType::Right, 0);
    manager.add_display(DisplayLayout::new(
        "T",
        "Projector",
        Bounds::new(1920, 720, 1024, 768),
        "S",
        LayoutType::Bottom,
        0,
    ));
    manager.compute_render_area(AREA, 1.0).unwrap();

    let s = rect(&manager, "S");
    let t = rect(&manager, "T");
    assert_eq!(t.left, s.left);
    assert_eq!(t.top, s.bottom());

    // T is dragged against its own parent, not the primary.
    let layout_type = manager
        .update_position("T", Position::new(s.right() + 40, s.top + 5))
        .unwrap();
    assert_eq!(layout_type, LayoutType::Right);
    assert_eq!(rect(&manager, "T").left, s.right());
}

#[test]
fn test_finalize_twice_reports_no_change() {
    let mut manager = pair(LayoutType::Right, 0);
    manager.compute_render_area(AREA, 1.0).unwrap();

    manager.update_position("S", Position::new(250, 600)).unwrap();
    assert!(manager.finalize_position("S").unwrap());
    assert!(!manager.finalize_position("S").unwrap());
}

#[test]
fn test_orphan_display_is_rejected() {
    let mut manager = pair(LayoutType::Right, 0);
    manager.add_display(DisplayLayout::new(
        "X",
        "Detached",
        Bounds::new(5000, 0, 800, 600),
        "missing",
        LayoutType::Right,
        0,
    ));

    assert!(matches!(
        manager.compute_render_area(AREA, 1.0),
        Err(LayoutError::Unanchored(id)) if id == "X"
    ));
}

#[test]
fn test_zero_sized_display_is_rejected() {
    let mut manager = DisplayLayoutManager::default();
    manager.add_display(DisplayLayout::primary("P", "Built-in", Bounds::new(0, 0, 0, 1080)));

    assert!(matches!(
        manager.compute_render_area(AREA, 1.0),
        Err(LayoutError::InvalidDimensions { .. })
    ));
}

proptest! {
    /// A finalized drag, committed and laid out again, lands on the same
    /// rendered position.
    #[test]
    fn prop_committed_offset_round_trips(
        side in prop_oneof![Just(LayoutType::Left), Just(LayoutType::Right)],
        offset in 0i32..300,
        dy in -20i32..20,
    ) {
        let mut manager = pair(side, offset);
        manager.compute_render_area(AREA, 1.0).unwrap();

        let start = rect(&manager, "S");
        let layout_type = manager
            .update_position("S", Position::new(start.left, start.top + dy))
            .unwrap();
        prop_assert_eq!(layout_type, side);
        manager.finalize_position("S").unwrap();

        let commit = manager.layout_commit("S").unwrap();
        let dragged = relative(&manager);

        let mut rebuilt = pair(commit.layout_type, commit.offset);
        rebuilt.compute_render_area(AREA, 1.0).unwrap();
        let replayed = relative(&rebuilt);

        prop_assert!((dragged.0 - replayed.0).abs() <= 1);
        prop_assert!((dragged.1 - replayed.1).abs() <= 1);
    }
}

//! Diagonal Quadrant Classification
//!
//! Decides on which side of a reference rectangle a point lies by splitting
//! the plane along the rectangle's two diagonals, extended infinitely:
//!
//! ```text
//!  \        TOP        /
//!    \               /
//!      ┌───────────┐
//!  LEFT│     ╳     │RIGHT
//!      └───────────┘
//!    /               \
//!  /      BOTTOM       \
//! ```
//!
//! Points exactly on a diagonal fall through the strict comparisons into the
//! `else` branches and therefore resolve toward TOP or LEFT. Callers relying
//! on stable classification keep this tie behavior.

use super::types::{LayoutType, RectF};
use super::{LayoutError, Result};

/// Classify `point` against the diagonals of `rect`
///
/// # Errors
///
/// Returns [`LayoutError::DegenerateRect`] if the rectangle has no area or
/// non-finite extent, since the diagonal slope would be undefined.
pub fn layout_type_for_position(rect: RectF, point: (f64, f64)) -> Result<LayoutType> {
    if !(rect.width > 0.0 && rect.height > 0.0) || !rect.width.is_finite() || !rect.height.is_finite() {
        return Err(LayoutError::DegenerateRect {
            width: rect.width,
            height: rect.height,
        });
    }

    let (x, y) = point;
    let slope = rect.height / rect.width;

    // Descending diagonal through the top-left corner.
    let top_down_intercept = rect.top - rect.left * slope;
    // Ascending diagonal through the bottom-left corner.
    let bottom_up_intercept = rect.top + rect.height + rect.left * slope;

    let below_top_down = y > top_down_intercept + x * slope;
    let below_bottom_up = y > bottom_up_intercept - x * slope;

    let layout_type = if below_top_down {
        if below_bottom_up {
            LayoutType::Bottom
        } else {
            LayoutType::Left
        }
    } else if below_bottom_up {
        LayoutType::Right
    } else {
        LayoutType::Top
    };

    Ok(layout_type)
}

/// Opposite side of `layout_type`
///
/// The enum only has the four sides, so there is no invalid input to reject.
pub fn invert_layout_type(layout_type: LayoutType) -> LayoutType {
    layout_type.inverted()
}

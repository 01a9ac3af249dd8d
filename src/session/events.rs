//! Pointer events and their outcomes

use serde::{Deserialize, Serialize};

use crate::layout::{LayoutCommit, LayoutType};

/// Pointer or touch input, in rendered-area pixels
///
/// Deserializes from `{"type": "start", "x": 10, "y": 20}` style records so
/// drag scripts can be replayed from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DragEvent {
    /// Pointer pressed; starts dragging the display under the pointer
    Start {
        /// Horizontal pointer coordinate
        x: i32,
        /// Vertical pointer coordinate
        y: i32,
    },
    /// Pointer moved while pressed
    Move {
        /// Horizontal pointer coordinate
        x: i32,
        /// Vertical pointer coordinate
        y: i32,
    },
    /// Pointer released
    End,
    /// Drag aborted (escape, focus loss); the layout reverts
    Cancel,
}

/// What handling a [`DragEvent`] did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DragOutcome {
    /// Event did not apply (no display under the pointer, no active drag)
    Ignored,
    /// Drag started on a display
    Started {
        /// Dragged display
        display_id: String,
    },
    /// Dragged display moved
    Moved {
        /// Dragged display
        display_id: String,
        /// Layout type now stored on the child display
        layout_type: LayoutType,
    },
    /// Drag finished; `commit` is set when a new layout was pushed
    Finished {
        /// Dragged display
        display_id: String,
        /// Layout sent to the display service
        commit: Option<LayoutCommit>,
    },
    /// Drag aborted and reverted
    Cancelled {
        /// Display that was being dragged
        display_id: String,
    },
}

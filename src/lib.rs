//! # lamco-display-layout
//!
//! Interactive display arrangement for multi-monitor setups.
//!
//! Displays are drawn as scaled rectangles in a fixed area. Dragging one
//! classifies where it sits relative to its neighbour (left, right, top or
//! bottom), snaps it flush against that edge, and on release computes the
//! offset that is committed back to the platform's display configuration.
//!
//! # Architecture
//!
//! ```text
//! lamco-display-layout
//!   ├─> Layout Manager (scale, rendered rects, quadrant classification, snapping)
//!   ├─> Display Service (async seam to the platform; in-memory snapshot impl)
//!   ├─> Layout Session (pointer events → manager → commits to the service)
//!   └─> CLI (config + snapshot + drag script → JSON report)
//! ```
//!
//! # Data Flow
//!
//! **Open:** Service units/layouts → Manager → render area computed
//!
//! **Drag:** Pointer → Session → `update_position` → layout type + snapped rect
//!
//! **Release:** `finalize_position` → offset → `set_display_layout` → Service

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Tool configuration
pub mod config;

/// Display arrangement geometry
pub mod layout;

/// Platform display configuration seam
pub mod service;

/// Pointer-driven arrangement sessions
pub mod session;

/// Utility functions
pub mod utils;

//! Display Arrangement Session
//!
//! One open arrangement editor: mirrors the service's displays into a
//! [`DisplayLayoutManager`], feeds it pointer events in arrival order and
//! commits the layout back when a drag changed it.
//!
//! ```text
//! DisplayConfigService ──units/layouts──> LayoutSession ──> DisplayLayoutManager
//!          ^                                   │
//!          └──────── set_display_layout ───────┘ (on drag end, if changed)
//! ```
//!
//! Dropping the session discards everything; nothing is persisted except what
//! was committed to the service.

mod events;

pub use events::{DragEvent, DragOutcome};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::layout::{
    infer_layout_from_bounds, AreaSize, DisplayLayout, DisplayLayoutManager, LayoutTuning,
    Position, RenderGeometry,
};
use crate::service::{DisplayConfigService, DisplayLayoutEntry, DisplayUnit, ServiceError};

/// Session parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Arrangement area size, rendered pixels
    pub area: AreaSize,
    /// Upper bound of the visual scale
    pub min_visual_scale: f64,
    /// Drag tunables
    pub tuning: LayoutTuning,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            area: AreaSize::new(640, 320),
            min_visual_scale: 1.0,
            tuning: LayoutTuning::default(),
        }
    }
}

/// Drag in progress
#[derive(Debug)]
struct ActiveDrag {
    display_id: String,
    /// Pointer position minus the rect origin at drag start
    grab: Position,
    /// Manager state to restore on cancel
    before: DisplayLayoutManager,
}

/// An open arrangement editor bound to a display service
pub struct LayoutSession<S: DisplayConfigService> {
    service: Arc<S>,
    options: SessionOptions,
    manager: DisplayLayoutManager,
    drag: Option<ActiveDrag>,
}

impl<S: DisplayConfigService> LayoutSession<S> {
    /// Open a session: fetch displays and compute the render area
    ///
    /// # Errors
    ///
    /// Returns error if the service query fails or the reported topology
    /// cannot be laid out.
    pub async fn open(service: Arc<S>, options: SessionOptions) -> Result<Self> {
        let mut session = Self {
            service,
            options,
            manager: DisplayLayoutManager::new(options.tuning),
            drag: None,
        };

        session.refresh().await?;
        info!(
            "Arrangement session opened with {} displays (scale {:.4})",
            session.manager.len(),
            session.manager.visual_scale()
        );

        Ok(session)
    }

    /// Re-read displays from the service and rebuild the arrangement
    pub async fn refresh(&mut self) -> Result<()> {
        let units = self
            .service
            .display_units()
            .await
            .context("Failed to query display units")?;
        let layouts = self
            .service
            .display_layouts()
            .await
            .context("Failed to query display layouts")?;

        let mut manager = build_manager(&units, &layouts, self.options.tuning)?;
        manager
            .compute_render_area(self.options.area, self.options.min_visual_scale)
            .context("Failed to compute render area")?;

        if self.drag.take().is_some() {
            warn!("Display configuration refreshed during a drag; drag dropped");
        }
        self.manager = manager;
        Ok(())
    }

    /// Handle one pointer event
    ///
    /// Events must be passed in the order they arrived.
    pub async fn handle(&mut self, event: DragEvent) -> Result<DragOutcome> {
        match event {
            DragEvent::Start { x, y } => Ok(self.start_drag(Position::new(x, y))),
            DragEvent::Move { x, y } => self.move_drag(Position::new(x, y)),
            DragEvent::End => self.end_drag().await,
            DragEvent::Cancel => Ok(self.cancel_drag()),
        }
    }

    /// The layout manager backing this session
    pub fn manager(&self) -> &DisplayLayoutManager {
        &self.manager
    }

    /// Geometry for the rendering layer
    pub fn render_geometry(&self) -> RenderGeometry {
        self.manager.render_geometry()
    }

    /// Id of the display being dragged
    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_ref().map(|drag| drag.display_id.as_str())
    }

    fn start_drag(&mut self, pointer: Position) -> DragOutcome {
        let Some(display) = self.manager.display_at(pointer) else {
            debug!("No display at ({}, {})", pointer.x, pointer.y);
            return DragOutcome::Ignored;
        };
        let Some(rect) = display.rect() else {
            return DragOutcome::Ignored;
        };

        let display_id = display.id.clone();
        if let Some(previous) = &self.drag {
            debug!("Drag on {} replaced by new drag", previous.display_id);
        }

        debug!("Drag started on {}", display_id);
        self.drag = Some(ActiveDrag {
            display_id: display_id.clone(),
            grab: pointer - rect.position(),
            before: self.manager.clone(),
        });

        DragOutcome::Started { display_id }
    }

    fn move_drag(&mut self, pointer: Position) -> Result<DragOutcome> {
        let Some(drag) = &self.drag else {
            debug!("Pointer move without an active drag");
            return Ok(DragOutcome::Ignored);
        };

        let layout_type = self
            .manager
            .update_position(&drag.display_id, pointer - drag.grab)
            .with_context(|| format!("Failed to move display {}", drag.display_id))?;

        Ok(DragOutcome::Moved {
            display_id: drag.display_id.clone(),
            layout_type,
        })
    }

    async fn end_drag(&mut self) -> Result<DragOutcome> {
        let Some(drag) = self.drag.take() else {
            debug!("Pointer release without an active drag");
            return Ok(DragOutcome::Ignored);
        };
        let ActiveDrag {
            display_id, before, ..
        } = drag;

        let settled = self
            .manager
            .finalize_position(&display_id)
            .and_then(|changed| Ok((changed, self.manager.layout_commit(&display_id)?)));
        let (changed, commit) = match settled {
            Ok(settled) => settled,
            Err(e) => {
                self.manager = before;
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to finalize display {}", display_id)));
            }
        };
        if !changed {
            debug!("Drag on {} left the layout unchanged", display_id);
            return Ok(DragOutcome::Finished {
                display_id,
                commit: None,
            });
        }

        info!(
            "Committing layout: {} {} of {} offset {}",
            commit.display_id, commit.layout_type, commit.parent_id, commit.offset
        );
        if let Err(e) = self
            .service
            .set_display_layout(vec![DisplayLayoutEntry::from(commit.clone())])
            .await
        {
            warn!("Commit for {} failed, restoring previous layout: {}", display_id, e);
            self.manager = before;
            return Err(anyhow::Error::new(e).context("Failed to commit display layout"));
        }

        // The service may have adjusted the layout; show what it applied.
        self.refresh().await?;

        Ok(DragOutcome::Finished {
            display_id,
            commit: Some(commit),
        })
    }

    fn cancel_drag(&mut self) -> DragOutcome {
        match self.drag.take() {
            Some(drag) => {
                debug!("Drag on {} cancelled", drag.display_id);
                self.manager = drag.before;
                DragOutcome::Cancelled {
                    display_id: drag.display_id,
                }
            }
            None => DragOutcome::Ignored,
        }
    }
}

/// Build a manager from service data
///
/// Displays missing a layout entry are attached to the primary display on the
/// side their bounds suggest.
pub fn build_manager(
    units: &[DisplayUnit],
    layouts: &[DisplayLayoutEntry],
    tuning: LayoutTuning,
) -> std::result::Result<DisplayLayoutManager, ServiceError> {
    let primaries: Vec<&DisplayUnit> = units.iter().filter(|unit| unit.is_primary).collect();
    let [primary] = primaries.as_slice() else {
        return Err(ServiceError::PrimaryCount(primaries.len()));
    };

    let mut manager = DisplayLayoutManager::new(tuning);

    for unit in units {
        if unit.is_primary {
            manager.add_display(DisplayLayout::primary(&unit.id, &unit.name, unit.bounds));
            continue;
        }

        let display = match layouts.iter().find(|entry| entry.id == unit.id) {
            Some(entry) => DisplayLayout::new(
                &unit.id,
                &unit.name,
                unit.bounds,
                &entry.parent_id,
                entry.position,
                entry.offset,
            ),
            None => {
                let (layout_type, offset) = infer_layout_from_bounds(&primary.bounds, &unit.bounds)?;
                warn!(
                    "No layout reported for {}, inferred {} of {}",
                    unit.id, layout_type, primary.id
                );
                DisplayLayout::new(
                    &unit.id,
                    &unit.name,
                    unit.bounds,
                    &primary.id,
                    layout_type,
                    offset,
                )
            }
        };

        manager.add_display(display);
    }

    Ok(manager)
}

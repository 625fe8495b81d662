use super::{
    commit_and_request_envelope, past_threshold, DragPhase, DragStart, ROOM_DRAG_THRESHOLD_PX,
};
use crate::draw::grid_snap;
use crate::envelope::EnvelopeRequest;
use crate::error::Result;
use crate::math::Point2;
use crate::model::{Plan, RoomId};
use crate::snap::{SnapConfig, SnapEngine, SnapResult};

/// Everything a committed room drag hands back to the host.
#[derive(Debug)]
pub struct RoomDragEnd {
    /// The applied snap, when room joining ran.
    pub snap: Option<SnapResult>,
    /// Envelope request to forward to the union collaborator.
    pub envelope: EnvelopeRequest,
}

/// Drags a whole room.
///
/// While live only translation is applied, for cheap per-frame preview; the
/// snap engine's non-preview result runs once at drag end and contributes
/// rotation only for edge-bearing modes.
#[derive(Debug)]
pub struct RoomDrag {
    room: RoomId,
    start: DragStart,
    frozen_position: Point2,
    phase: DragPhase,
    grid_size: Option<f64>,
}

impl RoomDrag {
    /// Arms a room drag at the pointer-down position.
    ///
    /// # Errors
    ///
    /// Fails when the room does not exist.
    pub fn begin(plan: &Plan, room: RoomId, world: Point2, screen: Point2) -> Result<Self> {
        let r = plan.room(room)?;
        Ok(Self {
            room,
            start: DragStart { world, screen },
            frozen_position: r.transform.position,
            phase: DragPhase::Armed,
            grid_size: None,
        })
    }

    /// Enables grid snapping of the room position at the given cell size.
    #[must_use]
    pub fn with_grid(mut self, grid_size: f64) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    /// Current phase of the drag.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Translates the room to follow the pointer. Below the activation
    /// threshold this is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when the room disappeared.
    pub fn update(&mut self, plan: &mut Plan, world: Point2, screen: Point2) -> Result<()> {
        if self.phase == DragPhase::Committed {
            return Ok(());
        }
        if self.phase == DragPhase::Armed {
            if !past_threshold(&self.start, &screen, ROOM_DRAG_THRESHOLD_PX) {
                return Ok(());
            }
            self.phase = DragPhase::Dragging;
        }

        let mut position = self.frozen_position + (world - self.start.world);
        if let Some(grid) = self.grid_size {
            position = grid_snap(position, grid);
        }
        plan.update_room(self.room, |room| {
            room.transform.position = position;
        })
    }

    /// Ends the drag. When joining is enabled the snap engine's committed
    /// result is applied (translation, plus rotation for edge-bearing
    /// modes), then the baseline is persisted and the envelope request
    /// issued. `None` when the interaction never activated.
    ///
    /// # Errors
    ///
    /// Fails when the room disappeared.
    pub fn end(mut self, plan: &mut Plan, config: &SnapConfig) -> Result<Option<RoomDragEnd>> {
        let was_dragging = self.phase == DragPhase::Dragging;
        self.phase = DragPhase::Committed;
        if !was_dragging {
            return Ok(None);
        }

        let snap = if config.enabled {
            let result =
                SnapEngine::new(plan, *config).evaluate(self.room, crate::math::Vector2::zeros(), false)?;
            if result.snapped {
                plan.update_room(self.room, |room| {
                    room.transform.rotation += result.rotation;
                    room.transform.position += result.translation;
                })?;
                plan.reclassify_walls();
            }
            Some(result)
        } else {
            None
        };

        let envelope = commit_and_request_envelope(plan, self.room)?;
        Ok(Some(RoomDragEnd { snap, envelope }))
    }
}

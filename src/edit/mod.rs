//! Interactive drag state machines.
//!
//! One machine per draggable element kind (vertex, edge, wall, aperture,
//! whole room, rotation handle), all sharing the same shape:
//! `armed → dragging → committed`. A pixel-distance activation threshold
//! keeps a plain click from becoming a drag, and every delta during the
//! drag is computed against a snapshot of the room frozen at drag start —
//! never against the live, possibly solver-mutated room — so error cannot
//! compound across frames.
//!
//! Envelope recalculation is deliberately deferred to drag end: the commit
//! persists final geometry and the `original_vertices` baseline first, then
//! hands back the generation-tagged [`EnvelopeRequest`] for the external
//! union. Solver results are generation-tagged the same way; a stale result
//! is dropped instead of overwriting a newer frame.

mod aperture_drag;
mod room_drag;
mod rotate_drag;
mod vertex_drag;

pub use aperture_drag::ApertureDrag;
pub use room_drag::RoomDrag;
pub use rotate_drag::RotateDrag;
pub use vertex_drag::{EdgeDrag, SolveTicket, VertexDrag, WallDrag};

use crate::envelope::EnvelopeRequest;
use crate::error::Result;
use crate::math::distance_2d::point_dist;
use crate::math::Point2;
use crate::model::{Plan, Room, RoomId, Vertex, Wall};
use crate::transform::RoomTransform;

/// Activation threshold for vertex, aperture, and rotation drags.
pub const POINT_DRAG_THRESHOLD_PX: f64 = 3.0;

/// Activation threshold for edge and wall drags.
pub const EDGE_DRAG_THRESHOLD_PX: f64 = 4.0;

/// Activation threshold for whole-room drags.
pub const ROOM_DRAG_THRESHOLD_PX: f64 = 5.0;

/// Lifecycle of one drag interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pointer is down but has not moved past the activation threshold.
    Armed,
    /// Threshold passed; geometry updates on every pointer move.
    Dragging,
    /// Drag ended and the result was committed.
    Committed,
}

/// Where the drag started, in both spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    pub world: Point2,
    pub screen: Point2,
}

/// The room state frozen at drag start.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenRoom {
    pub vertices: Vec<Vertex>,
    pub walls: Vec<Wall>,
    pub transform: RoomTransform,
}

impl FrozenRoom {
    /// Snapshots the parts of a room a drag computes against.
    #[must_use]
    pub fn freeze(room: &Room) -> Self {
        Self {
            vertices: room.vertices.clone(),
            walls: room.walls.clone(),
            transform: room.transform,
        }
    }

    /// Rewinds a room to this snapshot (vertices, walls, transform only).
    fn restore_into(&self, room: &mut Room) {
        room.vertices = self.vertices.clone();
        room.walls = self.walls.clone();
        room.transform = self.transform;
    }
}

/// Returns `true` once the pointer has moved `threshold_px` from where it
/// went down.
#[must_use]
pub(crate) fn past_threshold(start: &DragStart, screen: &Point2, threshold_px: f64) -> bool {
    point_dist(&start.screen, screen) >= threshold_px
}

/// Replaces a room's ring with a candidate computed from a frozen snapshot.
///
/// The room is rewound to the snapshot first so wall matching runs against
/// the frozen walls, then the candidate ring is applied (recenter, wall
/// regeneration, centerline).
pub(crate) fn apply_candidate_ring(
    plan: &mut Plan,
    room_id: RoomId,
    frozen: &FrozenRoom,
    candidate: Vec<Vertex>,
) -> Result<()> {
    plan.update_room(room_id, |room| {
        frozen.restore_into(room);
        room.apply_ring(candidate);
    })
}

/// Shared drag-end path: persist the ring as the new `original_vertices`
/// baseline, then hand back the envelope request — in that order, so the
/// recalculation runs against the committed geometry.
pub(crate) fn commit_and_request_envelope(
    plan: &mut Plan,
    room_id: RoomId,
) -> Result<EnvelopeRequest> {
    plan.update_room(room_id, Room::commit_original)?;
    Ok(plan.begin_envelope_recalc())
}

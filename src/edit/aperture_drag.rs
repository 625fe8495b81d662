use tracing::debug;

use super::{
    commit_and_request_envelope, past_threshold, DragPhase, DragStart, POINT_DRAG_THRESHOLD_PX,
};
use crate::envelope::EnvelopeRequest;
use crate::error::{ModelError, Result};
use crate::math::distance_2d::{point_dist, point_to_segment_dist};
use crate::math::Point2;
use crate::model::{Aperture, ApertureId, Plan, Room, RoomId};

/// Drags a door or window along its wall — or onto a different wall.
///
/// The machine keeps the grab offset between where the user clicked inside
/// the aperture and the aperture's own start, so the opening "sticks" to
/// the pointer as it slides. The stored position is always re-expressed as
/// a distance from whichever wall end is nearer, never as an absolute
/// coordinate.
#[derive(Debug)]
pub struct ApertureDrag {
    room: RoomId,
    aperture: ApertureId,
    start: DragStart,
    grab_offset: f64,
    phase: DragPhase,
}

impl ApertureDrag {
    /// Arms an aperture drag at the pointer-down position.
    ///
    /// # Errors
    ///
    /// Fails when the room, wall, or aperture does not exist.
    pub fn begin(
        plan: &Plan,
        room: RoomId,
        wall: usize,
        aperture: ApertureId,
        world: Point2,
        screen: Point2,
    ) -> Result<Self> {
        let r = plan.room(room)?;
        let (seg_start, seg_end) = wall_segment(r, wall)?;
        let ap = r
            .walls
            .get(wall)
            .and_then(|w| w.apertures.iter().find(|a| a.id == aperture))
            .ok_or_else(|| ModelError::ApertureNotFound(aperture.to_string()))?;

        let length = point_dist(&seg_start, &seg_end);
        let clicked = project_offset(&world, &seg_start, &seg_end);
        let grab_offset = clicked - ap.offset_from_start(length);

        Ok(Self {
            room,
            aperture,
            start: DragStart { world, screen },
            grab_offset,
            phase: DragPhase::Armed,
        })
    }

    /// Current phase of the drag.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Repositions the aperture for a pointer move.
    ///
    /// The wall nearest the pointer becomes the host; the aperture keeps
    /// its grab offset along it and is clamped to fit. Below the activation
    /// threshold this is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when the room or aperture disappeared.
    pub fn update(&mut self, plan: &mut Plan, world: Point2, screen: Point2) -> Result<()> {
        if self.phase == DragPhase::Committed {
            return Ok(());
        }
        if self.phase == DragPhase::Armed {
            if !past_threshold(&self.start, &screen, POINT_DRAG_THRESHOLD_PX) {
                return Ok(());
            }
            self.phase = DragPhase::Dragging;
        }

        let aperture = self.aperture;
        let grab_offset = self.grab_offset;
        let mut missing = false;
        plan.update_room(self.room, |room| {
            let Some(target_wall) = nearest_wall(room, &world) else {
                missing = true;
                return;
            };
            let Some(mut ap) = take_aperture(room, aperture) else {
                missing = true;
                return;
            };

            let (seg_start, seg_end) = match wall_segment(room, target_wall) {
                Ok(seg) => seg,
                Err(_) => {
                    // Put it back untouched rather than losing the record.
                    room.walls[0].apertures.push(ap);
                    missing = true;
                    return;
                }
            };
            let length = point_dist(&seg_start, &seg_end);
            let pointer_offset = project_offset(&world, &seg_start, &seg_end);
            let new_start = (pointer_offset - grab_offset).clamp(0.0, (length - ap.width).max(0.0));
            ap.anchor_from_nearer_end(new_start, length);
            ap.clamp_to_wall(length);
            room.walls[target_wall].apertures.push(ap);
        })?;

        if missing {
            debug!(aperture = %aperture, "aperture vanished mid-drag, frame skipped");
        }
        Ok(())
    }

    /// Ends the drag, committing the baseline and requesting an envelope
    /// recalculation. `None` when the interaction never activated.
    ///
    /// # Errors
    ///
    /// Fails when the room disappeared.
    pub fn end(mut self, plan: &mut Plan) -> Result<Option<EnvelopeRequest>> {
        let was_dragging = self.phase == DragPhase::Dragging;
        self.phase = DragPhase::Committed;
        if !was_dragging {
            return Ok(None);
        }
        Ok(Some(commit_and_request_envelope(plan, self.room)?))
    }
}

/// The wall's world-space edge segment (aperture distances are measured
/// along the polygon edge).
fn wall_segment(room: &Room, wall: usize) -> Result<(Point2, Point2)> {
    let n = room.vertices.len();
    if wall >= n {
        return Err(ModelError::WallIndexOutOfRange {
            index: wall,
            wall_count: n,
        }
        .into());
    }
    let a = room
        .transform
        .local_to_world(&room.vertices[wall].point());
    let b = room
        .transform
        .local_to_world(&room.vertices[(wall + 1) % n].point());
    Ok((a, b))
}

/// Index of the wall whose edge is closest to the pointer.
fn nearest_wall(room: &Room, world: &Point2) -> Option<usize> {
    let n = room.vertices.len();
    let mut best: Option<(f64, usize)> = None;
    for i in 0..n {
        let Ok((a, b)) = wall_segment(room, i) else {
            continue;
        };
        let d = point_to_segment_dist(world, &a, &b);
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, i));
        }
    }
    best.map(|(_, i)| i)
}

/// Removes the aperture from whichever wall currently holds it.
fn take_aperture(room: &mut Room, id: ApertureId) -> Option<Aperture> {
    for wall in &mut room.walls {
        if let Some(pos) = wall.apertures.iter().position(|a| a.id == id) {
            return Some(wall.apertures.remove(pos));
        }
    }
    None
}

/// Distance along `a`→`b` of the pointer's projection, clamped to the
/// segment.
fn project_offset(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len = d.norm();
    if len < crate::math::TOLERANCE {
        return 0.0;
    }
    ((p - a).dot(&d) / len).clamp(0.0, len)
}

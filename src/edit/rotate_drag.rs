use super::{
    commit_and_request_envelope, past_threshold, DragPhase, DragStart, POINT_DRAG_THRESHOLD_PX,
};
use crate::envelope::EnvelopeRequest;
use crate::error::Result;
use crate::math::angle::{normalize_angle, snap_angle};
use crate::math::Point2;
use crate::model::{Plan, RoomId};

/// Angular increment used when rotation snapping is on, in radians (15°).
pub const ROTATION_SNAP_INCREMENT: f64 = std::f64::consts::PI / 12.0;

/// Drags a room's rotation handle.
///
/// The rotation follows the angle from the room centroid to the pointer,
/// optionally snapped to a fixed increment, and is always normalized to
/// `[0, 2π)`.
#[derive(Debug)]
pub struct RotateDrag {
    room: RoomId,
    start: DragStart,
    pivot: Point2,
    frozen_rotation: f64,
    start_pointer_angle: f64,
    snap_increment: Option<f64>,
    phase: DragPhase,
}

impl RotateDrag {
    /// Arms a rotation drag at the pointer-down position.
    ///
    /// # Errors
    ///
    /// Fails when the room does not exist.
    pub fn begin(plan: &Plan, room: RoomId, world: Point2, screen: Point2) -> Result<Self> {
        let r = plan.room(room)?;
        let pivot = r.transform.position;
        Ok(Self {
            room,
            start: DragStart { world, screen },
            pivot,
            frozen_rotation: r.transform.rotation,
            start_pointer_angle: pointer_angle(&pivot, &world),
            snap_increment: None,
            phase: DragPhase::Armed,
        })
    }

    /// Snaps the resulting rotation to [`ROTATION_SNAP_INCREMENT`].
    #[must_use]
    pub fn with_angle_snap(mut self) -> Self {
        self.snap_increment = Some(ROTATION_SNAP_INCREMENT);
        self
    }

    /// Current phase of the drag.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Rotates the room to follow the pointer. Below the activation
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
            if !past_threshold(&self.start, &screen, POINT_DRAG_THRESHOLD_PX) {
                return Ok(());
            }
            self.phase = DragPhase::Dragging;
        }

        let delta = pointer_angle(&self.pivot, &world) - self.start_pointer_angle;
        let raw = self.frozen_rotation + delta;
        let rotation = match self.snap_increment {
            Some(increment) => snap_angle(raw, increment),
            None => normalize_angle(raw),
        };
        plan.update_room(self.room, |room| {
            room.transform.rotation = rotation;
        })
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

fn pointer_angle(pivot: &Point2, world: &Point2) -> f64 {
    (world.y - pivot.y).atan2(world.x - pivot.x)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::model::Room;

    fn square_plan() -> (Plan, RoomId) {
        let mut plan = Plan::new();
        let id = plan.add_room(
            Room::from_ring(
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(400.0, 0.0),
                    Point2::new(400.0, 300.0),
                    Point2::new(0.0, 300.0),
                ],
                15.0,
            )
            .unwrap(),
        );
        (plan, id)
    }

    #[test]
    fn quarter_turn_from_pointer_sweep() {
        let (mut plan, id) = square_plan();
        // Pivot is the room position (200, 150); grab the handle due east.
        let grab = Point2::new(400.0, 150.0);
        let mut drag = RotateDrag::begin(&plan, id, grab, grab).unwrap();

        // Sweep the pointer to due north of the pivot.
        drag.update(&mut plan, Point2::new(200.0, 350.0), Point2::new(200.0, 350.0))
            .unwrap();
        let rotation = plan.room(id).unwrap().transform.rotation;
        assert!((rotation - FRAC_PI_2).abs() < 1e-9, "rotation={rotation}");
    }

    #[test]
    fn rotation_is_normalized() {
        let (mut plan, id) = square_plan();
        let grab = Point2::new(400.0, 150.0);
        let mut drag = RotateDrag::begin(&plan, id, grab, grab).unwrap();

        // Sweep just below the east axis: a small negative angle wraps to
        // just under 2π.
        drag.update(&mut plan, Point2::new(400.0, 140.0), Point2::new(400.0, 140.0))
            .unwrap();
        let rotation = plan.room(id).unwrap().transform.rotation;
        assert!(rotation >= 0.0 && rotation < std::f64::consts::TAU);
        assert!(rotation > 6.0, "rotation={rotation}");
    }

    #[test]
    fn angle_snap_rounds_to_increment() {
        let (mut plan, id) = square_plan();
        let grab = Point2::new(400.0, 150.0);
        let mut drag = RotateDrag::begin(&plan, id, grab, grab)
            .unwrap()
            .with_angle_snap();

        // Pointer at 47° from the pivot: snaps to 45°.
        let target = 47.0_f64.to_radians();
        let world = Point2::new(
            200.0 + 300.0 * target.cos(),
            150.0 + 300.0 * target.sin(),
        );
        drag.update(&mut plan, world, world).unwrap();
        let rotation = plan.room(id).unwrap().transform.rotation;
        assert!(
            (rotation - 45.0_f64.to_radians()).abs() < 1e-9,
            "rotation={rotation}"
        );
    }

    #[test]
    fn end_requests_envelope_only_after_travel() {
        let (mut plan, id) = square_plan();
        let grab = Point2::new(400.0, 150.0);
        let drag = RotateDrag::begin(&plan, id, grab, grab).unwrap();
        assert!(drag.end(&mut plan).unwrap().is_none());

        let mut drag = RotateDrag::begin(&plan, id, grab, grab).unwrap();
        drag.update(&mut plan, Point2::new(200.0, 350.0), Point2::new(200.0, 350.0))
            .unwrap();
        let request = drag.end(&mut plan).unwrap().unwrap();
        assert_eq!(request.generation, plan.generation());
    }
}

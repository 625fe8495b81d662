use crate::error::Result;
use crate::model::{Room, Vertex};

use super::{primitives_to_room, room_to_primitives, ConstraintSolver, Primitive, SolveOptions};

/// Degrees of freedom of a room's vertex graph.
///
/// The first vertex is always implicitly fixed, so the free coordinate
/// count is `(vertex_count - 1) * 2`; each enabled constraint removes one.
/// Negative means over-constrained, positive under-constrained, zero fully
/// constrained.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn calculate_dof(room: &Room) -> i64 {
    let n = room.vertices.len() as i64;
    let k = room.enabled_constraint_count() as i64;
    (n - 1) * 2 - k
}

/// Returns `true` when the room's DOF is exactly zero.
#[must_use]
pub fn is_fully_constrained(room: &Room) -> bool {
    calculate_dof(room) == 0
}

/// Runs the external solver over a room, pinning `fixed_vertex_index`.
///
/// Returns the solved vertex ring plus the solved primitive snapshot (for
/// the room's cache). A no-op passthrough when the room has no enabled
/// constraints: the current ring is returned unchanged and no solver call
/// is made.
///
/// # Errors
///
/// Propagates adapter errors and solver failures; callers degrade to the
/// unsolved geometry.
pub fn solve_room(
    room: &Room,
    solver: &dyn ConstraintSolver,
    fixed_vertex_index: usize,
    options: &SolveOptions,
) -> Result<(Vec<Vertex>, Option<Vec<Primitive>>)> {
    if !room.has_enabled_constraints() {
        return Ok((room.vertices.clone(), None));
    }

    let primitives = room_to_primitives(room, fixed_vertex_index)?;
    let solved = solver.solve(&primitives, options)?;
    let vertices = primitives_to_room(&solved, room);
    Ok((vertices, Some(solved)))
}

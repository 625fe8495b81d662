use std::collections::HashMap;

use tracing::warn;

use crate::error::{Result, SolveError};
use crate::model::{ConstraintTarget, Room, Vertex};

use super::{ConstraintPrimitive, LinePrimitive, PointPrimitive, Primitive};

/// Converts a room into the solver's primitive graph.
///
/// Emits one point per vertex (keyed by vertex ID, with `fixed_vertex_index`
/// marked fixed to prevent global drift), one line per edge (synthetic
/// index-based ID), and one constraint primitive per enabled constraint.
/// ID-targeted constraints resolve directly; index-targeted constraints
/// look up the ID at that index (backward-compatibility path only).
///
/// # Errors
///
/// Returns [`SolveError::UnknownVertex`] when a constraint references a
/// vertex ID not present in the ring, and [`SolveError::EdgeOutOfRange`]
/// for an edge index past the ring.
pub fn room_to_primitives(room: &Room, fixed_vertex_index: usize) -> Result<Vec<Primitive>> {
    let n = room.vertices.len();
    let mut primitives: Vec<Primitive> = Vec::with_capacity(n * 2 + room.constraints.len());

    for (i, v) in room.vertices.iter().enumerate() {
        primitives.push(Primitive::Point(PointPrimitive {
            id: v.id.to_string(),
            x: v.x,
            y: v.y,
            fixed: i == fixed_vertex_index,
        }));
    }

    for i in 0..n {
        let j = (i + 1) % n;
        primitives.push(Primitive::Line(LinePrimitive {
            id: edge_id(i),
            start: room.vertices[i].id.to_string(),
            end: room.vertices[j].id.to_string(),
        }));
    }

    for constraint in room.constraints.iter().filter(|c| c.enabled) {
        let (points, lines) = match &constraint.target {
            ConstraintTarget::Vertices(ids) => {
                let mut points = Vec::with_capacity(ids.len());
                for id in ids {
                    if room.vertex_index(*id).is_none() {
                        return Err(SolveError::UnknownVertex(id.to_string()).into());
                    }
                    points.push(id.to_string());
                }
                (points, Vec::new())
            }
            ConstraintTarget::LegacyIndices(indices) => {
                let mut points = Vec::with_capacity(indices.len());
                for &index in indices {
                    let v = room.vertices.get(index).ok_or_else(|| {
                        SolveError::UnknownVertex(format!("index {index} of {n}"))
                    })?;
                    points.push(v.id.to_string());
                }
                (points, Vec::new())
            }
            ConstraintTarget::Edges(indices) => {
                let mut lines = Vec::with_capacity(indices.len());
                for &index in indices {
                    if index >= n {
                        return Err(SolveError::EdgeOutOfRange {
                            index,
                            edge_count: n,
                        }
                        .into());
                    }
                    lines.push(edge_id(index));
                }
                (Vec::new(), lines)
            }
        };

        primitives.push(Primitive::Constraint(ConstraintPrimitive {
            id: constraint.id.to_string(),
            kind: constraint.kind,
            points,
            lines,
            value: constraint.value,
        }));
    }

    Ok(primitives)
}

/// Joins solved primitives back onto the room's vertex ring.
///
/// Coordinates are re-attached to the original vertex order by ID lookup;
/// a vertex absent from the solved set keeps its pre-solve position, so a
/// partial solver result degrades per point rather than failing. Walls are
/// not regenerated here: vertex IDs (and hence wall `vertex_index`
/// references) are unchanged by solving, only coordinates move.
#[must_use]
pub fn primitives_to_room(primitives: &[Primitive], room: &Room) -> Vec<Vertex> {
    let solved: HashMap<&str, (f64, f64)> = primitives
        .iter()
        .filter_map(|p| match p {
            Primitive::Point(pt) => Some((pt.id.as_str(), (pt.x, pt.y))),
            _ => None,
        })
        .collect();

    room.vertices
        .iter()
        .map(|v| {
            let id = v.id.to_string();
            match solved.get(id.as_str()) {
                Some(&(x, y)) => Vertex::with_id(v.id, x, y),
                None => {
                    warn!(vertex = %v.id, "vertex missing from solved primitives, keeping position");
                    *v
                }
            }
        })
        .collect()
}

fn edge_id(index: usize) -> String {
    format!("edge-{index}")
}

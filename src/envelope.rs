//! Boundary types for the external envelope/union collaborator.
//!
//! Multi-room envelope merging (boolean union across rooms) happens outside
//! this crate. The engine prepares a generation-tagged snapshot of the plan,
//! the collaborator returns per-room merged boundary data, and
//! [`crate::model::Plan::apply_envelope_results`] applies it — or drops it
//! when the plan has mutated since the snapshot.

use serde::{Deserialize, Serialize};

use crate::math::Point2;
use crate::model::{Room, RoomId, Vertex, Wall};

/// Default thickness for interior walls handed to the union, in centimeters.
pub const DEFAULT_INTERIOR_THICKNESS: f64 = 10.0;

/// Default thickness for exterior walls handed to the union, in centimeters.
pub const DEFAULT_EXTERIOR_THICKNESS: f64 = 30.0;

/// Default miter limit for the union's offset joins.
pub const DEFAULT_MITER_LIMIT: f64 = 4.0;

/// Parameters the external union collaborator needs besides the rooms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeSettings {
    pub interior_thickness: f64,
    pub exterior_thickness: f64,
    pub miter_limit: f64,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        Self {
            interior_thickness: DEFAULT_INTERIOR_THICKNESS,
            exterior_thickness: DEFAULT_EXTERIOR_THICKNESS,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }
}

/// A generation-tagged snapshot of the plan for one envelope recalculation.
///
/// The collaborator acts on this snapshot only — never on the live plan —
/// so an in-flight recalculation cannot observe a half-applied edit.
#[derive(Debug, Clone)]
pub struct EnvelopeRequest {
    /// Plan generation at snapshot time; echoed back with the results.
    pub generation: u64,
    pub settings: EnvelopeSettings,
    pub rooms: Vec<(RoomId, Room)>,
}

/// Per-room output of the external union.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeData {
    /// Merged outer boundary in world space.
    pub envelope: Vec<Point2>,
    /// Merged inner boundary in world space.
    pub inner_boundary: Vec<Point2>,
    /// Centerline ring the union worked from, for debug overlays.
    pub debug_centerline: Vec<Point2>,
    /// Contracted ring the union worked from, for debug overlays.
    pub debug_contracted: Vec<Point2>,
    /// Replacement wall records, index-aligned with the room's walls.
    /// Applied only when the lengths match.
    pub walls: Vec<Wall>,
    /// Present when the union inserted vertices at inter-room
    /// intersections; the caller regenerates walls from these and keeps the
    /// prior `original_vertices` so a later separation can restore the
    /// manually-drawn shape.
    pub updated_vertices: Option<Vec<Vertex>>,
}

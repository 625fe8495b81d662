use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::math::Point2;

/// Stable identifier for a vertex, assigned at creation and preserved across
/// all edits. This is the join key used by walls, constraints, and the
/// solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexId(Uuid);

impl VertexId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VertexId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An identified 2D point in room-local coordinates (centimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    /// Creates a vertex with a fresh identifier.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            id: VertexId::new(),
            x,
            y,
        }
    }

    /// Creates a vertex at a point, keeping the given identifier.
    #[must_use]
    pub fn with_id(id: VertexId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Returns the vertex position as a point.
    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Returns a copy moved to the given point, identity preserved.
    #[must_use]
    pub fn moved_to(&self, p: Point2) -> Self {
        Self {
            id: self.id,
            x: p.x,
            y: p.y,
        }
    }
}

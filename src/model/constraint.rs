use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vertex::VertexId;

/// Stable identifier for a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintId(Uuid);

impl ConstraintId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConstraintId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of geometric constraint a user can author on a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Distance,
    Horizontal,
    Vertical,
    Parallel,
    Perpendicular,
    Angle,
    EqualLength,
}

impl ConstraintKind {
    /// Vertex-based kinds reference vertices; edge-based kinds reference
    /// edges by index.
    #[must_use]
    pub fn is_vertex_based(self) -> bool {
        matches!(self, Self::Distance | Self::Horizontal | Self::Vertical)
    }
}

/// What a constraint applies to.
///
/// Vertices are addressed by stable ID; `LegacyIndices` is the
/// backward-compatibility path for data authored before IDs existed. Edges
/// stay index-addressed: edge count always equals vertex count and both
/// shift together on insertion/deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintTarget {
    Vertices(Vec<VertexId>),
    LegacyIndices(Vec<usize>),
    Edges(Vec<usize>),
}

/// A user-authored geometric constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: ConstraintId,
    pub kind: ConstraintKind,
    pub target: ConstraintTarget,
    /// Distance in centimeters or angle in radians, where the kind needs one.
    pub value: Option<f64>,
    pub enabled: bool,
}

impl Constraint {
    /// A fixed distance between two vertices.
    #[must_use]
    pub fn distance(a: VertexId, b: VertexId, value: f64) -> Self {
        Self {
            id: ConstraintId::new(),
            kind: ConstraintKind::Distance,
            target: ConstraintTarget::Vertices(vec![a, b]),
            value: Some(value),
            enabled: true,
        }
    }

    /// Two vertices share the same y coordinate.
    #[must_use]
    pub fn horizontal(a: VertexId, b: VertexId) -> Self {
        Self {
            id: ConstraintId::new(),
            kind: ConstraintKind::Horizontal,
            target: ConstraintTarget::Vertices(vec![a, b]),
            value: None,
            enabled: true,
        }
    }

    /// Two vertices share the same x coordinate.
    #[must_use]
    pub fn vertical(a: VertexId, b: VertexId) -> Self {
        Self {
            id: ConstraintId::new(),
            kind: ConstraintKind::Vertical,
            target: ConstraintTarget::Vertices(vec![a, b]),
            value: None,
            enabled: true,
        }
    }

    /// Two edges stay parallel.
    #[must_use]
    pub fn parallel(edge_a: usize, edge_b: usize) -> Self {
        Self {
            id: ConstraintId::new(),
            kind: ConstraintKind::Parallel,
            target: ConstraintTarget::Edges(vec![edge_a, edge_b]),
            value: None,
            enabled: true,
        }
    }

    /// Two edges stay perpendicular.
    #[must_use]
    pub fn perpendicular(edge_a: usize, edge_b: usize) -> Self {
        Self {
            id: ConstraintId::new(),
            kind: ConstraintKind::Perpendicular,
            target: ConstraintTarget::Edges(vec![edge_a, edge_b]),
            value: None,
            enabled: true,
        }
    }

    /// A fixed angle between two edges, in radians.
    #[must_use]
    pub fn angle(edge_a: usize, edge_b: usize, radians: f64) -> Self {
        Self {
            id: ConstraintId::new(),
            kind: ConstraintKind::Angle,
            target: ConstraintTarget::Edges(vec![edge_a, edge_b]),
            value: Some(radians),
            enabled: true,
        }
    }

    /// Two edges keep equal length.
    #[must_use]
    pub fn equal_length(edge_a: usize, edge_b: usize) -> Self {
        Self {
            id: ConstraintId::new(),
            kind: ConstraintKind::EqualLength,
            target: ConstraintTarget::Edges(vec![edge_a, edge_b]),
            value: None,
            enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_addressing_split() {
        assert!(ConstraintKind::Distance.is_vertex_based());
        assert!(ConstraintKind::Horizontal.is_vertex_based());
        assert!(!ConstraintKind::Parallel.is_vertex_based());
        assert!(!ConstraintKind::EqualLength.is_vertex_based());
    }

    #[test]
    fn constructors_enable_by_default() {
        let a = VertexId::new();
        let b = VertexId::new();
        let c = Constraint::distance(a, b, 120.0);
        assert!(c.enabled);
        assert_eq!(c.target, ConstraintTarget::Vertices(vec![a, b]));
        assert_eq!(c.value, Some(120.0));
    }
}

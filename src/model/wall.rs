use serde::{Deserialize, Serialize};

use super::aperture::Aperture;
use crate::math::{Point2, Vector2};

/// Default wall thickness in centimeters.
pub const DEFAULT_WALL_THICKNESS: f64 = 15.0;

/// Default wall height in centimeters.
pub const DEFAULT_WALL_HEIGHT: f64 = 270.0;

/// Classification of a wall, driving rendering color and snap heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallType {
    Exterior,
    NeighborSameBlock,
    NeighborOtherBlock,
    InteriorDivision,
    InteriorStructural,
    InteriorPartition,
    TerrainContact,
    Adiabatic,
}

impl WallType {
    /// Returns `true` for walls between two heated rooms of the same plan.
    #[must_use]
    pub fn is_interior(self) -> bool {
        matches!(
            self,
            Self::InteriorDivision | Self::InteriorStructural | Self::InteriorPartition
        )
    }
}

/// The mitered quad generated for one polygon edge.
///
/// `start_corner` and `end_corner` are the outer-corner intersections with
/// the neighboring walls, recomputed whenever the polygon changes. The wall
/// for edge `i` runs from `vertices[i]` to `vertices[(i + 1) % n]` and
/// `vertex_index == i` under normal operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub vertex_index: usize,
    pub thickness: f64,
    pub wall_type: WallType,
    pub height: f64,
    pub apertures: Vec<Aperture>,
    /// Outward unit normal of the edge.
    pub normal: Vector2,
    pub start_corner: Point2,
    pub end_corner: Point2,
}

impl Wall {
    /// Creates a wall with default type, height, and no apertures.
    #[must_use]
    pub fn new(vertex_index: usize, thickness: f64) -> Self {
        Self {
            vertex_index,
            thickness,
            wall_type: WallType::InteriorDivision,
            height: DEFAULT_WALL_HEIGHT,
            apertures: Vec::new(),
            normal: Vector2::zeros(),
            start_corner: Point2::origin(),
            end_corner: Point2::origin(),
        }
    }
}

mod door;
mod engine;

pub use door::{door_centers_on_segment, DoorCenter};
pub use engine::SnapEngine;

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};
use crate::model::RoomId;

/// Snap thresholds and toggles for room joining.
///
/// The defaults are the tuned values carried over from production use; they
/// have no documented derivation, so they are kept configurable rather than
/// re-derived. Distances are world centimeters (the interaction layer
/// converts pixel thresholds through the viewport before calling in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Maximum segment-to-segment distance for an edge pair to qualify.
    pub edge_threshold: f64,
    /// Maximum endpoint distance for a vertex pair to qualify (tighter than
    /// the edge threshold).
    pub vertex_threshold: f64,
    /// How far from 180° two wall directions may be and still count as
    /// opposite, in radians.
    pub opposite_angle_tolerance: f64,
    /// Maximum distance between two door centers for a door-to-door snap.
    pub door_threshold: f64,
    /// Master toggle for room joining at drag end.
    pub enabled: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 50.0,
            vertex_threshold: 30.0,
            opposite_angle_tolerance: 10.0_f64.to_radians(),
            door_threshold: 40.0,
            enabled: true,
        }
    }
}

/// How two rooms align during joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapMode {
    /// Opposite walls and a close vertex pair: rotate to align the edges,
    /// then translate the closest endpoints together.
    EdgeVertex,
    /// Opposite walls but no close vertex: rotate to align, then translate
    /// the rotated midpoint onto the stationary line.
    EdgeOnly,
    /// No qualifying edge, but a close vertex pair: translate only.
    VertexOnly,
    /// Nothing within threshold.
    None,
}

/// Raw closest-pair geometry for UI preview, produced in visualize-only
/// evaluations instead of a commit transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPreview {
    pub moving_edge: usize,
    pub stationary_room: RoomId,
    pub stationary_edge: usize,
    pub moving_segment: (Point2, Point2),
    pub stationary_segment: (Point2, Point2),
    /// Closest endpoint pair, present when within the vertex threshold.
    pub vertex_pair: Option<(Point2, Point2)>,
}

/// Diagnostic data from one snap evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapDebugInfo {
    pub pairs_evaluated: usize,
    pub best_score: f64,
    pub best_segment_distance: f64,
    pub best_vertex_distance: f64,
}

/// Outcome of a snap evaluation for a moving room.
///
/// Applying a committed result means
/// `rotation += result.rotation; position += offset + result.translation`
/// on the moving room's transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Rotation delta in radians, zero for vertex-only snaps.
    pub rotation: f64,
    /// Translation correction beyond the proposed offset.
    pub translation: Vector2,
    pub snapped: bool,
    pub mode: SnapMode,
    /// `true` when door centers were substituted for wall endpoints.
    pub is_door_snap: bool,
    pub moving_room: RoomId,
    pub stationary_room: Option<RoomId>,
    /// Present only for visualize-only evaluations.
    pub preview: Option<SnapPreview>,
    pub debug: SnapDebugInfo,
}

impl SnapResult {
    /// A non-snapping result.
    #[must_use]
    pub fn none(moving_room: RoomId, debug: SnapDebugInfo) -> Self {
        Self {
            rotation: 0.0,
            translation: Vector2::zeros(),
            snapped: false,
            mode: SnapMode::None,
            is_door_snap: false,
            moving_room,
            stationary_room: None,
            preview: None,
            debug,
        }
    }
}

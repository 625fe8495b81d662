use crate::math::distance_2d::point_dist;
use crate::math::Point2;
use crate::model::{Room, WallType};

/// Tolerance for treating two rooms' edges as the same wall, in centimeters.
pub const SHARED_EDGE_TOLERANCE: f64 = 5.0;

/// Reclassifies a room's walls after rooms have been joined.
///
/// Wall `i`'s world-space centerline segment is compared against every other
/// room's centerline segments (either direction). A match marks the wall as
/// shared and relabels it [`WallType::InteriorDivision`]; everything else
/// becomes [`WallType::Exterior`]. Walls the user already set to a
/// non-default type other than exterior/interior-division are left alone.
///
/// Returns the new wall type per wall, index-aligned with `room.walls`.
#[must_use]
pub fn classify_wall_types(room: &Room, others: &[&Room]) -> Vec<WallType> {
    let segments = room.world_centerline_segments();
    let other_segments: Vec<(Point2, Point2)> = others
        .iter()
        .flat_map(|r| r.world_centerline_segments())
        .collect();

    room.walls
        .iter()
        .zip(segments.iter())
        .map(|(wall, seg)| {
            if !matches!(
                wall.wall_type,
                WallType::Exterior | WallType::InteriorDivision
            ) {
                return wall.wall_type;
            }
            let shared = other_segments
                .iter()
                .any(|other| edges_match(seg, other, SHARED_EDGE_TOLERANCE));
            if shared {
                WallType::InteriorDivision
            } else {
                WallType::Exterior
            }
        })
        .collect()
}

/// Two edges match when their endpoints coincide within tolerance, in
/// either direction.
fn edges_match(a: &(Point2, Point2), b: &(Point2, Point2), tolerance: f64) -> bool {
    let forward = point_dist(&a.0, &b.0) < tolerance && point_dist(&a.1, &b.1) < tolerance;
    let reverse = point_dist(&a.0, &b.1) < tolerance && point_dist(&a.1, &b.0) < tolerance;
    forward || reverse
}

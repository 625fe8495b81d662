use serde::{Deserialize, Serialize};

use crate::math::distance_2d::point_dist;
use crate::math::Point2;
use crate::model::{ApertureId, ApertureKind, Wall};

/// A door's center point projected onto its wall's centerline segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorCenter {
    pub aperture: ApertureId,
    pub point: Point2,
}

/// Locates the centers of all doors on a wall, measured along the wall's
/// world-space centerline segment.
///
/// Aperture positions are stored as a distance from a named wall end, so
/// the center is resolved against the segment's length and direction. A
/// degenerate (zero-length) segment yields no centers.
#[must_use]
pub fn door_centers_on_segment(wall: &Wall, segment: &(Point2, Point2)) -> Vec<DoorCenter> {
    let length = point_dist(&segment.0, &segment.1);
    if length < crate::math::TOLERANCE {
        return Vec::new();
    }
    let dir = (segment.1 - segment.0) / length;

    wall.apertures
        .iter()
        .filter(|a| a.kind == ApertureKind::Door)
        .map(|a| {
            let center = a.center_from_start(length).clamp(0.0, length);
            DoorCenter {
                aperture: a.id,
                point: segment.0 + dir * center,
            }
        })
        .collect()
}

/// Finds the closest moving-door/stationary-door pair within `threshold`.
///
/// Returns the pair's center points, moving first. Door pairing always
/// takes priority over plain vertex pairing when both are candidates.
#[must_use]
pub fn closest_door_pair(
    moving: &[DoorCenter],
    stationary: &[DoorCenter],
    threshold: f64,
) -> Option<(DoorCenter, DoorCenter)> {
    let mut best: Option<(f64, DoorCenter, DoorCenter)> = None;
    for m in moving {
        for s in stationary {
            let d = point_dist(&m.point, &s.point);
            if d <= threshold && best.as_ref().is_none_or(|(bd, _, _)| d < *bd) {
                best = Some((d, *m, *s));
            }
        }
    }
    best.map(|(_, m, s)| (m, s))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AnchorEnd, Aperture, Wall};

    fn wall_with_door(distance: f64, width: f64, anchor: AnchorEnd) -> Wall {
        let mut wall = Wall::new(0, 15.0);
        let mut door = Aperture::new(ApertureKind::Door, width, distance);
        door.anchor = anchor;
        wall.apertures.push(door);
        wall
    }

    #[test]
    fn center_from_start_anchor() {
        let wall = wall_with_door(40.0, 80.0, AnchorEnd::Start);
        let segment = (Point2::new(0.0, 0.0), Point2::new(400.0, 0.0));
        let centers = door_centers_on_segment(&wall, &segment);
        assert_eq!(centers.len(), 1);
        assert!((centers[0].point.x - 80.0).abs() < 1e-9, "{:?}", centers[0]);
        assert!((centers[0].point.y).abs() < 1e-9);
    }

    #[test]
    fn center_from_end_anchor() {
        let wall = wall_with_door(40.0, 80.0, AnchorEnd::End);
        let segment = (Point2::new(0.0, 0.0), Point2::new(400.0, 0.0));
        let centers = door_centers_on_segment(&wall, &segment);
        // Near edge at 400 - 40 - 80 = 280, center at 320.
        assert!((centers[0].point.x - 320.0).abs() < 1e-9, "{:?}", centers[0]);
    }

    #[test]
    fn windows_are_ignored() {
        let mut wall = Wall::new(0, 15.0);
        wall.apertures
            .push(Aperture::new(ApertureKind::Window, 60.0, 10.0));
        let segment = (Point2::new(0.0, 0.0), Point2::new(400.0, 0.0));
        assert!(door_centers_on_segment(&wall, &segment).is_empty());
    }

    #[test]
    fn degenerate_segment_yields_nothing() {
        let wall = wall_with_door(40.0, 80.0, AnchorEnd::Start);
        let p = Point2::new(5.0, 5.0);
        assert!(door_centers_on_segment(&wall, &(p, p)).is_empty());
    }

    #[test]
    fn closest_pair_picks_minimum_within_threshold() {
        let m = [
            DoorCenter {
                aperture: ApertureId::new(),
                point: Point2::new(0.0, 0.0),
            },
            DoorCenter {
                aperture: ApertureId::new(),
                point: Point2::new(100.0, 0.0),
            },
        ];
        let s = [
            DoorCenter {
                aperture: ApertureId::new(),
                point: Point2::new(105.0, 0.0),
            },
            DoorCenter {
                aperture: ApertureId::new(),
                point: Point2::new(300.0, 0.0),
            },
        ];
        let (dm, ds) = closest_door_pair(&m, &s, 40.0).unwrap();
        assert!((dm.point.x - 100.0).abs() < 1e-9);
        assert!((ds.point.x - 105.0).abs() < 1e-9);
    }

    #[test]
    fn no_pair_outside_threshold() {
        let m = [DoorCenter {
            aperture: ApertureId::new(),
            point: Point2::new(0.0, 0.0),
        }];
        let s = [DoorCenter {
            aperture: ApertureId::new(),
            point: Point2::new(100.0, 0.0),
        }];
        assert!(closest_door_pair(&m, &s, 40.0).is_none());
    }
}

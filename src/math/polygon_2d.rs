use super::intersect_2d::segment_segment_intersect_2d;
use super::{Point2, Vector2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if the polygon winds counter-clockwise.
#[must_use]
pub fn is_ccw(points: &[Point2]) -> bool {
    signed_area_2d(points) > 0.0
}

/// Returns the polygon in counter-clockwise order, reversing if needed.
///
/// Idempotent: an already-CCW ring is returned unchanged.
#[must_use]
pub fn ensure_ccw(points: &[Point2]) -> Vec<Point2> {
    if points.len() >= 3 && !is_ccw(points) {
        points.iter().rev().copied().collect()
    } else {
        points.to_vec()
    }
}

/// Returns the centroid of a vertex ring (arithmetic mean of the vertices).
#[must_use]
pub fn centroid_2d(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    let mut sum = Vector2::zeros();
    for p in points {
        sum += p.coords;
    }
    #[allow(clippy::cast_precision_loss)]
    Point2::from(sum / points.len() as f64)
}

/// Recenters a vertex ring around its centroid.
///
/// Returns the centered points and the centroid offset that was removed.
/// Idempotent: recentering an already-centered ring yields a zero offset.
#[must_use]
pub fn recenter(points: &[Point2]) -> (Vec<Point2>, Vector2) {
    let offset = centroid_2d(points).coords;
    let centered = points
        .iter()
        .map(|p| Point2::from(p.coords - offset))
        .collect();
    (centered, offset)
}

/// Tests whether a closed polygon ring self-intersects.
///
/// Checks every pair of non-adjacent edges; a shared endpoint between
/// adjacent edges is not an intersection.
#[must_use]
pub fn is_self_intersecting(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let a0 = &points[i];
        let a1 = &points[(i + 1) % n];
        for j in (i + 1)..n {
            // Skip adjacent edges (including the wrap-around pair).
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let b0 = &points[j];
            let b1 = &points[(j + 1) % n];
            if segment_segment_intersect_2d(a0, a1, b0, b1).is_some() {
                return true;
            }
        }
    }
    false
}

/// Returns the normalized direction of the edge `a`→`b`, or `None` for a
/// zero-length edge.
#[must_use]
pub fn edge_direction(a: &Point2, b: &Point2) -> Option<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return None;
    }
    Some(d / len)
}

/// Returns the outward normal of a CCW polygon edge with direction `dir`
/// (the right-hand normal).
#[must_use]
pub fn outward_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(dir.y, -dir.x)
}

use super::Point2;

/// Returns the Euclidean distance between two points.
#[must_use]
pub fn point_dist(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Returns the minimum distance from point `p` to the segment `a`→`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return point_dist(p, a);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);

    point_dist(p, &Point2::new(a.x + t * d.x, a.y + t * d.y))
}

/// Returns the minimum distance between two segments `a0`→`a1` and `b0`→`b1`.
///
/// Computed as the minimum of the four point-to-segment distances; exact for
/// non-crossing segments, which is the only case the snap engine scores
/// (crossing segments are already overlapping and score maximally close).
#[must_use]
pub fn segment_segment_dist(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> f64 {
    let d0 = point_to_segment_dist(a0, b0, b1);
    let d1 = point_to_segment_dist(a1, b0, b1);
    let d2 = point_to_segment_dist(b0, a0, a1);
    let d3 = point_to_segment_dist(b1, a0, a1);
    d0.min(d1).min(d2).min(d3)
}

/// Returns the closest pair among the four endpoint combinations of two
/// segments: `(distance, index_on_a, index_on_b)` where indices are 0 for
/// the start point and 1 for the end point.
#[must_use]
pub fn closest_endpoint_pair(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> (f64, usize, usize) {
    let mut best = (point_dist(a0, b0), 0, 0);
    for (d, ia, ib) in [
        (point_dist(a0, b1), 0, 1),
        (point_dist(a1, b0), 1, 0),
        (point_dist(a1, b1), 1, 1),
    ] {
        if d < best.0 {
            best = (d, ia, ib);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    // ── point_to_segment_dist tests ──

    #[test]
    fn segment_dist_perpendicular_projection() {
        // Point (1, 1) to segment (0,0)→(2,0). Closest at (1,0), dist = 1.
        let d = point_to_segment_dist(
            &Point2::new(1.0, 1.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_endpoint_closest() {
        // Point (-1, 0) to segment (0,0)→(2,0). Closest at (0,0), dist = 1.
        let d = point_to_segment_dist(
            &Point2::new(-1.0, 0.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        // Zero-length segment: distance is point-to-point.
        let d = point_to_segment_dist(
            &Point2::new(3.0, 4.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(0.0, 0.0),
        );
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    // ── segment_segment_dist tests ──

    #[test]
    fn parallel_segments_gap() {
        // Two horizontal segments 1 apart.
        let d = segment_segment_dist(
            &Point2::new(0.0, 0.0),
            &Point2::new(4.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(4.0, 1.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn touching_segments_zero() {
        let d = segment_segment_dist(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(2.0, 2.0),
        );
        assert!(d.abs() < TOL, "d={d}");
    }

    #[test]
    fn offset_collinear_segments() {
        // Collinear with a 3-unit gap.
        let d = segment_segment_dist(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(4.0, 0.0),
            &Point2::new(6.0, 0.0),
        );
        assert!((d - 3.0).abs() < TOL, "d={d}");
    }

    // ── closest_endpoint_pair tests ──

    #[test]
    fn endpoint_pair_picks_minimum() {
        let (d, ia, ib) = closest_endpoint_pair(
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(11.0, 0.0),
            &Point2::new(20.0, 0.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");
        assert_eq!((ia, ib), (1, 0));
    }
}

use serde::{Deserialize, Serialize};

use crate::math::intersect_2d::line_intersection_point;
use crate::math::polygon_2d::{edge_direction, outward_normal};
use crate::math::Point2;
use crate::model::{Vertex, VertexId, Wall};

/// Vertex IDs bounding one centerline segment.
///
/// Always derived from the room's vertex ring (never from any denormalized
/// assembly list) so that centerline segment `i` corresponds 1:1 to
/// `walls[i]` — the snap engine relies on this to map segments back to
/// walls and their apertures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeVertexIds {
    pub start_vertex_id: VertexId,
    pub end_vertex_id: VertexId,
}

/// The room polygon offset outward by half the wall thickness per edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centerline {
    /// Ring of centerline corners, index-aligned with the room's vertices.
    pub vertices: Vec<Point2>,
    /// Per-segment vertex IDs, index-aligned with the room's walls.
    pub edge_metadata: Vec<EdgeVertexIds>,
}

impl Centerline {
    /// Computes the centerline ring for a vertex ring and its walls.
    ///
    /// Each edge is offset outward by half its wall's thickness; consecutive
    /// offset lines are intersected to form the ring corners. A zero-length
    /// edge contributes no direction of its own (the neighbor's line is
    /// reused); a failed intersection falls back to the midpoint of the two
    /// adjacent offset endpoints.
    #[must_use]
    pub fn compute(vertices: &[Vertex], walls: &[Wall]) -> Self {
        let n = vertices.len();
        if n < 3 || walls.len() != n {
            return Self {
                vertices: Vec::new(),
                edge_metadata: Vec::new(),
            };
        }

        // Offset segment per edge: endpoints pushed out by half thickness.
        let offsets: Vec<Option<(Point2, Point2)>> = (0..n)
            .map(|i| {
                let a = vertices[i].point();
                let b = vertices[(i + 1) % n].point();
                let dir = edge_direction(&a, &b)?;
                let half = walls[i].thickness / 2.0;
                let normal = outward_normal(&dir);
                Some((a + normal * half, b + normal * half))
            })
            .collect();

        let ring: Vec<Point2> = (0..n)
            .map(|i| {
                let prev = (i + n - 1) % n;
                corner(offsets[prev].as_ref(), offsets[i].as_ref(), &vertices[i].point())
            })
            .collect();

        let edge_metadata = (0..n)
            .map(|i| EdgeVertexIds {
                start_vertex_id: vertices[i].id,
                end_vertex_id: vertices[(i + 1) % n].id,
            })
            .collect();

        Self {
            vertices: ring,
            edge_metadata,
        }
    }

    /// Returns the centerline segments as point pairs, one per wall.
    #[must_use]
    pub fn segments(&self) -> Vec<(Point2, Point2)> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| (self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }
}

/// Ring corner at a shared vertex: intersection of the incoming and
/// outgoing offset lines.
fn corner(
    incoming: Option<&(Point2, Point2)>,
    outgoing: Option<&(Point2, Point2)>,
    vertex: &Point2,
) -> Point2 {
    match (incoming, outgoing) {
        (Some(inc), Some(out)) => {
            line_intersection_point(&inc.0, &(inc.1 - inc.0), &out.0, &(out.1 - out.0))
                .unwrap_or_else(|| Point2::from((inc.1.coords + out.0.coords) / 2.0))
        }
        (Some(inc), None) => inc.1,
        (None, Some(out)) => out.0,
        (None, None) => *vertex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walls::WallGenerator;

    fn ring(points: &[(f64, f64)]) -> Vec<Vertex> {
        points.iter().map(|&(x, y)| Vertex::new(x, y)).collect()
    }

    #[test]
    fn square_centerline_offsets_by_half_thickness() {
        let verts = ring(&[(0.0, 0.0), (400.0, 0.0), (400.0, 300.0), (0.0, 300.0)]);
        let walls = WallGenerator::new(&verts, 15.0).execute();
        let cl = Centerline::compute(&verts, &walls);

        assert_eq!(cl.vertices.len(), 4);
        // Corner at (0,0) pushes out to (-7.5, -7.5), etc.
        assert!((cl.vertices[0].x + 7.5).abs() < 1e-9, "{:?}", cl.vertices[0]);
        assert!((cl.vertices[0].y + 7.5).abs() < 1e-9);
        assert!((cl.vertices[2].x - 407.5).abs() < 1e-9);
        assert!((cl.vertices[2].y - 307.5).abs() < 1e-9);
    }

    #[test]
    fn convex_polygon_edges_offset_exactly_half() {
        // Every centerline segment of a convex ring lies exactly t/2 from
        // its source edge, measured along the outward normal.
        let verts = ring(&[(0.0, 0.0), (500.0, 40.0), (430.0, 380.0), (-60.0, 300.0)]);
        let t = 12.0;
        let walls = WallGenerator::new(&verts, t).execute();
        let cl = Centerline::compute(&verts, &walls);
        let n = verts.len();
        for i in 0..n {
            let a = verts[i].point();
            let b = verts[(i + 1) % n].point();
            let d = b - a;
            let len = d.norm();
            for p in [&cl.vertices[i], &cl.vertices[(i + 1) % n]] {
                // Signed distance from the source line; outward is positive.
                let signed = ((p - a).x * d.y - (p - a).y * d.x) / len;
                assert!((signed - t / 2.0).abs() < 1e-9, "edge {i}: {signed}");
            }
        }
    }

    #[test]
    fn metadata_tracks_ring_vertex_ids() {
        let verts = ring(&[(0.0, 0.0), (400.0, 0.0), (400.0, 300.0), (0.0, 300.0)]);
        let walls = WallGenerator::new(&verts, 15.0).execute();
        let cl = Centerline::compute(&verts, &walls);

        assert_eq!(cl.edge_metadata.len(), 4);
        for (i, meta) in cl.edge_metadata.iter().enumerate() {
            assert_eq!(meta.start_vertex_id, verts[i].id);
            assert_eq!(meta.end_vertex_id, verts[(i + 1) % 4].id);
        }
    }

    #[test]
    fn mixed_thickness_uses_per_wall_half() {
        let verts = ring(&[(0.0, 0.0), (400.0, 0.0), (400.0, 300.0), (0.0, 300.0)]);
        let mut walls = WallGenerator::new(&verts, 10.0).execute();
        walls[0].thickness = 30.0;
        let cl = Centerline::compute(&verts, &walls);

        // Bottom edge (wall 0) offset by 15, right edge (wall 1) by 5:
        // their shared corner is (405, -15).
        assert!((cl.vertices[1].x - 405.0).abs() < 1e-9, "{:?}", cl.vertices[1]);
        assert!((cl.vertices[1].y + 15.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_ring_is_empty() {
        let verts = ring(&[(0.0, 0.0), (1.0, 0.0)]);
        let cl = Centerline::compute(&verts, &[]);
        assert!(cl.vertices.is_empty());
        assert!(cl.edge_metadata.is_empty());
    }
}

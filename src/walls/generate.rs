use tracing::debug;

use crate::math::distance_2d::{point_dist, point_to_segment_dist};
use crate::math::intersect_2d::line_intersection_point;
use crate::math::polygon_2d::{edge_direction, outward_normal};
use crate::math::{Point2, Vector2, ENDPOINT_MATCH_TOLERANCE};
use crate::model::{Vertex, Wall};

/// Derives one mitered wall quad per polygon edge.
///
/// For each edge the outer face is the edge offset outward by the wall
/// thickness; `start_corner`/`end_corner` are the intersections of that
/// outer line with the outer lines of the neighboring edges. When a previous
/// wall set is supplied, each new edge is matched to a prior wall so
/// user-set thickness, type, height, and apertures survive the edit.
#[derive(Debug)]
pub struct WallGenerator<'a> {
    vertices: &'a [Vertex],
    default_thickness: f64,
    previous: Option<(&'a [Wall], &'a [Vertex])>,
}

impl<'a> WallGenerator<'a> {
    /// Creates a generator for a vertex ring at the given default thickness.
    #[must_use]
    pub fn new(vertices: &'a [Vertex], default_thickness: f64) -> Self {
        Self {
            vertices,
            default_thickness,
            previous: None,
        }
    }

    /// Supplies the pre-edit walls and vertices for wall matching.
    #[must_use]
    pub fn with_previous(mut self, walls: &'a [Wall], vertices: &'a [Vertex]) -> Self {
        self.previous = Some((walls, vertices));
        self
    }

    /// Generates the wall list, one wall per edge.
    ///
    /// Rings with fewer than 3 vertices produce no walls (the model layer
    /// rejects such rings before they get here).
    #[must_use]
    pub fn execute(&self) -> Vec<Wall> {
        let n = self.vertices.len();
        if n < 3 {
            return Vec::new();
        }

        // Resolve each edge to a prior wall first so the miter pass can use
        // per-wall thicknesses.
        let mut walls: Vec<Wall> = (0..n).map(|i| self.resolve_wall(i)).collect();

        let normals: Vec<Vector2> = (0..n)
            .map(|i| self.edge_normal(i).unwrap_or_else(Vector2::zeros))
            .collect();
        let thicknesses: Vec<f64> = walls.iter().map(|w| w.thickness).collect();

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;
            let (start, end) = self.edge_points(i);

            let normal = normals[i];
            let outer_start = start + normal * thicknesses[i];
            let outer_end = end + normal * thicknesses[i];
            let dir = end - start;

            let (prev_start, prev_end) = self.edge_points(prev);
            let prev_origin = prev_start + normals[prev] * thicknesses[prev];
            let (next_start, next_end) = self.edge_points(next);
            let next_origin = next_start + normals[next] * thicknesses[next];

            let wall = &mut walls[i];
            wall.normal = normal;
            wall.start_corner = miter_corner(
                &outer_start,
                &dir,
                &prev_origin,
                &(prev_end - prev_start),
                &outer_start,
            );
            wall.end_corner = miter_corner(
                &outer_start,
                &dir,
                &next_origin,
                &(next_end - next_start),
                &outer_end,
            );

            let length = point_dist(&start, &end);
            for aperture in &mut wall.apertures {
                if aperture.clamp_to_wall(length) {
                    debug!(aperture = %aperture.id, wall = i, "aperture clamped to shortened wall");
                }
            }
        }

        walls
    }

    fn edge_points(&self, i: usize) -> (Point2, Point2) {
        let n = self.vertices.len();
        (self.vertices[i].point(), self.vertices[(i + 1) % n].point())
    }

    fn edge_normal(&self, i: usize) -> Option<Vector2> {
        let (a, b) = self.edge_points(i);
        edge_direction(&a, &b).map(|d| outward_normal(&d))
    }

    /// Resolves edge `i` to a prior wall, or builds a fresh default wall.
    ///
    /// Matching order: same vertex count → by index (pure vertex movement);
    /// exact endpoint match either direction (reorder-free edits); wall
    /// split — both new endpoints on a single old edge (vertex insertion).
    fn resolve_wall(&self, i: usize) -> Wall {
        let fresh = || Wall::new(i, self.default_thickness);

        let Some((old_walls, old_vertices)) = self.previous else {
            return fresh();
        };
        if old_vertices.len() < 3 {
            return fresh();
        }

        if old_vertices.len() == self.vertices.len() {
            if let Some(w) = old_walls.iter().find(|w| w.vertex_index == i) {
                return inherit(w, i);
            }
            return fresh();
        }

        let (p0, p1) = self.edge_points(i);
        let m = old_vertices.len();
        for j in 0..m {
            let q0 = old_vertices[j].point();
            let q1 = old_vertices[(j + 1) % m].point();

            let forward = point_dist(&p0, &q0) < ENDPOINT_MATCH_TOLERANCE
                && point_dist(&p1, &q1) < ENDPOINT_MATCH_TOLERANCE;
            let reverse = point_dist(&p0, &q1) < ENDPOINT_MATCH_TOLERANCE
                && point_dist(&p1, &q0) < ENDPOINT_MATCH_TOLERANCE;
            if forward || reverse {
                if let Some(w) = old_walls.iter().find(|w| w.vertex_index == j) {
                    return inherit(w, i);
                }
            }
        }

        // Wall split: the new edge is a fragment of one old edge.
        for j in 0..m {
            let q0 = old_vertices[j].point();
            let q1 = old_vertices[(j + 1) % m].point();
            if point_to_segment_dist(&p0, &q0, &q1) < ENDPOINT_MATCH_TOLERANCE
                && point_to_segment_dist(&p1, &q0, &q1) < ENDPOINT_MATCH_TOLERANCE
            {
                if let Some(w) = old_walls.iter().find(|w| w.vertex_index == j) {
                    return inherit(w, i);
                }
            }
        }

        fresh()
    }
}

/// Carries a prior wall's user-set properties onto a new edge index.
fn inherit(old: &Wall, vertex_index: usize) -> Wall {
    Wall {
        vertex_index,
        thickness: old.thickness,
        wall_type: old.wall_type,
        height: old.height,
        apertures: old.apertures.clone(),
        normal: old.normal,
        start_corner: old.start_corner,
        end_corner: old.end_corner,
    }
}

/// Intersects this edge's outer line with a neighbor's outer line.
///
/// Falls back to the unmitered offset endpoint when the lines are parallel.
fn miter_corner(
    outer_origin: &Point2,
    dir: &Vector2,
    neighbor_origin: &Point2,
    neighbor_dir: &Vector2,
    fallback: &Point2,
) -> Point2 {
    line_intersection_point(outer_origin, dir, neighbor_origin, neighbor_dir)
        .unwrap_or(*fallback)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Aperture, ApertureKind, WallType};

    fn ring(points: &[(f64, f64)]) -> Vec<Vertex> {
        points.iter().map(|&(x, y)| Vertex::new(x, y)).collect()
    }

    fn unit_square() -> Vec<Vertex> {
        ring(&[(0.0, 0.0), (400.0, 0.0), (400.0, 300.0), (0.0, 300.0)])
    }

    #[test]
    fn one_wall_per_edge() {
        let verts = unit_square();
        let walls = WallGenerator::new(&verts, 15.0).execute();
        assert_eq!(walls.len(), 4);
        for (i, w) in walls.iter().enumerate() {
            assert_eq!(w.vertex_index, i);
        }
    }

    #[test]
    fn too_few_vertices_produces_nothing() {
        let verts = ring(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(WallGenerator::new(&verts, 15.0).execute().is_empty());
    }

    #[test]
    fn square_miter_corners() {
        // CCW square: bottom edge's outward normal is -y. Outer line at
        // y = -15; previous (left) edge's outer line at x = -15. The bottom
        // wall's start corner is their intersection (-15, -15).
        let verts = unit_square();
        let walls = WallGenerator::new(&verts, 15.0).execute();
        let w0 = &walls[0];
        assert!((w0.start_corner.x + 15.0).abs() < 1e-9, "{:?}", w0.start_corner);
        assert!((w0.start_corner.y + 15.0).abs() < 1e-9);
        assert!((w0.end_corner.x - 415.0).abs() < 1e-9, "{:?}", w0.end_corner);
        assert!((w0.end_corner.y + 15.0).abs() < 1e-9);
    }

    #[test]
    fn corner_lies_on_both_offset_lines() {
        // Irregular convex quad: every mitered corner must sit on the outer
        // lines of both adjacent edges.
        let verts = ring(&[(0.0, 0.0), (500.0, 20.0), (460.0, 340.0), (-30.0, 280.0)]);
        let walls = WallGenerator::new(&verts, 12.0).execute();
        let n = verts.len();
        for i in 0..n {
            let w = &walls[i];
            let a = verts[i].point() + w.normal * w.thickness;
            let b = verts[(i + 1) % n].point() + w.normal * w.thickness;
            let d_start = point_to_segment_line_dist(&w.start_corner, &a, &b);
            let d_end = point_to_segment_line_dist(&w.end_corner, &a, &b);
            assert!(d_start < 1e-6, "wall {i} start off its outer line: {d_start}");
            assert!(d_end < 1e-6, "wall {i} end off its outer line: {d_end}");
        }
    }

    /// Distance from a point to the infinite line through `a`→`b`.
    fn point_to_segment_line_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
        let d = b - a;
        let len = d.norm();
        ((p - a).x * d.y - (p - a).y * d.x).abs() / len
    }

    #[test]
    fn parallel_neighbor_falls_back_to_offset_endpoint() {
        // Collinear midpoint on the bottom edge: edges 0 and 1 are parallel,
        // so the shared corner cannot be mitered.
        let verts = ring(&[
            (0.0, 0.0),
            (200.0, 0.0),
            (400.0, 0.0),
            (400.0, 300.0),
            (0.0, 300.0),
        ]);
        let walls = WallGenerator::new(&verts, 10.0).execute();
        // Edge 1's start corner falls back to its unmitered offset endpoint.
        let w1 = &walls[1];
        assert!((w1.start_corner.x - 200.0).abs() < 1e-9, "{:?}", w1.start_corner);
        assert!((w1.start_corner.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn vertex_movement_preserves_wall_properties() {
        let verts = unit_square();
        let mut walls = WallGenerator::new(&verts, 15.0).execute();
        walls[1].thickness = 30.0;
        walls[1].wall_type = WallType::Exterior;
        walls[1]
            .apertures
            .push(Aperture::new(ApertureKind::Door, 80.0, 40.0));

        // Move one vertex; same count → index match.
        let mut moved = verts.clone();
        moved[2] = moved[2].moved_to(Point2::new(420.0, 310.0));
        let regenerated = WallGenerator::new(&moved, 15.0)
            .with_previous(&walls, &verts)
            .execute();

        assert_eq!(regenerated.len(), 4);
        assert!((regenerated[1].thickness - 30.0).abs() < 1e-12);
        assert_eq!(regenerated[1].wall_type, WallType::Exterior);
        assert_eq!(regenerated[1].apertures.len(), 1);
        assert!((regenerated[0].thickness - 15.0).abs() < 1e-12);
    }

    #[test]
    fn vertex_insertion_splits_wall() {
        let verts = unit_square();
        let mut walls = WallGenerator::new(&verts, 15.0).execute();
        walls[0].thickness = 25.0;
        walls[0].wall_type = WallType::Exterior;

        // Insert a vertex at the middle of edge 0: both fragments inherit.
        let mut split = verts.clone();
        split.insert(1, Vertex::new(200.0, 0.0));
        let regenerated = WallGenerator::new(&split, 15.0)
            .with_previous(&walls, &verts)
            .execute();

        assert_eq!(regenerated.len(), 5);
        assert!((regenerated[0].thickness - 25.0).abs() < 1e-12);
        assert_eq!(regenerated[0].wall_type, WallType::Exterior);
        assert!((regenerated[1].thickness - 25.0).abs() < 1e-12);
        assert_eq!(regenerated[1].wall_type, WallType::Exterior);
        // The untouched right wall keeps its default by exact endpoint match.
        assert_eq!(regenerated[2].wall_type, WallType::InteriorDivision);
    }

    #[test]
    fn unmatched_edges_get_defaults() {
        let verts = unit_square();
        let walls = WallGenerator::new(&verts, 18.0).execute();
        for w in &walls {
            assert!((w.thickness - 18.0).abs() < 1e-12);
            assert_eq!(w.wall_type, WallType::InteriorDivision);
            assert!((w.height - 270.0).abs() < 1e-12);
            assert!(w.apertures.is_empty());
        }
    }
}

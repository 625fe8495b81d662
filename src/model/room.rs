use serde::{Deserialize, Serialize};
use tracing::debug;

use super::constraint::Constraint;
use super::vertex::{Vertex, VertexId};
use super::wall::Wall;
use crate::centerline::Centerline;
use crate::error::{ModelError, Result};
use crate::math::polygon_2d::{ensure_ccw, is_self_intersecting, recenter};
use crate::math::Point2;
use crate::solver::Primitive;
use crate::transform::RoomTransform;
use crate::walls::WallGenerator;

/// A closed polygon room: vertex ring, derived walls and centerline, world
/// placement, and user-authored constraints.
///
/// Invariants: `vertices` is a CCW ring of at least 3 vertices with unique
/// IDs, centered on its centroid; `walls.len() == vertices.len()` with
/// `walls[i].vertex_index == i`. Every mutation replaces the ring and its
/// derived data wholesale — shared arrays are never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub vertices: Vec<Vertex>,
    /// The last manually-authored shape, used to drop auto-inserted
    /// intersection vertices when rooms are separated again.
    pub original_vertices: Vec<Vertex>,
    pub centerline: Centerline,
    /// Merged outer boundary, absent until the first envelope recalculation.
    pub envelope_vertices: Option<Vec<Point2>>,
    /// Merged inner boundary, absent until the first envelope recalculation.
    pub inner_boundary_vertices: Option<Vec<Point2>>,
    pub walls: Vec<Wall>,
    pub transform: RoomTransform,
    /// Default thickness for newly created walls, in centimeters.
    pub wall_thickness: f64,
    pub constraints: Vec<Constraint>,
    /// Last solved primitive snapshot, kept as a cache for the solver.
    pub primitives: Option<Vec<Primitive>>,
}

impl Room {
    /// Creates a room from a world-space polygon ring.
    ///
    /// The ring is validated, forced counter-clockwise, and recentered: the
    /// centroid becomes the room's world position and the stored vertices
    /// are zero-centered.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::TooFewVertices`] for rings under 3 points and
    /// [`ModelError::SelfIntersecting`] for self-intersecting rings.
    pub fn from_ring(ring: Vec<Point2>, wall_thickness: f64) -> Result<Self> {
        if ring.len() < 3 {
            return Err(ModelError::TooFewVertices(ring.len()).into());
        }
        if is_self_intersecting(&ring) {
            return Err(ModelError::SelfIntersecting.into());
        }

        let ccw = ensure_ccw(&ring);
        let (centered, offset) = recenter(&ccw);
        let vertices: Vec<Vertex> = centered.iter().map(|p| Vertex::new(p.x, p.y)).collect();

        let walls = WallGenerator::new(&vertices, wall_thickness).execute();
        let centerline = Centerline::compute(&vertices, &walls);

        Ok(Self {
            original_vertices: vertices.clone(),
            vertices,
            centerline,
            envelope_vertices: None,
            inner_boundary_vertices: None,
            walls,
            transform: RoomTransform::at(Point2::from(offset)),
            wall_thickness,
            constraints: Vec::new(),
            primitives: None,
        })
    }

    /// Returns the ring vertices in world space.
    #[must_use]
    pub fn world_vertices(&self) -> Vec<Point2> {
        self.vertices
            .iter()
            .map(|v| self.transform.local_to_world(&v.point()))
            .collect()
    }

    /// Returns the centerline segments in world space, one per wall.
    #[must_use]
    pub fn world_centerline_segments(&self) -> Vec<(Point2, Point2)> {
        self.centerline
            .segments()
            .iter()
            .map(|(a, b)| {
                (
                    self.transform.local_to_world(a),
                    self.transform.local_to_world(b),
                )
            })
            .collect()
    }

    /// Index of the vertex with the given ID, if present.
    #[must_use]
    pub fn vertex_index(&self, id: VertexId) -> Option<usize> {
        self.vertices.iter().position(|v| v.id == id)
    }

    /// Number of currently enabled constraints.
    #[must_use]
    pub fn enabled_constraint_count(&self) -> usize {
        self.constraints.iter().filter(|c| c.enabled).count()
    }

    /// Returns `true` if any constraint is enabled.
    #[must_use]
    pub fn has_enabled_constraints(&self) -> bool {
        self.constraints.iter().any(|c| c.enabled)
    }

    /// Replaces the vertex ring and rebuilds all derived data.
    ///
    /// The new ring is recentered; the recentering offset is rotated into
    /// world space and added to `position` so the world location of
    /// untouched vertices does not jump. Walls are regenerated and matched
    /// against the outgoing walls to preserve thickness, type, and
    /// apertures.
    pub fn apply_ring(&mut self, new_vertices: Vec<Vertex>) {
        let points: Vec<Point2> = new_vertices.iter().map(Vertex::point).collect();
        let (centered, offset) = recenter(&points);

        // Shift the outgoing ring into the new centered frame so endpoint
        // matching compares like with like.
        let old_vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| Vertex::with_id(v.id, v.x - offset.x, v.y - offset.y))
            .collect();
        let old_walls = std::mem::take(&mut self.walls);

        self.vertices = new_vertices
            .iter()
            .zip(centered.iter())
            .map(|(v, p)| Vertex::with_id(v.id, p.x, p.y))
            .collect();
        self.transform.position += self.transform.rotate_to_world(&offset);

        self.walls = WallGenerator::new(&self.vertices, self.wall_thickness)
            .with_previous(&old_walls, &old_vertices)
            .execute();
        self.centerline = Centerline::compute(&self.vertices, &self.walls);
        debug_assert!(self.walls_aligned());
    }

    /// Inserts a vertex on the given edge, splitting its wall.
    ///
    /// `local_point` is in room-local coordinates. Returns the new vertex's
    /// ID.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::WallIndexOutOfRange`] for a bad edge index.
    pub fn insert_vertex_on_edge(
        &mut self,
        edge_index: usize,
        local_point: Point2,
    ) -> Result<VertexId> {
        let n = self.vertices.len();
        if edge_index >= n {
            return Err(ModelError::WallIndexOutOfRange {
                index: edge_index,
                wall_count: n,
            }
            .into());
        }

        let vertex = Vertex::new(local_point.x, local_point.y);
        let id = vertex.id;
        let mut ring = self.vertices.clone();
        ring.insert(edge_index + 1, vertex);
        self.apply_ring(ring);
        Ok(id)
    }

    /// Deletes a vertex, rejecting the edit if fewer than 3 would remain.
    ///
    /// Constraints referencing the vertex are removed with it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::TooFewVertices`] when the room already has only
    /// 3 vertices, or [`ModelError::VertexNotFound`] for an unknown ID. The
    /// room is unchanged on error.
    pub fn delete_vertex(&mut self, id: VertexId) -> Result<()> {
        let index = self
            .vertex_index(id)
            .ok_or_else(|| ModelError::VertexNotFound(id.to_string()))?;
        if self.vertices.len() <= 3 {
            return Err(ModelError::TooFewVertices(self.vertices.len() - 1).into());
        }

        let mut ring = self.vertices.clone();
        ring.remove(index);
        let before = self.constraints.len();
        self.constraints.retain(|c| !references_vertex(c, id));
        if self.constraints.len() != before {
            debug!(vertex = %id, removed = before - self.constraints.len(),
                "dropped constraints referencing deleted vertex");
        }
        self.apply_ring(ring);
        Ok(())
    }

    /// Persists the current ring as the manually-authored baseline.
    pub fn commit_original(&mut self) {
        self.original_vertices = self.vertices.clone();
    }

    /// Restores the manually-authored shape, dropping auto-inserted
    /// vertices from a previous envelope merge.
    pub fn reset_to_original(&mut self) {
        let ring = self.original_vertices.clone();
        self.apply_ring(ring);
    }

    /// Checks `walls[i].vertex_index == i` for the whole ring.
    #[must_use]
    pub fn walls_aligned(&self) -> bool {
        self.walls.len() == self.vertices.len()
            && self.walls.iter().enumerate().all(|(i, w)| w.vertex_index == i)
    }
}

fn references_vertex(constraint: &Constraint, id: VertexId) -> bool {
    match &constraint.target {
        super::constraint::ConstraintTarget::Vertices(ids) => ids.contains(&id),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::WallType;

    fn square_ring() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(400.0, 0.0),
            Point2::new(400.0, 300.0),
            Point2::new(0.0, 300.0),
        ]
    }

    #[test]
    fn from_ring_recenters_and_stores_position() {
        let room = Room::from_ring(square_ring(), 15.0).unwrap();
        assert!((room.transform.position.x - 200.0).abs() < 1e-9);
        assert!((room.transform.position.y - 150.0).abs() < 1e-9);
        let expected = [
            (-200.0, -150.0),
            (200.0, -150.0),
            (200.0, 150.0),
            (-200.0, 150.0),
        ];
        for (v, (x, y)) in room.vertices.iter().zip(expected) {
            assert!((v.x - x).abs() < 1e-9, "{v:?}");
            assert!((v.y - y).abs() < 1e-9, "{v:?}");
        }
        assert_eq!(room.walls.len(), 4);
        assert_eq!(room.original_vertices, room.vertices);
    }

    #[test]
    fn from_ring_rejects_too_few() {
        let err = Room::from_ring(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], 15.0);
        assert!(err.is_err());
    }

    #[test]
    fn from_ring_rejects_self_intersection() {
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
            Point2::new(0.0, 100.0),
        ];
        assert!(Room::from_ring(bowtie, 15.0).is_err());
    }

    #[test]
    fn from_ring_forces_ccw() {
        let cw: Vec<Point2> = square_ring().into_iter().rev().collect();
        let room = Room::from_ring(cw, 15.0).unwrap();
        let points: Vec<Point2> = room.vertices.iter().map(Vertex::point).collect();
        assert!(crate::math::polygon_2d::is_ccw(&points));
    }

    #[test]
    fn world_vertices_match_source_ring() {
        let room = Room::from_ring(square_ring(), 15.0).unwrap();
        let world = room.world_vertices();
        assert!((world[0].x).abs() < 1e-9);
        assert!((world[0].y).abs() < 1e-9);
        assert!((world[2].x - 400.0).abs() < 1e-9);
        assert!((world[2].y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn apply_ring_keeps_untouched_world_positions() {
        let mut room = Room::from_ring(square_ring(), 15.0).unwrap();
        let before = room.world_vertices();

        // Drag vertex 2 outward in local space.
        let mut ring = room.vertices.clone();
        ring[2] = ring[2].moved_to(Point2::new(250.0, 200.0));
        room.apply_ring(ring);

        let after = room.world_vertices();
        for i in [0, 1, 3] {
            assert!((after[i].x - before[i].x).abs() < 1e-9, "vertex {i} jumped");
            assert!((after[i].y - before[i].y).abs() < 1e-9, "vertex {i} jumped");
        }
        assert!(room.walls_aligned());
    }

    #[test]
    fn delete_vertex_down_to_three() {
        let mut room = Room::from_ring(square_ring(), 15.0).unwrap();
        let id = room.vertices[3].id;
        room.delete_vertex(id).unwrap();
        assert_eq!(room.vertices.len(), 3);
        assert_eq!(room.walls.len(), 3);
        assert!(room.walls_aligned());
    }

    #[test]
    fn delete_vertex_from_triangle_is_rejected() {
        let mut room = Room::from_ring(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(300.0, 0.0),
                Point2::new(150.0, 200.0),
            ],
            15.0,
        )
        .unwrap();
        let snapshot = room.clone();
        let id = room.vertices[0].id;
        assert!(room.delete_vertex(id).is_err());
        assert_eq!(room, snapshot);
    }

    #[test]
    fn delete_vertex_drops_its_constraints() {
        let mut room = Room::from_ring(square_ring(), 15.0).unwrap();
        let a = room.vertices[0].id;
        let b = room.vertices[1].id;
        let c = room.vertices[2].id;
        room.constraints.push(Constraint::distance(a, b, 400.0));
        room.constraints.push(Constraint::horizontal(b, c));
        room.delete_vertex(a).unwrap();
        assert_eq!(room.constraints.len(), 1);
    }

    #[test]
    fn insert_vertex_splits_wall_and_preserves_type() {
        let mut room = Room::from_ring(square_ring(), 15.0).unwrap();
        room.walls[0].wall_type = WallType::Exterior;
        room.walls[0].thickness = 25.0;

        // Local midpoint of edge 0 (bottom edge of the centered ring).
        room.insert_vertex_on_edge(0, Point2::new(0.0, -150.0)).unwrap();
        assert_eq!(room.vertices.len(), 5);
        assert_eq!(room.walls.len(), 5);
        assert!(room.walls_aligned());
        assert_eq!(room.walls[0].wall_type, WallType::Exterior);
        assert_eq!(room.walls[1].wall_type, WallType::Exterior);
        assert!((room.walls[0].thickness - 25.0).abs() < 1e-12);
    }

    #[test]
    fn reset_to_original_restores_authored_shape() {
        let mut room = Room::from_ring(square_ring(), 15.0).unwrap();
        let authored = room.vertices.clone();
        room.insert_vertex_on_edge(0, Point2::new(0.0, -150.0)).unwrap();
        assert_eq!(room.vertices.len(), 5);
        room.reset_to_original();
        assert_eq!(room.vertices.len(), 4);
        for (v, o) in room.vertices.iter().zip(&authored) {
            assert_eq!(v.id, o.id);
            assert!((v.x - o.x).abs() < 1e-9);
            assert!((v.y - o.y).abs() < 1e-9);
        }
    }
}

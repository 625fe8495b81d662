//! Click-by-click polygon drawing with snap-with-priority.
//!
//! Clicks accumulate a candidate ring; a click near the first vertex closes
//! it into a [`Room`]. While drawing against existing rooms, snap candidates
//! are ranked: extended-edge intersections with a room boundary, then
//! boundary vertices, then boundary edges, then orthogonal alignment within
//! the current polygon, then the grid.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::distance_2d::{point_dist, point_to_segment_dist};
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::polygon_2d::edge_direction;
use crate::math::Point2;
use crate::model::{Plan, Room, DEFAULT_WALL_THICKNESS};
use crate::transform::Viewport;

/// Tunables for the drawing tool. Pixel thresholds convert to world
/// centimeters through the viewport at click time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Grid cell size in centimeters.
    pub grid_size: f64,
    pub grid_enabled: bool,
    /// Click-to-first-vertex distance that closes the polygon, in pixels.
    pub close_threshold_px: f64,
    /// Orthogonal (horizontal/vertical/perpendicular) snap distance, px.
    pub ortho_threshold_px: f64,
    /// Boundary vertex/edge/intersection snap distance, px.
    pub boundary_threshold_px: f64,
    /// How far the in-progress edge is extended past its endpoints when
    /// hunting for boundary intersections, in centimeters.
    pub edge_extension: f64,
    /// Wall thickness for the room created on close, in centimeters.
    pub default_wall_thickness: f64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            grid_enabled: true,
            close_threshold_px: 10.0,
            ortho_threshold_px: 8.0,
            boundary_threshold_px: 10.0,
            edge_extension: 500.0,
            default_wall_thickness: DEFAULT_WALL_THICKNESS,
        }
    }
}

/// Drawing progress: idle, or an open ring of clicked vertices.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawState {
    Idle,
    Drawing { vertices: Vec<Point2> },
}

/// What a click did.
#[derive(Debug)]
pub enum ClickOutcome {
    /// The snapped vertex was appended to the ring.
    Appended(Point2),
    /// The ring closed into a room; the caller owns adding it to the plan.
    Closed(Room),
}

/// The drawing state machine.
#[derive(Debug)]
pub struct DrawingTool {
    config: DrawConfig,
    state: DrawState,
}

impl DrawingTool {
    /// Creates an idle tool.
    #[must_use]
    pub fn new(config: DrawConfig) -> Self {
        Self {
            config,
            state: DrawState::Idle,
        }
    }

    /// Current state, for rendering the in-progress ring.
    #[must_use]
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Handles a click at a world-space point.
    ///
    /// With at least 3 vertices down, a click whose snapped position lands
    /// within the close threshold of the first vertex attempts to close the
    /// ring into a room; otherwise the snapped vertex is appended.
    ///
    /// # Errors
    ///
    /// A failed close (self-intersecting ring) returns the validation error
    /// and keeps the drawing state so the user can continue; no partial
    /// room is ever created.
    pub fn click(
        &mut self,
        world: Point2,
        viewport: &Viewport,
        plan: &Plan,
    ) -> Result<ClickOutcome> {
        let current = match &self.state {
            DrawState::Idle => Vec::new(),
            DrawState::Drawing { vertices } => vertices.clone(),
        };
        let snapped = self.snap_point(world, viewport, plan, &current);

        if current.len() >= 3 {
            let close_dist = viewport.px_to_world(self.config.close_threshold_px);
            if point_dist(&snapped, &current[0]) <= close_dist {
                let room = Room::from_ring(current, self.config.default_wall_thickness)?;
                self.state = DrawState::Idle;
                return Ok(ClickOutcome::Closed(room));
            }
        }

        let mut vertices = current;
        vertices.push(snapped);
        self.state = DrawState::Drawing { vertices };
        Ok(ClickOutcome::Appended(snapped))
    }

    /// Abandons the in-progress ring.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    /// Applies the snap priority chain to a raw cursor position.
    #[must_use]
    pub fn snap_point(
        &self,
        world: Point2,
        viewport: &Viewport,
        plan: &Plan,
        current: &[Point2],
    ) -> Point2 {
        let boundary_dist = viewport.px_to_world(self.config.boundary_threshold_px);

        if plan.room_count() > 0 {
            if let Some(p) = self.snap_boundary_intersection(world, plan, current, boundary_dist) {
                return p;
            }
            if let Some(p) = snap_boundary_vertex(world, plan, boundary_dist) {
                return p;
            }
            if let Some(p) = snap_boundary_edge(world, plan, boundary_dist) {
                return p;
            }
        }

        let ortho_dist = viewport.px_to_world(self.config.ortho_threshold_px);
        if let Some(p) = snap_orthogonal(world, current, ortho_dist) {
            return p;
        }

        if self.config.grid_enabled {
            return grid_snap(world, self.config.grid_size);
        }
        world
    }

    /// Highest priority: intersections of the extended in-progress edge
    /// with room boundaries, taken when one lies near the cursor.
    fn snap_boundary_intersection(
        &self,
        world: Point2,
        plan: &Plan,
        current: &[Point2],
        threshold: f64,
    ) -> Option<Point2> {
        let last = current.last()?;
        let dir = edge_direction(last, &world)?;
        let ext = self.config.edge_extension;
        let a = last - dir * ext;
        let b = world + dir * ext;

        let mut best: Option<(f64, Point2)> = None;
        for (_, room) in plan.rooms() {
            for (e0, e1) in boundary_segments(room) {
                if let Some((pt, _, _)) = segment_segment_intersect_2d(&a, &b, &e0, &e1) {
                    let d = point_dist(&pt, &world);
                    if d <= threshold && best.is_none_or(|(bd, _)| d < bd) {
                        best = Some((d, pt));
                    }
                }
            }
        }
        best.map(|(_, p)| p)
    }
}

/// The boundary ring used for drawing snaps: the merged inner boundary when
/// the envelope pass has produced one, else the room's own polygon.
fn boundary_ring(room: &Room) -> Vec<Point2> {
    room.inner_boundary_vertices
        .clone()
        .unwrap_or_else(|| room.world_vertices())
}

fn boundary_segments(room: &Room) -> Vec<(Point2, Point2)> {
    let ring = boundary_ring(room);
    let n = ring.len();
    (0..n).map(|i| (ring[i], ring[(i + 1) % n])).collect()
}

fn snap_boundary_vertex(world: Point2, plan: &Plan, threshold: f64) -> Option<Point2> {
    let mut best: Option<(f64, Point2)> = None;
    for (_, room) in plan.rooms() {
        for p in boundary_ring(room) {
            let d = point_dist(&p, &world);
            if d <= threshold && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, p));
            }
        }
    }
    best.map(|(_, p)| p)
}

fn snap_boundary_edge(world: Point2, plan: &Plan, threshold: f64) -> Option<Point2> {
    let mut best: Option<(f64, Point2)> = None;
    for (_, room) in plan.rooms() {
        for (a, b) in boundary_segments(room) {
            let d = point_to_segment_dist(&world, &a, &b);
            if d <= threshold && best.is_none_or(|(bd, _)| d < bd) {
                // Project the cursor onto the edge.
                let dir = b - a;
                let len_sq = dir.norm_squared();
                if len_sq < crate::math::TOLERANCE {
                    continue;
                }
                let t = ((world - a).dot(&dir) / len_sq).clamp(0.0, 1.0);
                best = Some((d, Point2::from(a.coords + dir * t)));
            }
        }
    }
    best.map(|(_, p)| p)
}

/// Orthogonal snapping inside the current polygon: perpendicular to the
/// last edge, then horizontal/vertical alignment with any earlier vertex.
fn snap_orthogonal(world: Point2, current: &[Point2], threshold: f64) -> Option<Point2> {
    if current.is_empty() {
        return None;
    }

    if current.len() >= 2 {
        let last = current[current.len() - 1];
        let prev = current[current.len() - 2];
        if let Some(dir) = edge_direction(&prev, &last) {
            // Distance from the perpendicular line through the last vertex.
            let offset = (world - last).dot(&dir);
            if offset.abs() <= threshold {
                let projected = world - dir * offset;
                return Some(projected);
            }
        }
    }

    let mut x_snap: Option<(f64, f64)> = None;
    let mut y_snap: Option<(f64, f64)> = None;
    for v in current {
        let dx = (world.x - v.x).abs();
        if dx <= threshold && x_snap.is_none_or(|(bd, _)| dx < bd) {
            x_snap = Some((dx, v.x));
        }
        let dy = (world.y - v.y).abs();
        if dy <= threshold && y_snap.is_none_or(|(bd, _)| dy < bd) {
            y_snap = Some((dy, v.y));
        }
    }
    if x_snap.is_none() && y_snap.is_none() {
        return None;
    }
    Some(Point2::new(
        x_snap.map_or(world.x, |(_, x)| x),
        y_snap.map_or(world.y, |(_, y)| y),
    ))
}

/// Rounds a point to the nearest grid cell.
#[must_use]
pub fn grid_snap(p: Point2, grid_size: f64) -> Point2 {
    if grid_size <= 0.0 {
        return p;
    }
    Point2::new(
        (p.x / grid_size).round() * grid_size,
        (p.y / grid_size).round() * grid_size,
    )
}

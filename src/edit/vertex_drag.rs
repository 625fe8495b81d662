use tracing::{debug, warn};

use super::{
    apply_candidate_ring, commit_and_request_envelope, past_threshold, DragPhase, DragStart,
    FrozenRoom, EDGE_DRAG_THRESHOLD_PX, POINT_DRAG_THRESHOLD_PX,
};
use crate::draw::grid_snap;
use crate::envelope::EnvelopeRequest;
use crate::error::{ModelError, Result};
use crate::math::{Point2, Vector2};
use crate::model::{Plan, RoomId, Vertex, VertexId};
use crate::solver::{solve_room, ConstraintSolver, Primitive, SolveOptions};

/// Generation tag for one asynchronous solve kicked off by a drag frame.
///
/// Each pointer move that needs a re-solve bumps the drag's generation; a
/// result is applied only while its generation still matches, so an
/// out-of-order solve cannot overwrite a newer frame's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveTicket {
    pub generation: u64,
    /// The dragged vertex, pinned during solving.
    pub fixed_vertex_index: usize,
}

/// What part of the ring a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingTarget {
    Vertex(VertexId),
    /// Edge `i`: the vertex pair `(i, i + 1)`.
    Edge(usize),
    /// Wall `i`: the same pair, movement restricted to the wall normal.
    Wall(usize),
}

/// Shared core of the vertex, edge, and wall drag machines.
#[derive(Debug)]
struct RingDrag {
    room: RoomId,
    target: RingTarget,
    start: DragStart,
    frozen: FrozenRoom,
    phase: DragPhase,
    threshold_px: f64,
    grid_size: Option<f64>,
    solve_generation: u64,
}

impl RingDrag {
    fn begin(
        plan: &Plan,
        room: RoomId,
        target: RingTarget,
        world: Point2,
        screen: Point2,
        threshold_px: f64,
    ) -> Result<Self> {
        let r = plan.room(room)?;
        match target {
            RingTarget::Vertex(id) => {
                r.vertex_index(id)
                    .ok_or_else(|| ModelError::VertexNotFound(id.to_string()))?;
            }
            RingTarget::Edge(index) | RingTarget::Wall(index) => {
                if index >= r.vertices.len() {
                    return Err(ModelError::WallIndexOutOfRange {
                        index,
                        wall_count: r.vertices.len(),
                    }
                    .into());
                }
            }
        }
        Ok(Self {
            room,
            target,
            start: DragStart { world, screen },
            frozen: FrozenRoom::freeze(r),
            phase: DragPhase::Armed,
            threshold_px,
            grid_size: None,
            solve_generation: 0,
        })
    }

    /// Indices of the frozen vertices this drag moves.
    fn moved_indices(&self) -> Result<Vec<usize>> {
        let n = self.frozen.vertices.len();
        match self.target {
            RingTarget::Vertex(id) => {
                let index = self
                    .frozen
                    .vertices
                    .iter()
                    .position(|v| v.id == id)
                    .ok_or_else(|| ModelError::VertexNotFound(id.to_string()))?;
                Ok(vec![index])
            }
            RingTarget::Edge(index) | RingTarget::Wall(index) => {
                Ok(vec![index, (index + 1) % n])
            }
        }
    }

    /// Pointer delta from drag start, constrained per target kind.
    fn effective_delta(&self, world: Point2) -> Vector2 {
        let delta = world - self.start.world;
        match self.target {
            RingTarget::Wall(index) => {
                // Wall faces move along their outward normal only.
                let normal = self
                    .frozen
                    .transform
                    .rotate_to_world(&self.frozen.walls[index].normal);
                let len = normal.norm();
                if len < crate::math::TOLERANCE {
                    return delta;
                }
                let unit = normal / len;
                unit * delta.dot(&unit)
            }
            _ => delta,
        }
    }

    fn update(&mut self, plan: &mut Plan, world: Point2, screen: Point2) -> Result<Option<SolveTicket>> {
        if self.phase == DragPhase::Committed {
            return Ok(None);
        }
        if self.phase == DragPhase::Armed {
            if !past_threshold(&self.start, &screen, self.threshold_px) {
                return Ok(None);
            }
            self.phase = DragPhase::Dragging;
        }

        let indices = self.moved_indices()?;
        let mut delta = self.effective_delta(world);

        // Grid snap the lead vertex's world target and carry the corrected
        // delta to the rest, keeping multi-vertex targets rigid.
        if let Some(grid) = self.grid_size {
            let lead = self.frozen.vertices[indices[0]].point();
            let lead_world = self.frozen.transform.local_to_world(&lead);
            let snapped = grid_snap(lead_world + delta, grid);
            delta = snapped - lead_world;
        }

        let mut candidate = self.frozen.vertices.clone();
        for &i in &indices {
            let frozen_world = self
                .frozen
                .transform
                .local_to_world(&self.frozen.vertices[i].point());
            let local = self.frozen.transform.world_to_local(&(frozen_world + delta));
            candidate[i] = candidate[i].moved_to(local);
        }
        apply_candidate_ring(plan, self.room, &self.frozen, candidate)?;

        if plan.room(self.room)?.has_enabled_constraints() {
            self.solve_generation += 1;
            return Ok(Some(SolveTicket {
                generation: self.solve_generation,
                fixed_vertex_index: indices[0],
            }));
        }
        Ok(None)
    }

    fn apply_solved(
        &self,
        plan: &mut Plan,
        ticket: &SolveTicket,
        vertices: Vec<Vertex>,
        primitives: Option<Vec<Primitive>>,
    ) -> Result<bool> {
        if ticket.generation != self.solve_generation {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.solve_generation,
                "dropping stale solve result"
            );
            return Ok(false);
        }
        plan.update_room(self.room, |room| {
            room.apply_ring(vertices);
            if primitives.is_some() {
                room.primitives = primitives;
            }
        })?;
        Ok(true)
    }

    fn solve_blocking(
        &self,
        plan: &mut Plan,
        ticket: &SolveTicket,
        solver: &dyn ConstraintSolver,
        options: &SolveOptions,
    ) -> Result<()> {
        let outcome = {
            let room = plan.room(self.room)?;
            solve_room(room, solver, ticket.fixed_vertex_index, options)
        };
        match outcome {
            Ok((vertices, primitives)) => {
                self.apply_solved(plan, ticket, vertices, primitives)?;
            }
            Err(err) => {
                // The drag keeps the unsolved (but still snapped and
                // recentered) geometry.
                warn!(%err, "constraint solve failed during drag");
            }
        }
        Ok(())
    }

    fn end(&mut self, plan: &mut Plan) -> Result<Option<EnvelopeRequest>> {
        let was_dragging = self.phase == DragPhase::Dragging;
        self.phase = DragPhase::Committed;
        if !was_dragging {
            return Ok(None);
        }
        Ok(Some(commit_and_request_envelope(plan, self.room)?))
    }
}

macro_rules! ring_drag_api {
    ($name:ident) => {
        impl $name {
            /// Enables grid snapping at the given cell size.
            #[must_use]
            pub fn with_grid(mut self, grid_size: f64) -> Self {
                self.inner.grid_size = Some(grid_size);
                self
            }

            /// Current phase of the drag.
            #[must_use]
            pub fn phase(&self) -> DragPhase {
                self.inner.phase
            }

            /// Recomputes the candidate geometry for a pointer move.
            ///
            /// Returns a [`SolveTicket`] when the room has enabled
            /// constraints and a re-solve should be kicked off. Below the
            /// activation threshold this is a no-op.
            ///
            /// # Errors
            ///
            /// Fails when the room or its dragged element disappeared.
            pub fn update(
                &mut self,
                plan: &mut Plan,
                world: Point2,
                screen: Point2,
            ) -> Result<Option<SolveTicket>> {
                self.inner.update(plan, world, screen)
            }

            /// Applies an (asynchronously) solved ring if the ticket is
            /// still current. Returns `false` for a dropped stale result.
            ///
            /// # Errors
            ///
            /// Fails when the room disappeared.
            pub fn apply_solved(
                &self,
                plan: &mut Plan,
                ticket: &SolveTicket,
                vertices: Vec<Vertex>,
                primitives: Option<Vec<Primitive>>,
            ) -> Result<bool> {
                self.inner.apply_solved(plan, ticket, vertices, primitives)
            }

            /// Convenience path running the solver inline, degrading to the
            /// unsolved geometry if it fails.
            ///
            /// # Errors
            ///
            /// Fails when the room disappeared; solver failures degrade
            /// instead of propagating.
            pub fn solve_blocking(
                &self,
                plan: &mut Plan,
                ticket: &SolveTicket,
                solver: &dyn ConstraintSolver,
                options: &SolveOptions,
            ) -> Result<()> {
                self.inner.solve_blocking(plan, ticket, solver, options)
            }

            /// Ends the drag: commits geometry, persists the
            /// `original_vertices` baseline, and returns the envelope
            /// request to forward to the union collaborator. `None` when
            /// the interaction never activated (a plain click).
            ///
            /// # Errors
            ///
            /// Fails when the room disappeared.
            pub fn end(mut self, plan: &mut Plan) -> Result<Option<EnvelopeRequest>> {
                self.inner.end(plan)
            }
        }
    };
}

/// Drags one vertex of a room's ring.
#[derive(Debug)]
pub struct VertexDrag {
    inner: RingDrag,
}

impl VertexDrag {
    /// Arms a vertex drag at the pointer-down position.
    ///
    /// # Errors
    ///
    /// Fails when the room or vertex does not exist.
    pub fn begin(
        plan: &Plan,
        room: RoomId,
        vertex: VertexId,
        world: Point2,
        screen: Point2,
    ) -> Result<Self> {
        Ok(Self {
            inner: RingDrag::begin(
                plan,
                room,
                RingTarget::Vertex(vertex),
                world,
                screen,
                POINT_DRAG_THRESHOLD_PX,
            )?,
        })
    }
}

ring_drag_api!(VertexDrag);

/// Drags an edge (its two vertices move together).
#[derive(Debug)]
pub struct EdgeDrag {
    inner: RingDrag,
}

impl EdgeDrag {
    /// Arms an edge drag at the pointer-down position.
    ///
    /// # Errors
    ///
    /// Fails when the room or edge does not exist.
    pub fn begin(
        plan: &Plan,
        room: RoomId,
        edge: usize,
        world: Point2,
        screen: Point2,
    ) -> Result<Self> {
        Ok(Self {
            inner: RingDrag::begin(
                plan,
                room,
                RingTarget::Edge(edge),
                world,
                screen,
                EDGE_DRAG_THRESHOLD_PX,
            )?,
        })
    }
}

ring_drag_api!(EdgeDrag);

/// Drags a wall face along its outward normal.
#[derive(Debug)]
pub struct WallDrag {
    inner: RingDrag,
}

impl WallDrag {
    /// Arms a wall drag at the pointer-down position.
    ///
    /// # Errors
    ///
    /// Fails when the room or wall does not exist.
    pub fn begin(
        plan: &Plan,
        room: RoomId,
        wall: usize,
        world: Point2,
        screen: Point2,
    ) -> Result<Self> {
        Ok(Self {
            inner: RingDrag::begin(
                plan,
                room,
                RingTarget::Wall(wall),
                world,
                screen,
                EDGE_DRAG_THRESHOLD_PX,
            )?,
        })
    }
}

ring_drag_api!(WallDrag);

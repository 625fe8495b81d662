mod adapter;
mod dof;

pub use adapter::{primitives_to_room, room_to_primitives};
pub use dof::{calculate_dof, is_fully_constrained, solve_room};

use serde::{Deserialize, Serialize};

use crate::error::SolveError;
use crate::model::ConstraintKind;

/// Default iteration bound handed to the external solver.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Default convergence tolerance handed to the external solver.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// The solver's atomic unit: a point, a line, or a named constraint, all
/// identified by string IDs. Points are keyed by vertex ID so solved
/// coordinates can be joined back onto the room's vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Point(PointPrimitive),
    Line(LinePrimitive),
    Constraint(ConstraintPrimitive),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPrimitive {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// A fixed point is held in place to prevent global drift.
    pub fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub id: String,
    /// Point primitive ID of the line start.
    pub start: String,
    /// Point primitive ID of the line end.
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintPrimitive {
    pub id: String,
    pub kind: ConstraintKind,
    /// Point primitive IDs the constraint applies to (vertex-based kinds).
    pub points: Vec<String>,
    /// Line primitive IDs the constraint applies to (edge-based kinds).
    pub lines: Vec<String>,
    pub value: Option<f64>,
}

/// Convergence parameters for the external solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveOptions {
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// The external numeric constraint solver, consumed as a black box through
/// a push-then-solve-then-read cycle: it receives the flat primitive list
/// and returns a list with the same point IDs and updated coordinates.
///
/// Iteration count and algorithm internals are opaque; `options` is the
/// solver's own convergence bound, no external timeout wraps it.
pub trait ConstraintSolver {
    /// Solves the primitive graph.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] when the solver rejects the graph or fails
    /// to converge. Callers degrade to unsolved geometry on error.
    fn solve(
        &self,
        primitives: &[Primitive],
        options: &SolveOptions,
    ) -> std::result::Result<Vec<Primitive>, SolveError>;
}

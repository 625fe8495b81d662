use thiserror::Error;

/// Top-level error type for the Planik floor plan engine.
#[derive(Debug, Error)]
pub enum PlanikError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the room model and its invariants.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("polygon requires at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon is self-intersecting")]
    SelfIntersecting,

    #[error("vertex not found: {0}")]
    VertexNotFound(String),

    #[error("wall index {index} out of range for {wall_count} walls")]
    WallIndexOutOfRange { index: usize, wall_count: usize },

    #[error("room not found")]
    RoomNotFound,

    #[error("aperture not found: {0}")]
    ApertureNotFound(String),
}

/// Errors related to constraint solving.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("solver did not converge: {0}")]
    DidNotConverge(String),

    #[error("constraint references unknown vertex: {0}")]
    UnknownVertex(String),

    #[error("constraint references edge {index} out of {edge_count} edges")]
    EdgeOutOfRange { index: usize, edge_count: usize },

    #[error("solver failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`PlanikError`].
pub type Result<T> = std::result::Result<T, PlanikError>;

pub mod aperture;
pub mod constraint;
pub mod plan;
pub mod room;
pub mod vertex;
pub mod wall;

pub use aperture::{AnchorEnd, Aperture, ApertureId, ApertureKind};
pub use constraint::{Constraint, ConstraintId, ConstraintKind, ConstraintTarget};
pub use plan::{Plan, RoomId};
pub use room::Room;
pub use vertex::{Vertex, VertexId};
pub use wall::{Wall, WallType, DEFAULT_WALL_HEIGHT, DEFAULT_WALL_THICKNESS};

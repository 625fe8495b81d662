mod classify;
mod generate;

pub use classify::{classify_wall_types, SHARED_EDGE_TOLERANCE};
pub use generate::WallGenerator;

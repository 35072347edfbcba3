//! World access for the bed safety checks: coordinates, level properties,
//! read-only world queries, village lookups, and an in-memory voxel world.

pub mod grid;
pub mod level;
pub mod pos;
pub mod query;
pub mod structure;

pub use grid::{Block, GridWorld};
pub use level::{BiomeId, Difficulty};
pub use pos::{BlockPos, ChunkPos};
pub use query::WorldQuery;
pub use structure::{is_village_structure, StructureError, StructureOracle};

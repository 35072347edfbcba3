//! Read-only access to terrain, lighting, biome and difficulty.

use crate::level::{BiomeId, Difficulty};
use crate::pos::BlockPos;

/// Read-only view of a voxel world, as seen by the reachability checks.
///
/// Implementations answer for the current simulation tick only. Queries on
/// positions in unavailable regions return "empty" / "not solid" / `0` and the
/// caller is expected to consult [`WorldQuery::is_region_available`] first.
pub trait WorldQuery {
    /// Whether the region (chunk) containing `pos` is loaded.
    fn is_region_available(&self, pos: BlockPos) -> bool;

    /// Whether the block at `pos` is air.
    fn block_is_empty(&self, pos: BlockPos) -> bool;

    /// Whether the block at `pos` is a full solid block a mob can stand on.
    fn block_is_solid(&self, pos: BlockPos) -> bool;

    /// Block light level (0..=15) at `pos`.
    fn light_level(&self, pos: BlockPos) -> u8;

    fn biome_at(&self, pos: BlockPos) -> BiomeId;

    fn difficulty(&self) -> Difficulty;

    /// Whether `pos` holds a door, open or closed.
    fn is_door(&self, pos: BlockPos) -> bool;

    /// Whether `pos` holds a door that is currently closed.
    fn is_closed_door(&self, pos: BlockPos) -> bool;

    /// Whether this is the authoritative (server) side of the simulation.
    fn is_authoritative(&self) -> bool {
        true
    }
}

//! Village structure lookup with a chunk-scan fallback.

use thiserror::Error;
use tracing::debug;

use crate::pos::{BlockPos, ChunkPos};

/// Structure identifiers treated as villages even when matched exactly.
pub const VILLAGE_STRUCTURES: &[&str] = &[
    "village_plains",
    "village_desert",
    "village_savanna",
    "village_snowy",
    "village_taiga",
];

/// Chunks searched around the position's chunk in the fallback scan.
pub const FALLBACK_CHUNK_RADIUS: i32 = 1;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("structure data unavailable at {0}")]
    Unavailable(BlockPos),

    #[error("structure references for chunk {0} could not be read")]
    ChunkReferences(ChunkPos),

    #[error("structure lookup failed: {0}")]
    Lookup(String),
}

/// Whether a structure identifier names a village variant.
///
/// A namespace prefix (`minecraft:`) is ignored.
pub fn is_village_structure(id: &str) -> bool {
    let path = id.split_once(':').map(|(_, p)| p).unwrap_or(id);
    VILLAGE_STRUCTURES.contains(&path) || path.contains("village")
}

/// Structure placement queries used to decide whether a bed lies in a village.
pub trait StructureOracle {
    /// Primary lookup: the village structure (if any) whose pieces contain `pos`.
    fn village_containing(&self, pos: BlockPos) -> Result<Option<String>, StructureError>;

    fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool;

    /// Identifiers of all structures referenced by `chunk`.
    fn structures_in_chunk(&self, chunk: ChunkPos) -> Result<Vec<String>, StructureError>;

    /// Chunk holding `pos`, used as the centre of the fallback scan.
    fn containing_chunk(&self, pos: BlockPos) -> Result<ChunkPos, StructureError> {
        Ok(pos.chunk_pos())
    }

    /// Whether `pos` lies inside a village.
    ///
    /// Faults in the primary lookup fall back to scanning structure references
    /// of the surrounding 3x3 chunks; if that fails too the answer is `false`.
    fn is_within_village(&self, pos: BlockPos) -> bool {
        match self.village_containing(pos) {
            Ok(Some(id)) => {
                debug!("{pos} is inside village structure {id}");
                true
            }
            Ok(None) => {
                debug!("{pos} is not inside a village structure");
                false
            }
            Err(e) => {
                debug!("Primary structure check failed, trying fallback: {e}");
                match village_in_neighbouring_chunks(self, pos) {
                    Ok(found) => found,
                    Err(e) => {
                        debug!("Fallback structure check failed: {e}");
                        false
                    }
                }
            }
        }
    }
}

fn village_in_neighbouring_chunks<S: StructureOracle + ?Sized>(
    oracle: &S,
    pos: BlockPos,
) -> Result<bool, StructureError> {
    let center = oracle.containing_chunk(pos)?;
    for dx in -FALLBACK_CHUNK_RADIUS..=FALLBACK_CHUNK_RADIUS {
        for dz in -FALLBACK_CHUNK_RADIUS..=FALLBACK_CHUNK_RADIUS {
            let chunk = ChunkPos::new(center.x + dx, center.z + dz);
            if !oracle.is_chunk_loaded(chunk) {
                continue;
            }
            let ids = match oracle.structures_in_chunk(chunk) {
                Ok(ids) => ids,
                Err(e) => {
                    debug!("Skipping chunk {chunk}: {e}");
                    continue;
                }
            };
            if ids.iter().any(|id| is_village_structure(id)) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

//! In-memory voxel world used by the demo server and tests.
//!
//! Blocks default to air and light defaults to a configurable ambient level.
//! Every chunk is loaded unless explicitly unloaded.

use std::collections::{HashMap, HashSet};

use crate::level::{BiomeId, Difficulty};
use crate::pos::{BlockPos, ChunkPos};
use crate::query::WorldQuery;
use crate::structure::{is_village_structure, StructureError, StructureOracle};

/// Block kinds distinguished by the reachability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Air,
    /// Full cube a mob can stand on.
    Solid,
    /// Occupies space but cannot be stood on (flowers, torches, carpets).
    Plant,
    Door { open: bool },
}

/// An axis-aligned structure bounding box.
#[derive(Debug, Clone)]
pub struct StructurePiece {
    pub id: String,
    pub min: BlockPos,
    pub max: BlockPos,
}

impl StructurePiece {
    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }

    fn touches_chunk(&self, chunk: ChunkPos) -> bool {
        let start = chunk.start_pos(0);
        self.min.x <= start.x + 15
            && self.max.x >= start.x
            && self.min.z <= start.z + 15
            && self.max.z >= start.z
    }
}

/// Sparse voxel world.
#[derive(Debug, Clone)]
pub struct GridWorld {
    blocks: HashMap<BlockPos, Block>,
    light: HashMap<BlockPos, u8>,
    ambient_light: u8,
    biomes: HashMap<ChunkPos, BiomeId>,
    default_biome: BiomeId,
    difficulty: Difficulty,
    authoritative: bool,
    unloaded: HashSet<ChunkPos>,
    structures: Vec<StructurePiece>,
    structure_lookup_faults: bool,
}

impl GridWorld {
    pub fn new(difficulty: Difficulty, biome: BiomeId) -> Self {
        Self {
            blocks: HashMap::new(),
            light: HashMap::new(),
            ambient_light: 0,
            biomes: HashMap::new(),
            default_biome: biome,
            difficulty,
            authoritative: true,
            unloaded: HashSet::new(),
            structures: Vec::new(),
            structure_lookup_faults: false,
        }
    }

    /// A square solid floor of `(2 * radius + 1)^2` blocks at `floor_y`,
    /// centred on `(center_x, center_z)`.
    pub fn flat(
        difficulty: Difficulty,
        biome: BiomeId,
        center_x: i32,
        center_z: i32,
        radius: i32,
        floor_y: i32,
    ) -> Self {
        let mut world = Self::new(difficulty, biome);
        world.fill(
            BlockPos::new(center_x - radius, floor_y, center_z - radius),
            BlockPos::new(center_x + radius, floor_y, center_z + radius),
            Block::Solid,
        );
        world
    }

    pub fn block(&self, pos: BlockPos) -> Block {
        self.blocks.get(&pos).copied().unwrap_or(Block::Air)
    }

    pub fn set_block(&mut self, pos: BlockPos, block: Block) {
        if block == Block::Air {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block);
        }
    }

    /// Fill the inclusive box `a..=b` with `block`.
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, block: Block) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for z in a.z.min(b.z)..=a.z.max(b.z) {
                    self.set_block(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    /// Number of non-air blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn set_ambient_light(&mut self, level: u8) {
        self.ambient_light = level.min(15);
    }

    pub fn set_light(&mut self, pos: BlockPos, level: u8) {
        self.light.insert(pos, level.min(15));
    }

    /// Set the light level of every block in the inclusive box `a..=b`.
    pub fn fill_light(&mut self, a: BlockPos, b: BlockPos, level: u8) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for z in a.z.min(b.z)..=a.z.max(b.z) {
                    self.set_light(BlockPos::new(x, y, z), level);
                }
            }
        }
    }

    pub fn set_chunk_biome(&mut self, chunk: ChunkPos, biome: BiomeId) {
        self.biomes.insert(chunk, biome);
    }

    pub fn set_authoritative(&mut self, authoritative: bool) {
        self.authoritative = authoritative;
    }

    pub fn unload_chunk(&mut self, chunk: ChunkPos) {
        self.unloaded.insert(chunk);
    }

    pub fn load_chunk(&mut self, chunk: ChunkPos) {
        self.unloaded.remove(&chunk);
    }

    pub fn add_structure(&mut self, id: impl Into<String>, min: BlockPos, max: BlockPos) {
        self.structures.push(StructurePiece {
            id: id.into(),
            min,
            max,
        });
    }

    /// Make the primary structure lookup fail, forcing the chunk-scan fallback.
    pub fn set_structure_lookup_faults(&mut self, faults: bool) {
        self.structure_lookup_faults = faults;
    }
}

impl WorldQuery for GridWorld {
    fn is_region_available(&self, pos: BlockPos) -> bool {
        !self.unloaded.contains(&pos.chunk_pos())
    }

    fn block_is_empty(&self, pos: BlockPos) -> bool {
        self.block(pos) == Block::Air
    }

    fn block_is_solid(&self, pos: BlockPos) -> bool {
        self.block(pos) == Block::Solid
    }

    fn light_level(&self, pos: BlockPos) -> u8 {
        self.light.get(&pos).copied().unwrap_or(self.ambient_light)
    }

    fn biome_at(&self, pos: BlockPos) -> BiomeId {
        self.biomes
            .get(&pos.chunk_pos())
            .cloned()
            .unwrap_or_else(|| self.default_biome.clone())
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn is_door(&self, pos: BlockPos) -> bool {
        matches!(self.block(pos), Block::Door { .. })
    }

    fn is_closed_door(&self, pos: BlockPos) -> bool {
        self.block(pos) == Block::Door { open: false }
    }

    fn is_authoritative(&self) -> bool {
        self.authoritative
    }
}

impl StructureOracle for GridWorld {
    fn village_containing(&self, pos: BlockPos) -> Result<Option<String>, StructureError> {
        if self.structure_lookup_faults {
            return Err(StructureError::Lookup("structure accessor unavailable".into()));
        }
        Ok(self
            .structures
            .iter()
            .find(|s| is_village_structure(&s.id) && s.contains(pos))
            .map(|s| s.id.clone()))
    }

    fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool {
        !self.unloaded.contains(&chunk)
    }

    fn structures_in_chunk(&self, chunk: ChunkPos) -> Result<Vec<String>, StructureError> {
        Ok(self
            .structures
            .iter()
            .filter(|s| s.touches_chunk(chunk))
            .map(|s| s.id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_world() -> GridWorld {
        GridWorld::new(Difficulty::Normal, BiomeId::plains())
    }

    #[test]
    fn defaults_to_air_and_ambient_light() {
        let mut w = normal_world();
        let p = BlockPos::new(1, 2, 3);
        assert!(w.block_is_empty(p));
        assert!(!w.block_is_solid(p));
        assert_eq!(w.light_level(p), 0);
        w.set_ambient_light(20);
        assert_eq!(w.light_level(p), 15);
    }

    #[test]
    fn plants_are_neither_empty_nor_solid() {
        let mut w = normal_world();
        let p = BlockPos::new(0, 0, 0);
        w.set_block(p, Block::Plant);
        assert!(!w.block_is_empty(p));
        assert!(!w.block_is_solid(p));
    }

    #[test]
    fn doors_report_closed_state() {
        let mut w = normal_world();
        let p = BlockPos::new(0, 5, 0);
        w.set_block(p, Block::Door { open: false });
        assert!(w.is_door(p));
        assert!(w.is_closed_door(p));
        w.set_block(p, Block::Door { open: true });
        assert!(w.is_door(p));
        assert!(!w.is_closed_door(p));
        assert!(!w.is_door(p.up(1)));
    }

    #[test]
    fn flat_world_floor() {
        let w = GridWorld::flat(Difficulty::Easy, BiomeId::plains(), 0, 0, 2, 63);
        assert_eq!(w.block_count(), 25);
        assert!(w.block_is_solid(BlockPos::new(-2, 63, 2)));
        assert!(w.block_is_empty(BlockPos::new(0, 64, 0)));
        assert!(w.block_is_empty(BlockPos::new(3, 63, 0)));
    }

    #[test]
    fn unloaded_chunks_are_unavailable() {
        let mut w = normal_world();
        w.unload_chunk(ChunkPos::new(1, 0));
        assert!(!w.is_region_available(BlockPos::new(20, 64, 3)));
        assert!(w.is_region_available(BlockPos::new(3, 64, 3)));
        w.load_chunk(ChunkPos::new(1, 0));
        assert!(w.is_region_available(BlockPos::new(20, 64, 3)));
    }

    #[test]
    fn chunk_biome_override() {
        let mut w = normal_world();
        w.set_chunk_biome(ChunkPos::new(0, 0), BiomeId::mushroom_fields());
        assert_eq!(w.biome_at(BlockPos::new(4, 64, 4)), BiomeId::mushroom_fields());
        assert_eq!(w.biome_at(BlockPos::new(-4, 64, 4)), BiomeId::plains());
    }

    #[test]
    fn structure_lookup_and_fallback() {
        let mut w = normal_world();
        w.add_structure(
            "minecraft:village_plains",
            BlockPos::new(0, 60, 0),
            BlockPos::new(40, 80, 40),
        );
        assert!(w.is_within_village(BlockPos::new(10, 64, 10)));
        assert!(!w.is_within_village(BlockPos::new(-100, 64, 10)));

        w.set_structure_lookup_faults(true);
        // Fallback sees the village referenced by a neighbouring chunk.
        assert!(w.is_within_village(BlockPos::new(-8, 64, 8)));
        assert!(!w.is_within_village(BlockPos::new(-100, 64, 10)));
    }

    #[test]
    fn non_village_structures_are_ignored() {
        let mut w = normal_world();
        w.add_structure(
            "minecraft:pillager_outpost",
            BlockPos::new(0, 60, 0),
            BlockPos::new(10, 80, 10),
        );
        assert!(!w.is_within_village(BlockPos::new(5, 64, 5)));
        assert_eq!(
            w.structures_in_chunk(ChunkPos::new(0, 0)).unwrap(),
            vec!["minecraft:pillager_outpost".to_string()]
        );
    }
}

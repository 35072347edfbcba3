//! Block and chunk coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BlockPos (i32 x, y, z)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset by the given deltas.
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// The block `n` levels above this one.
    pub const fn up(&self, n: i32) -> Self {
        self.offset(0, n, 0)
    }

    /// The block `n` levels below this one.
    pub const fn down(&self, n: i32) -> Self {
        self.offset(0, -n, 0)
    }

    /// Convert to the chunk position that contains this block.
    pub fn chunk_pos(&self) -> ChunkPos {
        ChunkPos::new(self.x >> 4, self.z >> 4)
    }

    /// Squared euclidean distance between two block positions.
    pub fn distance_sq(&self, other: &BlockPos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        let dz = f64::from(self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Centre of this block as floating-point coordinates.
    pub fn center(&self) -> (f32, f32, f32) {
        (
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// ChunkPos (i32 x, z)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Block position of the chunk's minimum corner at the given height.
    pub fn start_pos(&self, y: i32) -> BlockPos {
        BlockPos::new(self.x << 4, y, self.z << 4)
    }

    /// Whether the block column `(x, z)` lies inside this chunk.
    pub fn contains_column(&self, x: i32, z: i32) -> bool {
        x >> 4 == self.x && z >> 4 == self.z
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

//! Spawn-candidate search around a bed.
//!
//! Y levels are visited top-down so higher spawn spots are found first. Each
//! level reshuffles the X and Z offset lists in place, which means the order of
//! one level depends on every shuffle before it. The order is part of the
//! observable behaviour: it decides which candidate is evaluated first.

use harderbeds_world::{BlockPos, WorldQuery};
use rand::Rng;
use tracing::debug;

use crate::search::SearchConfig;

/// A position where a hostile mob could appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnCandidate {
    /// The solid block the mob would stand on.
    pub floor: BlockPos,
    /// Light level of the block directly above the floor.
    pub light_level: u8,
}

impl SpawnCandidate {
    /// Block the mob's feet would occupy.
    pub fn feet(&self) -> BlockPos {
        self.floor.up(1)
    }
}

/// Start a lazy scan of the search volume around `target`.
pub fn scan<'a, W, R>(
    world: &'a W,
    target: BlockPos,
    config: &SearchConfig,
    rng: &'a mut R,
) -> CandidateScan<'a, W, R>
where
    W: WorldQuery + ?Sized,
    R: Rng + ?Sized,
{
    CandidateScan::new(world, target, *config, rng)
}

/// Position within the current Y level.
struct Slice {
    y: i32,
    xi: usize,
    zi: usize,
}

/// Iterator over spawn candidates in scan order. Not restartable.
pub struct CandidateScan<'a, W: ?Sized, R: ?Sized> {
    world: &'a W,
    rng: &'a mut R,
    target: BlockPos,
    config: SearchConfig,
    x_offsets: Vec<i32>,
    z_offsets: Vec<i32>,
    /// `None` once the bottom of the world has been passed.
    next_y: Option<i32>,
    slice: Option<Slice>,
}

impl<'a, W, R> CandidateScan<'a, W, R>
where
    W: WorldQuery + ?Sized,
    R: Rng + ?Sized,
{
    fn new(world: &'a W, target: BlockPos, config: SearchConfig, rng: &'a mut R) -> Self {
        let h = config.horizontal_radius;
        Self {
            world,
            rng,
            target,
            config,
            x_offsets: (-h..=h).collect(),
            z_offsets: (-h..=h).collect(),
            // Leave room for the two clearance blocks above the top level.
            next_y: Some(target.y.saturating_add(config.vertical_radius).min(i32::MAX - 2)),
            slice: None,
        }
    }

    /// Move to the next Y level outside the exclusion band and reshuffle.
    fn enter_next_level(&mut self) -> bool {
        let bottom = self.target.y.saturating_sub(self.config.vertical_radius);
        while let Some(y) = self.next_y.filter(|&y| y >= bottom) {
            self.next_y = y.checked_sub(1);
            if y.abs_diff(self.target.y) <= self.config.inner_exclusion_radius.unsigned_abs() {
                continue;
            }
            shuffle(&mut self.x_offsets, self.rng);
            shuffle(&mut self.z_offsets, self.rng);
            self.slice = Some(Slice { y, xi: 0, zi: 0 });
            return true;
        }
        false
    }

    /// Whether the solid block at `pos` is a valid spawn platform.
    fn check_platform(&self, pos: BlockPos) -> Option<SpawnCandidate> {
        let world = self.world;
        if !world.is_region_available(pos) {
            return None;
        }
        if world.block_is_empty(pos) || !world.block_is_solid(pos) {
            return None;
        }
        let above = pos.up(1);
        if !world.block_is_empty(above) || !world.block_is_empty(pos.up(2)) {
            return None;
        }
        let light_level = world.light_level(above);
        if light_level >= self.config.min_light_level {
            return None;
        }
        debug!(
            "Found potential spawn location {pos} (distance from bed: X={}, Y={}, Z={})",
            pos.x.abs_diff(self.target.x),
            pos.y.abs_diff(self.target.y),
            pos.z.abs_diff(self.target.z)
        );
        Some(SpawnCandidate {
            floor: pos,
            light_level,
        })
    }
}

impl<W, R> Iterator for CandidateScan<'_, W, R>
where
    W: WorldQuery + ?Sized,
    R: Rng + ?Sized,
{
    type Item = SpawnCandidate;

    fn next(&mut self) -> Option<SpawnCandidate> {
        let inner = self.config.inner_exclusion_radius;
        let width = self.x_offsets.len();
        loop {
            let Some(slice) = self.slice.as_mut() else {
                if !self.enter_next_level() {
                    return None;
                }
                continue;
            };
            if slice.xi >= width {
                self.slice = None;
                continue;
            }

            let dx = self.x_offsets[slice.xi];
            if dx.abs() <= inner {
                slice.xi += 1;
                slice.zi = 0;
                continue;
            }
            if slice.zi >= width {
                slice.xi += 1;
                slice.zi = 0;
                continue;
            }
            let dz = self.z_offsets[slice.zi];
            slice.zi += 1;
            if dz.abs() <= inner {
                continue;
            }

            let pos = BlockPos::new(
                self.target.x.saturating_add(dx),
                slice.y,
                self.target.z.saturating_add(dz),
            );
            if let Some(candidate) = self.check_platform(pos) {
                return Some(candidate);
            }
        }
    }
}

/// Fisher-Yates shuffle from the last index down.
fn shuffle<R: Rng + ?Sized>(values: &mut [i32], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.gen_range(0..=i);
        values.swap(i, j);
    }
}

//! A* ground navigation over a [`WorldQuery`], for worlds without an engine
//! pathfinder of their own.
//!
//! Walkers are two blocks tall, need a solid block under their feet, step up
//! one block, and drop up to [`MAX_DROP`] blocks. Doors never block movement
//! here; whether a door on the route matters is up to the caller.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use harderbeds_world::{BlockPos, WorldQuery};
use tracing::debug;

use super::navigation::{NavError, NavigationOracle, Path, ProbeId};

/// Highest ledge a walker drops down in one step.
pub const MAX_DROP: i32 = 3;

const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone)]
struct Probe {
    feet: BlockPos,
    target: Option<BlockPos>,
    ticks: u32,
}

/// Pathfinder for ground mobs.
pub struct GridNavigator<'w, W: ?Sized> {
    world: &'w W,
    probes: HashMap<ProbeId, Probe>,
    next_id: u64,
}

impl<'w, W: WorldQuery + ?Sized> GridNavigator<'w, W> {
    pub fn new(world: &'w W) -> Self {
        Self {
            world,
            probes: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of probes not yet discarded.
    pub fn live_probes(&self) -> usize {
        self.probes.len()
    }

    /// Simulation steps a probe has taken.
    pub fn probe_ticks(&self, probe: ProbeId) -> Option<u32> {
        self.probes.get(&probe).map(|p| p.ticks)
    }

    fn passable(&self, pos: BlockPos) -> bool {
        self.world.block_is_empty(pos) || self.world.is_door(pos)
    }

    /// Feet position a walker can occupy.
    fn standable(&self, feet: BlockPos) -> bool {
        self.world.is_region_available(feet)
            && self.world.block_is_solid(feet.down(1))
            && self.passable(feet)
            && self.passable(feet.up(1))
    }

    fn neighbours(&self, from: BlockPos, out: &mut Vec<BlockPos>) {
        out.clear();
        for (dx, dz) in DIRECTIONS {
            let level = from.offset(dx, 0, dz);
            if self.standable(level) {
                out.push(level);
                continue;
            }
            let up = from.offset(dx, 1, dz);
            if self.passable(from.up(2)) && self.standable(up) {
                out.push(up);
                continue;
            }
            // Walk off the edge if the column is clear down to a landing.
            if !self.passable(level) || !self.passable(level.up(1)) {
                continue;
            }
            for drop in 1..=MAX_DROP {
                let landing = level.down(drop);
                if self.standable(landing) {
                    out.push(landing);
                    break;
                }
                if !self.passable(landing) {
                    break;
                }
            }
        }
    }

    fn search(&self, start: BlockPos, goal: BlockPos, budget: Option<u32>) -> Path {
        let h = |p: BlockPos| ((p.x - goal.x).abs() + (p.z - goal.z).abs()) as u32;

        let mut open = BinaryHeap::new();
        let mut came_from: HashMap<BlockPos, BlockPos> = HashMap::new();
        let mut cost: HashMap<BlockPos, u32> = HashMap::new();
        let mut order = 0u64;
        let mut expanded = 0u32;
        let mut best = (start.distance_sq(&goal), start);
        let mut scratch = Vec::with_capacity(4);

        cost.insert(start, 0);
        open.push(Reverse((h(start), order, start)));

        while let Some(Reverse((_, _, current))) = open.pop() {
            if current == goal {
                best = (0.0, current);
                break;
            }
            if budget.is_some_and(|b| expanded >= b) {
                break;
            }
            expanded += 1;

            let d = current.distance_sq(&goal);
            if d < best.0 {
                best = (d, current);
            }

            let g = cost[&current];
            self.neighbours(current, &mut scratch);
            for &next in &scratch {
                let tentative = g + 1;
                if cost.get(&next).is_some_and(|&c| c <= tentative) {
                    continue;
                }
                cost.insert(next, tentative);
                came_from.insert(next, current);
                order += 1;
                open.push(Reverse((tentative + h(next), order, next)));
            }
        }

        let end = best.1;
        let mut nodes = vec![end];
        let mut cursor = end;
        while let Some(&prev) = came_from.get(&cursor) {
            nodes.push(prev);
            cursor = prev;
        }
        nodes.reverse();

        debug!(
            "Path search {start} -> {goal}: {} nodes, {expanded} expanded, ends at {end}",
            nodes.len()
        );
        Path {
            nodes,
            reaches_target: end == goal,
        }
    }
}

impl<W: WorldQuery + ?Sized> NavigationOracle for GridNavigator<'_, W> {
    fn create_probe(&mut self, origin: (f32, f32, f32)) -> Result<ProbeId, NavError> {
        let (x, y, z) = origin;
        let feet = BlockPos::new(x.floor() as i32, y.floor() as i32, z.floor() as i32);
        if !self.world.is_region_available(feet) {
            return Err(NavError::InvalidOrigin { x, y, z });
        }
        let id = ProbeId(self.next_id);
        self.next_id += 1;
        self.probes.insert(
            id,
            Probe {
                feet,
                target: None,
                ticks: 0,
            },
        );
        Ok(id)
    }

    fn tick(&mut self, probe: ProbeId) -> Result<(), NavError> {
        let world = self.world;
        let state = self
            .probes
            .get_mut(&probe)
            .ok_or(NavError::UnknownProbe(probe))?;
        // Unsupported probes fall one block per step.
        let below = state.feet.down(1);
        if world.is_region_available(below) && world.block_is_empty(below) {
            state.feet = below;
        }
        state.ticks += 1;
        Ok(())
    }

    fn set_target(&mut self, probe: ProbeId, target: BlockPos) -> Result<(), NavError> {
        let state = self
            .probes
            .get_mut(&probe)
            .ok_or(NavError::UnknownProbe(probe))?;
        state.target = Some(target);
        Ok(())
    }

    fn find_path(
        &mut self,
        probe: ProbeId,
        target: BlockPos,
        node_budget: Option<u32>,
    ) -> Result<Option<Path>, NavError> {
        let state = self
            .probes
            .get(&probe)
            .ok_or(NavError::UnknownProbe(probe))?;
        if state.target.is_none() {
            return Err(NavError::NoTarget(probe));
        }
        if !self.standable(state.feet) {
            return Ok(None);
        }
        Ok(Some(self.search(state.feet, target, node_budget)))
    }

    fn discard(&mut self, probe: ProbeId) {
        self.probes.remove(&probe);
    }
}

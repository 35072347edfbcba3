//! Bed safety verdicts: can a hostile mob reach a sleeping player?

use harderbeds_world::{BiomeId, BlockPos, StructureOracle, WorldQuery};
use rand::Rng;
use tracing::debug;

use crate::ai::navigation::NavigationOracle;
use crate::ai::reachability::ReachabilityEvaluator;
use crate::ai::scanner;
use crate::particles::ParticleSink;
use crate::search::SearchConfig;
use crate::settings::Settings;

/// Where the check is aimed: the bed block and the player a mob would chase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BedTarget {
    pub bed: BlockPos,
    pub sleeper: BlockPos,
}

impl BedTarget {
    /// Player standing at the bed itself.
    pub fn at(bed: BlockPos) -> Self {
        Self { bed, sleeper: bed }
    }
}

/// Result of a safety check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict {
    Safe,
    /// A mob spawning on `origin` could walk to the bed along `waypoints`.
    Unsafe {
        origin: BlockPos,
        waypoints: Vec<BlockPos>,
    },
}

impl SafetyVerdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyVerdict::Safe)
    }
}

/// Combines the cheap world checks, the spawn scan and path evaluation.
#[derive(Debug, Clone)]
pub struct SafetyService {
    search: SearchConfig,
    sanctuary: BiomeId,
}

impl SafetyService {
    pub fn new(search: SearchConfig) -> Self {
        Self {
            search,
            sanctuary: BiomeId::mushroom_fields(),
        }
    }

    /// Use a different biome as the no-hostiles sanctuary.
    pub fn with_sanctuary(mut self, biome: BiomeId) -> Self {
        self.sanctuary = biome;
        self
    }

    pub fn search(&self) -> &SearchConfig {
        &self.search
    }

    /// Whether a bed at `pos` may be used without a village penalty.
    /// Always true on a non-authoritative world.
    pub fn is_allowed<W, S>(&self, world: &W, structures: &S, pos: BlockPos) -> bool
    where
        W: WorldQuery + ?Sized,
        S: StructureOracle + ?Sized,
    {
        if !world.is_authoritative() {
            return true;
        }
        if structures.is_within_village(pos) {
            debug!("Beds within villages cannot be used ({pos})");
            false
        } else {
            true
        }
    }

    pub fn is_safe<W, N, P, R>(
        &self,
        world: &W,
        nav: &mut N,
        particles: &mut P,
        settings: &Settings,
        target: BedTarget,
        rng: &mut R,
    ) -> bool
    where
        W: WorldQuery + ?Sized,
        N: NavigationOracle + ?Sized,
        P: ParticleSink + ?Sized,
        R: Rng + ?Sized,
    {
        self.check(world, nav, particles, settings, target, rng)
            .is_safe()
    }

    /// Full verdict, including the spawn spot and route when unsafe.
    ///
    /// Stops at the first candidate whose route reaches the bed.
    pub fn check<W, N, P, R>(
        &self,
        world: &W,
        nav: &mut N,
        particles: &mut P,
        settings: &Settings,
        target: BedTarget,
        rng: &mut R,
    ) -> SafetyVerdict
    where
        W: WorldQuery + ?Sized,
        N: NavigationOracle + ?Sized,
        P: ParticleSink + ?Sized,
        R: Rng + ?Sized,
    {
        let bed = target.bed;
        if !world.is_authoritative() {
            return SafetyVerdict::Safe;
        }
        if !world.difficulty().allows_hostiles() {
            debug!("SAFE: difficulty is {}", world.difficulty());
            return SafetyVerdict::Safe;
        }
        if world.biome_at(bed) == self.sanctuary {
            debug!("SAFE: bed is in {} biome", self.sanctuary);
            return SafetyVerdict::Safe;
        }

        let mut evaluator =
            ReachabilityEvaluator::new(world, nav, particles, settings.visualize_mob_path);
        let mut evaluated = 0usize;
        for candidate in scanner::scan(world, bed, &self.search, rng) {
            evaluated += 1;
            let result = evaluator.evaluate(&candidate, bed, target.sleeper);
            if result.is_reachable() {
                debug!(
                    "UNSAFE: a mob can reach the bed at {bed} from {} ({evaluated} candidates checked)",
                    candidate.floor
                );
                return SafetyVerdict::Unsafe {
                    origin: candidate.floor,
                    waypoints: result.waypoints,
                };
            }
            debug!(
                "Spawn location {} cannot reach the bed, continuing search",
                candidate.floor
            );
        }

        debug!("SAFE: no mob paths to the bed at {bed} ({evaluated} candidates checked)");
        SafetyVerdict::Safe
    }
}

impl Default for SafetyService {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

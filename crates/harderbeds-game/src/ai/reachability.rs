//! Decides whether a mob spawned at a candidate could walk to the bed.

use harderbeds_world::{BlockPos, WorldQuery};
use tracing::debug;

use crate::particles::{ParticleKind, ParticleSink};

use super::navigation::{NavError, NavigationOracle, Path, ProbeId};
use super::scanner::SpawnCandidate;

/// Simulation steps a probe takes before its path query.
pub const PROBE_WARMUP_TICKS: u32 = 2;

/// A path ending within this squared distance of the target counts as arrived.
pub const NEAR_MISS_DISTANCE_SQ: f64 = 1.0;

/// Burst at the path end.
const END_PARTICLES: u32 = 30;
const END_SPREAD: f32 = 0.2;
/// Trail along the path nodes.
const TRAIL_PARTICLES: u32 = 20;
const TRAIL_SPREAD: f32 = 0.1;

/// How a candidate's path to the target was classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathStatus {
    /// The pathfinder reports the route ends at the target.
    ReachesTarget,
    /// The route ends this (squared) distance from the target, close enough
    /// to count as reached.
    TerminatesNear(f64),
    /// The route gives up short of the target.
    Exhausted,
    /// No usable route: none returned, degenerate, blocked by a closed door,
    /// or the simulation failed.
    Unavailable,
}

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub waypoints: Vec<BlockPos>,
    pub status: PathStatus,
}

impl PathResult {
    fn unavailable() -> Self {
        Self {
            waypoints: Vec::new(),
            status: PathStatus::Unavailable,
        }
    }

    /// Whether a mob could reach the target along this path.
    pub fn is_reachable(&self) -> bool {
        matches!(
            self.status,
            PathStatus::ReachesTarget | PathStatus::TerminatesNear(_)
        )
    }
}

/// Runs path simulations from spawn candidates toward a bed.
pub struct ReachabilityEvaluator<'a, W: ?Sized, N: ?Sized, P: ?Sized> {
    world: &'a W,
    nav: &'a mut N,
    particles: &'a mut P,
    visualize: bool,
}

impl<'a, W, N, P> ReachabilityEvaluator<'a, W, N, P>
where
    W: WorldQuery + ?Sized,
    N: NavigationOracle + ?Sized,
    P: ParticleSink + ?Sized,
{
    pub fn new(world: &'a W, nav: &'a mut N, particles: &'a mut P, visualize: bool) -> Self {
        Self {
            world,
            nav,
            particles,
            visualize,
        }
    }

    /// Classify the route a mob standing on `candidate` would take toward
    /// `chase` (the sleeper), judged against the bed at `target`.
    pub fn evaluate(
        &mut self,
        candidate: &SpawnCandidate,
        target: BlockPos,
        chase: BlockPos,
    ) -> PathResult {
        let (x, _, z) = candidate.floor.center();
        let origin = (x, candidate.feet().y as f32, z);

        let probe = match self.nav.create_probe(origin) {
            Ok(probe) => probe,
            Err(e) => {
                debug!("Probe creation at {} failed: {e}", candidate.floor);
                return PathResult::unavailable();
            }
        };

        let path = self.simulate(probe, chase);
        self.nav.discard(probe);

        let path = match path {
            Ok(Some(path)) => path,
            Ok(None) => {
                debug!("Path is null. Mob cannot reach.");
                return PathResult::unavailable();
            }
            Err(e) => {
                debug!("Path simulation from {} failed: {e}", candidate.floor);
                return PathResult::unavailable();
            }
        };

        let result = self.classify(path, target);
        if result.is_reachable() && self.visualize {
            self.show_path(&result.waypoints);
        }
        result
    }

    fn simulate(&mut self, probe: ProbeId, chase: BlockPos) -> Result<Option<Path>, NavError> {
        self.nav.set_target(probe, chase)?;
        for _ in 0..PROBE_WARMUP_TICKS {
            self.nav.tick(probe)?;
        }
        self.nav.find_path(probe, chase, None)
    }

    fn classify(&self, path: Path, target: BlockPos) -> PathResult {
        if path.len() < 2 {
            debug!("Path is invalid: {} node(s)", path.len());
            return PathResult::unavailable();
        }
        if let Some(door) = path.nodes.iter().find(|n| self.world.is_closed_door(**n)) {
            debug!("Path contains a closed door at {door}");
            return PathResult::unavailable();
        }

        let status = if path.reaches_target {
            debug!("Path reaches target!");
            PathStatus::ReachesTarget
        } else {
            let end = path.end().unwrap_or(target);
            let distance_sq = target.distance_sq(&end);
            if distance_sq <= NEAR_MISS_DISTANCE_SQ {
                debug!("Path is close enough to the target to reach ({distance_sq})");
                PathStatus::TerminatesNear(distance_sq)
            } else {
                PathStatus::Exhausted
            }
        };
        PathResult {
            waypoints: path.nodes,
            status,
        }
    }

    fn show_path(&mut self, waypoints: &[BlockPos]) {
        let Some(end) = waypoints.last() else {
            return;
        };
        self.particles
            .emit(ParticleKind::Flame, end.center(), END_PARTICLES, END_SPREAD);
        for node in waypoints {
            self.particles.emit(
                ParticleKind::SoulFireFlame,
                node.center(),
                TRAIL_PARTICLES,
                TRAIL_SPREAD,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{NoParticles, ParticleLog};
    use harderbeds_world::{BiomeId, Block, Difficulty, GridWorld};
    use std::collections::HashMap;

    const BED: BlockPos = BlockPos::new(0, 64, 0);

    /// Navigator returning a scripted path and recording calls.
    #[derive(Default)]
    struct Scripted {
        path: Option<Path>,
        fail_on: Option<&'static str>,
        ticks: HashMap<ProbeId, u32>,
        live: usize,
        discarded: usize,
    }

    impl Scripted {
        fn with_path(nodes: Vec<BlockPos>, reaches_target: bool) -> Self {
            Self {
                path: Some(Path {
                    nodes,
                    reaches_target,
                }),
                ..Default::default()
            }
        }

        fn fault(&self, step: &str) -> Result<(), NavError> {
            if self.fail_on == Some(step) {
                Err(NavError::Simulation(format!("{step} exploded")))
            } else {
                Ok(())
            }
        }
    }

    impl NavigationOracle for Scripted {
        fn create_probe(&mut self, _origin: (f32, f32, f32)) -> Result<ProbeId, NavError> {
            self.fault("create")?;
            self.live += 1;
            Ok(ProbeId(self.live as u64))
        }

        fn tick(&mut self, probe: ProbeId) -> Result<(), NavError> {
            self.fault("tick")?;
            *self.ticks.entry(probe).or_default() += 1;
            Ok(())
        }

        fn set_target(&mut self, _probe: ProbeId, _target: BlockPos) -> Result<(), NavError> {
            self.fault("target")
        }

        fn find_path(
            &mut self,
            probe: ProbeId,
            _target: BlockPos,
            node_budget: Option<u32>,
        ) -> Result<Option<Path>, NavError> {
            self.fault("path")?;
            assert_eq!(node_budget, None);
            assert_eq!(self.ticks.get(&probe), Some(&PROBE_WARMUP_TICKS));
            Ok(self.path.clone())
        }

        fn discard(&mut self, _probe: ProbeId) {
            self.discarded += 1;
        }
    }

    fn world() -> GridWorld {
        GridWorld::new(Difficulty::Normal, BiomeId::plains())
    }

    fn candidate() -> SpawnCandidate {
        SpawnCandidate {
            floor: BlockPos::new(5, 63, 5),
            light_level: 0,
        }
    }

    fn line(to: BlockPos) -> Vec<BlockPos> {
        vec![BlockPos::new(5, 64, 5), BlockPos::new(3, 64, 2), to]
    }

    fn run(world: &GridWorld, nav: &mut Scripted, visualize: bool) -> (PathResult, ParticleLog) {
        let mut log = ParticleLog::new();
        let result = ReachabilityEvaluator::new(world, nav, &mut log, visualize)
            .evaluate(&candidate(), BED, BED);
        (result, log)
    }

    #[test]
    fn reaching_path_is_reachable_and_visualised() {
        let w = world();
        let mut nav = Scripted::with_path(line(BED), true);
        let (result, mut log) = run(&w, &mut nav, true);
        assert_eq!(result.status, PathStatus::ReachesTarget);
        assert!(result.is_reachable());
        assert_eq!(result.waypoints.len(), 3);

        let bursts = log.drain();
        assert_eq!(bursts.len(), 4);
        assert_eq!(bursts[0].kind, ParticleKind::Flame);
        assert_eq!(bursts[0].count, 30);
        assert_eq!(bursts[0].position, BED.center());
        assert!(bursts[1..]
            .iter()
            .all(|b| b.kind == ParticleKind::SoulFireFlame && b.count == 20));
        assert_eq!(nav.discarded, 1);
    }

    #[test]
    fn visualisation_can_be_disabled() {
        let w = world();
        let mut nav = Scripted::with_path(line(BED), true);
        let (result, log) = run(&w, &mut nav, false);
        assert!(result.is_reachable());
        assert!(log.bursts.is_empty());
    }

    #[test]
    fn near_miss_counts_as_reachable() {
        let w = world();
        let end = BED.offset(1, 0, 0);
        let mut nav = Scripted::with_path(line(end), false);
        let (result, log) = run(&w, &mut nav, true);
        assert_eq!(result.status, PathStatus::TerminatesNear(1.0));
        assert!(result.is_reachable());
        assert!(!log.bursts.is_empty());
    }

    #[test]
    fn diagonal_end_is_too_far() {
        let w = world();
        let mut nav = Scripted::with_path(line(BED.offset(1, 0, 1)), false);
        let (result, log) = run(&w, &mut nav, true);
        assert_eq!(result.status, PathStatus::Exhausted);
        assert!(!result.is_reachable());
        assert!(log.bursts.is_empty());
    }

    #[test]
    fn closed_door_blocks_even_a_reaching_path() {
        let mut w = world();
        w.set_block(BlockPos::new(3, 64, 2), Block::Door { open: false });
        let mut nav = Scripted::with_path(line(BED), true);
        let (result, log) = run(&w, &mut nav, true);
        assert_eq!(result.status, PathStatus::Unavailable);
        assert!(log.bursts.is_empty());

        let mut nav = Scripted::with_path(line(BED.offset(0, 0, 1)), false);
        assert_eq!(run(&w, &mut nav, true).0.status, PathStatus::Unavailable);
    }

    #[test]
    fn open_door_does_not_block() {
        let mut w = world();
        w.set_block(BlockPos::new(3, 64, 2), Block::Door { open: true });
        let mut nav = Scripted::with_path(line(BED), true);
        assert_eq!(run(&w, &mut nav, true).0.status, PathStatus::ReachesTarget);
    }

    #[test]
    fn missing_or_degenerate_paths_are_unavailable() {
        let w = world();
        let mut nav = Scripted::default();
        assert_eq!(run(&w, &mut nav, true).0.status, PathStatus::Unavailable);
        assert_eq!(nav.discarded, 1);

        let mut nav = Scripted::with_path(vec![BED], true);
        assert_eq!(run(&w, &mut nav, true).0.status, PathStatus::Unavailable);
    }

    #[test]
    fn simulation_faults_are_unavailable_and_release_the_probe() {
        let w = world();
        for step in ["target", "tick", "path"] {
            let mut nav = Scripted::with_path(line(BED), true);
            nav.fail_on = Some(step);
            let (result, _) = run(&w, &mut nav, true);
            assert_eq!(result.status, PathStatus::Unavailable, "{step}");
            assert_eq!(nav.discarded, 1, "{step}");
        }

        let mut nav = Scripted::with_path(line(BED), true);
        nav.fail_on = Some("create");
        assert_eq!(run(&w, &mut nav, true).0.status, PathStatus::Unavailable);
        assert_eq!(nav.discarded, 0);
    }

    #[test]
    fn works_with_the_null_sink() {
        let w = world();
        let mut nav = Scripted::with_path(line(BED), true);
        let mut sink = NoParticles;
        let result = ReachabilityEvaluator::new(&w, &mut nav, &mut sink, true)
            .evaluate(&candidate(), BED, BED);
        assert!(result.is_reachable());
    }
}

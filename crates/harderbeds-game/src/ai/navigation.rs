//! Interface to the pathfinding engine.

use harderbeds_world::BlockPos;
use thiserror::Error;

/// Handle to a transient pathfinding probe owned by a [`NavigationOracle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeId(pub u64);

#[derive(Debug, Error)]
pub enum NavError {
    #[error("unknown probe {0:?}")]
    UnknownProbe(ProbeId),

    #[error("probe cannot be placed at ({x:.1}, {y:.1}, {z:.1})")]
    InvalidOrigin { x: f32, y: f32, z: f32 },

    #[error("probe {0:?} has no target")]
    NoTarget(ProbeId),

    #[error("navigation failed: {0}")]
    Simulation(String),
}

/// A computed route: waypoints from start to end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<BlockPos>,
    /// Whether the route ends at the requested target.
    pub reaches_target: bool,
}

impl Path {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn end(&self) -> Option<BlockPos> {
        self.nodes.last().copied()
    }
}

/// Pathfinding engine able to simulate a mob walking toward a target.
///
/// Probes never become visible to the rest of the world: they are not
/// spawned, saved, or ticked by the normal entity loop.
pub trait NavigationOracle {
    /// Create a probe with its feet at `origin`.
    fn create_probe(&mut self, origin: (f32, f32, f32)) -> Result<ProbeId, NavError>;

    /// Advance the probe's simulation by one step.
    fn tick(&mut self, probe: ProbeId) -> Result<(), NavError>;

    fn set_target(&mut self, probe: ProbeId, target: BlockPos) -> Result<(), NavError>;

    /// Compute a route from the probe toward `target`. `node_budget` of
    /// `None` means unbounded search.
    fn find_path(
        &mut self,
        probe: ProbeId,
        target: BlockPos,
        node_budget: Option<u32>,
    ) -> Result<Option<Path>, NavError>;

    /// Release the probe. Unknown ids are ignored.
    fn discard(&mut self, probe: ProbeId);
}

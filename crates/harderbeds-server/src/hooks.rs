//! Hook registry: bed-related engine events and the side effects hooks request.

use harderbeds_game::particles::ParticleSink;
use harderbeds_game::{NavigationOracle, Settings};
use harderbeds_world::{BlockPos, StructureOracle, WorldQuery};
use rand::RngCore;
use tracing::{debug, info};

/// Result of dispatching an event to the hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue normal handling.
    Continue,
    /// The engine should not perform the action.
    Cancelled,
}

/// Engine events the bed rules listen to.
#[derive(Debug, Clone)]
pub enum HookEvent {
    /// A player used a block. `player_pos` is where the player stands.
    Interact {
        player: String,
        position: BlockPos,
        player_pos: BlockPos,
        block: String,
    },
    /// A player left their bed. `world_time` is the absolute world tick.
    WakeUp {
        player: String,
        sleeping_pos: Option<BlockPos>,
        world_time: i64,
    },
    BlockBreak {
        player: String,
        position: BlockPos,
        block: String,
    },
    /// Natural spawn of a mob about to happen.
    SpawnAttempt {
        mob_type: String,
        position: BlockPos,
    },
}

impl HookEvent {
    /// Whether a hook may cancel this event.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, HookEvent::WakeUp { .. })
    }
}

/// Status effects a hook can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEffect {
    Hunger,
    Slowness,
    Weakness,
    MiningFatigue,
}

/// Deferred side effect requested by a hook, applied by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    SendMessage {
        player_name: String,
        message: String,
    },
    AddEffect {
        player_name: String,
        effect: StatusEffect,
        amplifier: u8,
        duration_ticks: u32,
    },
    /// Remove dropped bed items within `radius` blocks of `center`.
    RemoveBedDrops {
        center: (f32, f32, f32),
        radius: f32,
    },
}

/// World collaborators and settings for a single dispatch. Actions requested
/// by hooks accumulate here.
pub struct HookContext<'a> {
    pub world: &'a dyn WorldQuery,
    pub structures: &'a dyn StructureOracle,
    pub nav: &'a mut dyn NavigationOracle,
    pub particles: &'a mut dyn ParticleSink,
    pub rng: &'a mut dyn RngCore,
    pub settings: Settings,
    actions: Vec<PendingAction>,
}

impl<'a> HookContext<'a> {
    pub fn new(
        world: &'a dyn WorldQuery,
        structures: &'a dyn StructureOracle,
        nav: &'a mut dyn NavigationOracle,
        particles: &'a mut dyn ParticleSink,
        rng: &'a mut dyn RngCore,
        settings: Settings,
    ) -> Self {
        Self {
            world,
            structures,
            nav,
            particles,
            rng,
            settings,
            actions: Vec::new(),
        }
    }

    pub fn send_message(&mut self, player_name: &str, message: &str) {
        self.actions.push(PendingAction::SendMessage {
            player_name: player_name.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_effect(
        &mut self,
        player_name: &str,
        effect: StatusEffect,
        amplifier: u8,
        duration_ticks: u32,
    ) {
        self.actions.push(PendingAction::AddEffect {
            player_name: player_name.to_string(),
            effect,
            amplifier,
            duration_ticks,
        });
    }

    pub fn remove_bed_drops(&mut self, center: (f32, f32, f32), radius: f32) {
        self.actions
            .push(PendingAction::RemoveBedDrops { center, radius });
    }

    fn take_actions(&mut self) -> Vec<PendingAction> {
        std::mem::take(&mut self.actions)
    }
}

/// Receives engine events.
pub trait Hook {
    fn name(&self) -> &str;

    /// Return `Cancelled` to cancel cancellable events.
    fn on_event(&mut self, event: &HookEvent, ctx: &mut HookContext<'_>) -> EventResult;
}

/// Registered hooks, dispatched in registration order.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn Hook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Box<dyn Hook>) {
        info!("Registered hook: {}", hook.name());
        self.hooks.push(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Dispatch an event to all hooks. Returns the combined result and the
    /// actions requested along the way. A cancelling hook stops propagation.
    pub fn dispatch(
        &mut self,
        event: &HookEvent,
        ctx: &mut HookContext<'_>,
    ) -> (EventResult, Vec<PendingAction>) {
        let cancellable = event.is_cancellable();
        let mut final_result = EventResult::Continue;

        for hook in &mut self.hooks {
            let result = hook.on_event(event, ctx);
            if cancellable && result == EventResult::Cancelled {
                debug!("Hook {} cancelled {event:?}", hook.name());
                final_result = EventResult::Cancelled;
                break;
            }
        }

        (final_result, ctx.take_actions())
    }
}

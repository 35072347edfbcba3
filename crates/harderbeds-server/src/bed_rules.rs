//! The bed rules: unsafe beds refuse sleep, village beds punish sleepers
//! and drop nothing, and phantoms stay away.

use harderbeds_game::{BedTarget, SafetyService};
use harderbeds_world::BlockPos;
use tracing::debug;

use crate::hooks::{EventResult, Hook, HookContext, HookEvent, StatusEffect};

pub const UNSAFE_BED_MESSAGE: &str = "Monsters can reach the bed!";
pub const VILLAGE_BED_MESSAGE: &str = "Prepare for a night full of weird villager dreams....";
pub const PENALTY_MESSAGE: &str = "That was an uncomfortable night...";

/// Effects applied after a night in a village bed.
pub const PENALTY_EFFECTS: [StatusEffect; 4] = [
    StatusEffect::Hunger,
    StatusEffect::Slowness,
    StatusEffect::Weakness,
    StatusEffect::MiningFatigue,
];
/// Five minutes.
pub const PENALTY_DURATION_TICKS: u32 = 6000;

const DAY_LENGTH_TICKS: i64 = 24000;
/// Wake-ups before this time of day count as having slept through the night.
const MORNING_END_TICK: i64 = 1000;

/// Radius around a broken village bed in which dropped beds are removed.
pub const BED_DROP_RADIUS: f32 = 2.0;

/// Whether `block` names a bed of any colour.
pub fn is_bed_block(block: &str) -> bool {
    let path = block.split_once(':').map(|(_, p)| p).unwrap_or(block);
    path == "bed" || path.ends_with("_bed")
}

fn is_phantom(mob_type: &str) -> bool {
    mob_type.split_once(':').map(|(_, p)| p).unwrap_or(mob_type) == "phantom"
}

pub struct BedRules {
    safety: SafetyService,
}

impl BedRules {
    pub fn new(safety: SafetyService) -> Self {
        Self { safety }
    }

    fn on_bed_use(
        &self,
        player: &str,
        bed: BlockPos,
        player_pos: BlockPos,
        ctx: &mut HookContext<'_>,
    ) -> EventResult {
        let settings = ctx.settings;
        if settings.simulate_mob_pathing_on_sleep {
            let target = BedTarget {
                bed,
                sleeper: player_pos,
            };
            let safe = self.safety.is_safe(
                ctx.world,
                &mut *ctx.nav,
                &mut *ctx.particles,
                &settings,
                target,
                &mut *ctx.rng,
            );
            if !safe {
                debug!("{player} may not sleep at {bed}: monsters can reach it");
                ctx.send_message(player, UNSAFE_BED_MESSAGE);
                return EventResult::Cancelled;
            }
        }

        if settings.enable_village_bed_penalty && !self.safety.is_allowed(ctx.world, ctx.structures, bed) {
            ctx.send_message(player, VILLAGE_BED_MESSAGE);
        }
        EventResult::Continue
    }

    fn on_wake_up(
        &self,
        player: &str,
        sleeping_pos: Option<BlockPos>,
        world_time: i64,
        ctx: &mut HookContext<'_>,
    ) {
        if !ctx.settings.enable_village_bed_penalty {
            return;
        }
        if world_time.rem_euclid(DAY_LENGTH_TICKS) >= MORNING_END_TICK {
            return;
        }
        let Some(bed) = sleeping_pos else {
            return;
        };
        if self.safety.is_allowed(ctx.world, ctx.structures, bed) {
            return;
        }

        debug!("{player} slept in a village bed at {bed}, applying penalty");
        for effect in PENALTY_EFFECTS {
            ctx.add_effect(player, effect, 0, PENALTY_DURATION_TICKS);
        }
        ctx.send_message(player, PENALTY_MESSAGE);
    }

    fn on_block_break(&self, position: BlockPos, ctx: &mut HookContext<'_>) {
        if !ctx.settings.prevent_bed_drop_in_villages || !ctx.world.is_authoritative() {
            return;
        }
        if ctx.structures.is_within_village(position) {
            debug!("Bed broken inside a village at {position}, removing drops");
            ctx.remove_bed_drops(position.center(), BED_DROP_RADIUS);
        }
    }
}

impl Hook for BedRules {
    fn name(&self) -> &str {
        "BedRules"
    }

    fn on_event(&mut self, event: &HookEvent, ctx: &mut HookContext<'_>) -> EventResult {
        match event {
            HookEvent::Interact {
                player,
                position,
                player_pos,
                block,
            } if is_bed_block(block) => self.on_bed_use(player, *position, *player_pos, ctx),
            HookEvent::WakeUp {
                player,
                sleeping_pos,
                world_time,
            } => {
                self.on_wake_up(player, *sleeping_pos, *world_time, ctx);
                EventResult::Continue
            }
            HookEvent::BlockBreak {
                position, block, ..
            } if is_bed_block(block) => {
                self.on_block_break(*position, ctx);
                EventResult::Continue
            }
            HookEvent::SpawnAttempt { mob_type, position }
                if is_phantom(mob_type) && ctx.settings.disable_phantom_spawning =>
            {
                debug!("Phantom spawn at {position} cancelled");
                EventResult::Cancelled
            }
            _ => EventResult::Continue,
        }
    }
}

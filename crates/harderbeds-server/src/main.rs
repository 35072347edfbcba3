mod bed_rules;
mod config;
mod hooks;
mod settings_store;

use bed_rules::BedRules;
use config::ServerConfig;
use harderbeds_game::ai::grid_nav::GridNavigator;
use harderbeds_game::particles::{ParticleKind, ParticleLog};
use harderbeds_game::{SafetyService, Settings};
use harderbeds_world::{Block, BlockPos, GridWorld};
use hooks::{EventResult, HookContext, HookEvent, HookRegistry, PendingAction};
use rand::rngs::StdRng;
use rand::SeedableRng;
use settings_store::SettingsStore;
use tracing::{info, warn};

const BED: BlockPos = BlockPos::new(0, 64, 0);
const PLAYER: &str = "Steve";

/// A bed on an open floor inside a village. A dark ledge north-east of the
/// bed is high enough for mobs to spawn on and has a step down to the floor.
fn build_scene(config: &ServerConfig) -> Result<(GridWorld, BlockPos), String> {
    let difficulty = config.world.difficulty()?;
    let mut world = GridWorld::flat(difficulty, config.world.biome(), 0, 0, 24, BED.y - 1);
    world.fill_light(BED.offset(-24, 0, -24), BED.offset(24, 2, 24), 12);

    let ledge = BED.offset(6, 4, 6);
    world.set_block(ledge, Block::Solid);
    world.set_block(BED.offset(5, 1, 6), Block::Solid);
    world.set_light(ledge.up(1), 0);

    world.add_structure(
        "minecraft:village_plains",
        BED.offset(-30, -10, -30),
        BED.offset(30, 20, 30),
    );
    Ok((world, ledge))
}

fn dispatch(
    registry: &mut HookRegistry,
    world: &GridWorld,
    settings: Settings,
    rng: &mut StdRng,
    event: HookEvent,
) -> (EventResult, Vec<PendingAction>) {
    let mut nav = GridNavigator::new(world);
    let mut particles = ParticleLog::new();
    let (result, actions) = {
        let mut ctx = HookContext::new(world, world, &mut nav, &mut particles, rng, settings);
        registry.dispatch(&event, &mut ctx)
    };

    let flames = particles
        .drain()
        .into_iter()
        .filter(|b| b.kind == ParticleKind::Flame)
        .count();
    info!("{event:?} -> {result:?} ({flames} path markers)");
    for action in &actions {
        info!("  requested: {action:?}");
    }
    (result, actions)
}

fn main() {
    let config = match ServerConfig::load("harderbeds.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load harderbeds.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Harder Beds v{} starting", env!("CARGO_PKG_VERSION"));

    let search = match config.search.to_search_config() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid [search] section: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Search volume: {} blocks (radius {} / {}), inner exclusion {}, light below {}",
        search.volume(),
        search.horizontal_radius,
        search.vertical_radius,
        search.inner_exclusion_radius,
        search.min_light_level
    );

    let mut store = SettingsStore::load_or_create(&config.settings.path);
    info!("Settings ({}): {:?}", store.path().display(), store.settings());

    let (mut world, ledge) = match build_scene(&config) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Invalid [world] section: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "World: difficulty {}, biome {}, seed {}, bed at {BED}",
        config.world.difficulty,
        config.world.biome(),
        config.world.seed
    );

    let mut registry = HookRegistry::new();
    registry.register(Box::new(BedRules::new(SafetyService::new(search))));
    info!("{} hook(s) registered", registry.hook_count());

    let mut rng = StdRng::seed_from_u64(config.world.seed);
    let settings = store.settings();
    let use_bed = HookEvent::Interact {
        player: PLAYER.into(),
        position: BED,
        player_pos: BED,
        block: "minecraft:red_bed".into(),
    };

    let (result, _) = dispatch(&mut registry, &world, settings, &mut rng, use_bed.clone());
    if result == EventResult::Cancelled {
        info!("Lighting up the ledge at {ledge} and trying again");
        world.set_light(ledge.up(1), 15);
        let (result, _) = dispatch(&mut registry, &world, settings, &mut rng, use_bed);
        if result == EventResult::Cancelled {
            warn!("Bed at {BED} is still unsafe");
        }
    }

    dispatch(
        &mut registry,
        &world,
        settings,
        &mut rng,
        HookEvent::WakeUp {
            player: PLAYER.into(),
            sleeping_pos: Some(BED),
            world_time: config.world.wake_time,
        },
    );
    // Break the bed twice: once with drop protection off for this run only.
    store.update(|s| s.prevent_bed_drop_in_villages = false);
    dispatch(
        &mut registry,
        &world,
        store.settings(),
        &mut rng,
        HookEvent::BlockBreak {
            player: PLAYER.into(),
            position: BED,
            block: "minecraft:red_bed".into(),
        },
    );
    store.update(|s| s.prevent_bed_drop_in_villages = settings.prevent_bed_drop_in_villages);
    dispatch(
        &mut registry,
        &world,
        settings,
        &mut rng,
        HookEvent::BlockBreak {
            player: PLAYER.into(),
            position: BED,
            block: "minecraft:red_bed".into(),
        },
    );
    dispatch(
        &mut registry,
        &world,
        settings,
        &mut rng,
        HookEvent::SpawnAttempt {
            mob_type: "minecraft:phantom".into(),
            position: BED.up(24),
        },
    );

    if store.save().is_ok() {
        info!("Settings saved to {}", store.path().display());
    }
    info!("Done");
}

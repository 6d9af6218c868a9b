//! # TESSERA Walker
//!
//! Headless demo: spawns one player and walks it through the world,
//! printing the zone it ends up in.
//!
//! ```bash
//! # Defaults: production config, data/catalog.toml
//! tessera-walk
//!
//! # Explicit files and a longer walk
//! RUST_LOG=tessera=debug tessera-walk data/world.toml data/catalog.toml 200
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use tessera::{
    Catalog, CommandOutcome, ConfigError, ConfigResult, GameLoop, MoveOutcome, PlayerCommand, SessionId, World, WorldConfig,
    WorldEvent, ZoneCoord,
};

const DEFAULT_CATALOG: &str = "data/catalog.toml";
const DEFAULT_STEPS: u32 = 120;

/// Direction cycle: a long westward leg, then a loop.
const ROUTE: [(i32, i32, u32); 5] = [(-1, 0, 60), (0, 1, 10), (1, 0, 20), (0, -1, 10), (-1, 0, 20)];

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let (world, steps) = match setup() {
        Ok(inputs) => inputs,
        Err(err) => {
            eprintln!("tessera-walk: {err}");
            return ExitCode::FAILURE;
        }
    };
    match walk(world, steps) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("tessera-walk: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the world from the command line: `[world.toml] [catalog.toml] [steps]`.
fn setup() -> ConfigResult<(World, u32)> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorldConfig::load(&path)?,
        None => WorldConfig::production(),
    };
    let catalog_path = args.next().unwrap_or_else(|| DEFAULT_CATALOG.to_string());
    let catalog = Catalog::load(&catalog_path)?;
    let steps = match args.next() {
        Some(raw) => raw.parse::<u32>().map_err(|e| ConfigError::Invalid {
            field: "steps",
            reason: format!("{raw:?} is not a step count: {e}"),
        })?,
        None => DEFAULT_STEPS,
    };
    Ok((World::new(config, Arc::new(catalog)), steps))
}

fn walk(world: World, steps: u32) -> Result<(), String> {
    let mut game = GameLoop::new(world);
    let sender = game.sender();
    let session = SessionId(1);

    sender.send(PlayerCommand::Join {
        session,
        name: "walker".to_string(),
        zone: ZoneCoord::new(0, 0),
    });
    let report = game.tick();
    let Some(CommandOutcome::Joined { player, .. }) = report.outcomes.first().cloned() else {
        return Err("could not place the walker in zone (0, 0)".to_string());
    };

    let mut moved = 0u32;
    let mut blocked = 0u32;
    let mut kills = 0u32;
    let mut crossings = 0u32;

    let route = ROUTE
        .iter()
        .cycle()
        .flat_map(|&(dx, dy, n)| std::iter::repeat((dx, dy)).take(n as usize));
    for (dx, dy) in route.take(steps as usize) {
        sender.send(PlayerCommand::Move { session, dx, dy });
        let report = game.tick();

        for outcome in &report.outcomes {
            if let CommandOutcome::Moved { outcome, .. } = outcome {
                match outcome {
                    MoveOutcome::Moved { .. } => moved += 1,
                    MoveOutcome::Blocked(_) | MoveOutcome::NotInWorld => blocked += 1,
                }
            }
        }
        for event in &report.events {
            match event {
                WorldEvent::EnemyKilled { killer: Some(_), .. } => kills += 1,
                WorldEvent::ZoneCrossed { entity, .. } if *entity == player => crossings += 1,
                _ => {}
            }
        }
    }

    let world = game.world();
    let Some(entity) = world.entity(player) else {
        return Err("walker vanished".to_string());
    };
    let Some(stats) = entity.as_player() else {
        return Err("walker is not a player".to_string());
    };

    println!("═══════════════════════════════════════════════════════════════════");
    println!("  zone ({}, {})  position ({}, {})", entity.zone.x, entity.zone.y, entity.x, entity.y);
    println!(
        "  health {}  experience {}  level {}  items {}",
        stats.health,
        stats.experience,
        stats.level,
        stats.inventory.len()
    );
    println!("  steps {moved}  blocked {blocked}  kills {kills}  zones crossed {crossings}");
    if !stats.info.is_empty() {
        println!("  last: {}", stats.info);
    }
    println!("═══════════════════════════════════════════════════════════════════");
    if let Some(view) = world.render_world(player) {
        print!("{view}");
    }
    Ok(())
}

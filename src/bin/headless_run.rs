//! Headless Run
//!
//! Plays a seeded game with a scripted player and prints a summary. Same
//! seed and arguments, same output.

use std::path::PathBuf;

use clap::Parser;
use grindfest::core::types::{Direction, Position};
use grindfest::simulation::{ActionOutcome, PlayerAction, World, WorldSummary};
use grindfest::world::load_map_file;
use grindfest::SimulationConfig;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

const MAX_EVENTS_PER_TURN: usize = 10_000;

/// Headless Run - scripted player against the simulation
#[derive(Parser, Debug)]
#[command(name = "headless_run")]
#[command(about = "Run a seeded game with a scripted player and print a summary")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Player turns to play
    #[arg(long, default_value_t = 200)]
    turns: usize,

    /// Number of worms to spawn
    #[arg(long, default_value_t = 3)]
    worms: usize,

    /// Map file to load; a dungeon is generated when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Simulation config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    seed: u64,
    turns_played: usize,
    events_resolved: usize,
    moves: usize,
    blocked: usize,
    engagements: usize,
    exits_reached: usize,
    world: WorldSummary,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grindfest=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let result = match run(&args, seed) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Run failed: {err}");
            std::process::exit(1);
        }
    };

    match args.format.as_str() {
        "text" => print_text(&result),
        _ => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Failed to serialize result: {err}");
                std::process::exit(1);
            }
        },
    }
}

fn run(args: &Args, seed: u64) -> grindfest::Result<RunResult> {
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let mut world = match &args.map {
        Some(path) => World::new(load_map_file(path)?, config, seed, Position::new(1, 1))?,
        None => World::generated("Headless", 54, 16, config, seed)?,
    };
    world.spawn_worms(args.worms)?;

    // Separate stream so the script does not perturb the world's rng
    let mut script_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    let mut result = RunResult {
        seed,
        turns_played: 0,
        events_resolved: 0,
        moves: 0,
        blocked: 0,
        engagements: 0,
        exits_reached: 0,
        world: world.summary(),
    };

    while result.turns_played < args.turns {
        result.events_resolved += world.run_until_input(MAX_EVENTS_PER_TURN);
        if world.is_game_over() || !world.awaiting_input() {
            break;
        }

        let action = choose_action(&world, &mut script_rng);
        match world.apply_player_action(action) {
            Ok(ActionOutcome::Blocked) => {
                result.blocked += 1;
                world.apply_player_action(PlayerAction::Wait)?;
            }
            Ok(ActionOutcome::Engaged { .. }) => result.engagements += 1,
            Ok(ActionOutcome::ReachedExit(_)) => {
                result.moves += 1;
                result.exits_reached += 1;
            }
            Ok(ActionOutcome::Moved { .. } | ActionOutcome::Teleported { .. }) => result.moves += 1,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Scripted action rejected, waiting");
                world.apply_player_action(PlayerAction::Wait)?;
            }
        }
        result.turns_played += 1;
    }

    result.world = world.summary();
    Ok(result)
}

/// Fight anything adjacent, otherwise wander
fn choose_action(world: &World, rng: &mut ChaCha8Rng) -> PlayerAction {
    let Some(player) = world.player() else {
        return PlayerAction::Wait;
    };

    if !player.combat.engaged {
        if let Some(target) = world.nearest_target() {
            let adjacent = world
                .actor(target)
                .is_some_and(|t| t.position.chebyshev(&player.position) <= 1);
            if adjacent {
                return PlayerAction::Engage(target);
            }
        }
    }

    let open: Vec<Direction> = Direction::CARDINALS
        .into_iter()
        .filter(|dir| world.map().is_free(player.position + *dir))
        .collect();
    match open.choose(rng) {
        Some(dir) => {
            let (dx, dy) = dir.delta();
            PlayerAction::MoveBy { dx, dy }
        }
        None => PlayerAction::Wait,
    }
}

fn print_text(result: &RunResult) {
    println!("Headless Run");
    println!("============");
    println!("Seed: {}", result.seed);
    println!("Turns played: {}", result.turns_played);
    println!("Events resolved: {}", result.events_resolved);
    println!(
        "Moves: {}  Blocked: {}  Engagements: {}  Exits: {}",
        result.moves, result.blocked, result.engagements, result.exits_reached
    );
    println!("Final tick: {}", result.world.tick);
    println!("Game over: {}", result.world.game_over);
    for actor in &result.world.actors {
        println!(
            "  {} {:<12} at {} hp={} active={} burrowed={}",
            actor.id, actor.name, actor.position, actor.hp, actor.active, actor.burrowed
        );
    }
}

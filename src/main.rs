//! Grindfest - interactive text front-end
//!
//! Reads one command per line from stdin, feeds it to the world as a player
//! action, and redraws the visible part of the map.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use grindfest::core::error::Result;
use grindfest::core::types::Position;
use grindfest::simulation::{ActionOutcome, PlayerAction, World};
use grindfest::world::load_map_file;
use grindfest::SimulationConfig;

/// Events resolved between two player turns before the loop gives up
const MAX_EVENTS_PER_TURN: usize = 10_000;

#[derive(Parser, Debug)]
#[command(name = "grindfest")]
#[command(about = "Turn-based roguelike with burrowing worms")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Map file to load; a dungeon is generated when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Simulation config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of worms to spawn
    #[arg(long, default_value_t = 3)]
    worms: usize,

    /// Generated dungeon width
    #[arg(long, default_value_t = 54)]
    width: usize,

    /// Generated dungeon height
    #[arg(long, default_value_t = 16)]
    height: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grindfest=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let mut world = match &args.map {
        Some(path) => {
            let map = load_map_file(path)?;
            let start = Position::new(1, 1);
            World::new(map, config, seed, start)?
        }
        None => World::generated("The Grind", args.width, args.height, config, seed)?,
    };
    world.spawn_worms(args.worms)?;

    println!("=== GRINDFEST === (seed {seed})");
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        world.run_until_input(MAX_EVENTS_PER_TURN);
        if world.is_game_over() {
            draw(&world);
            println!("You have been slain. Game over.");
            break;
        }
        draw(&world);

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let action = match parse_command(line.trim(), &world) {
            Command::Quit => break,
            Command::Help => {
                print_help();
                continue;
            }
            Command::Unknown(text) => {
                println!("Unknown command: {text}");
                continue;
            }
            Command::NoTarget => {
                println!("No valid target found.");
                continue;
            }
            Command::Act(action) => action,
        };

        match world.apply_player_action(action) {
            Ok(ActionOutcome::Blocked) => println!("You can't go that way."),
            Ok(ActionOutcome::ReachedExit(exit)) => {
                println!(
                    "You found the way to {} at {}.",
                    exit.destination_map, exit.destination
                );
            }
            Ok(_) => {}
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}

enum Command {
    Act(PlayerAction),
    Help,
    Quit,
    NoTarget,
    Unknown(String),
}

fn parse_command(input: &str, world: &World) -> Command {
    let step = |dx, dy| Command::Act(PlayerAction::MoveBy { dx, dy });
    match input {
        "k" | "w" => step(0, -1),
        "j" | "s" => step(0, 1),
        "h" | "a" => step(-1, 0),
        "l" | "d" => step(1, 0),
        "y" => step(-1, -1),
        "u" => step(1, -1),
        "b" => step(-1, 1),
        "n" => step(1, 1),
        "." | "" => Command::Act(PlayerAction::Wait),
        "/attack" => match world.nearest_target() {
            Some(target) => Command::Act(PlayerAction::Engage(target)),
            None => Command::NoTarget,
        },
        "/disengage" => Command::Act(PlayerAction::Disengage),
        "?" | "/help" => Command::Help,
        "q" | "quit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

fn print_help() {
    println!("Move: hjkl/wasd, yubn diagonals   Wait: .");
    println!("/attack engages the nearest creature, /disengage stops");
    println!("? for help, q to quit");
}

fn draw(world: &World) {
    let map = world.map();
    let mut rows: Vec<Vec<char>> = (0..map.height())
        .map(|y| {
            (0..map.width())
                .map(|x| {
                    let pos = Position::new(x as i32, y as i32);
                    match map.tile(pos) {
                        Some(tile) if tile.visible || tile.explored => tile.tile_type.symbol(),
                        _ => ' ',
                    }
                })
                .collect()
        })
        .collect();

    for actor in world.actors().iter().filter(|a| a.is_placed()) {
        let visible = map.tile(actor.position).is_some_and(|t| t.visible);
        if !visible {
            continue;
        }
        if let Some(cell) = rows
            .get_mut(actor.position.y as usize)
            .and_then(|row| row.get_mut(actor.position.x as usize))
        {
            *cell = actor.glyph;
        }
    }

    for row in rows {
        println!("{}", row.into_iter().collect::<String>());
    }

    if let Some(player) = world.player() {
        let status = if player.combat.engaged { " [ENGAGED]" } else { "" };
        println!(
            "HP {}/{}  TP {}  Tick {}{}",
            player.vitals.hp,
            player.vitals.max_hp,
            player.vitals.tp,
            world.now(),
            status
        );
    }
    for message in world.messages().recent(5) {
        println!("  {}", message.text);
    }
}

//! # Barrow Headless Driver
//!
//! Runs the simulation core without a renderer: generates a dungeon, drives
//! the scheduler with a small autopilot policy, then dumps the explored map,
//! the message log, and a summary. Mostly useful for eyeballing generation
//! and for reproducing seeds from bug reports.

use barrow::{
    config, utils, BarrowResult, CancelTargeting, Command, Direction, ItemKind, Position,
    RunState, Session, StatBoost,
};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::Rng;

/// Command line arguments for the headless driver.
#[derive(Parser, Debug)]
#[command(name = "barrow")]
#[command(about = "Headless driver for the barrow dungeon simulation")]
#[command(version)]
struct Args {
    /// Random seed; omitted means a fresh one
    #[arg(short, long)]
    seed: Option<u64>,

    /// Scheduler ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Write the final session snapshot to this path
    #[arg(long)]
    save: Option<std::path::PathBuf>,
}

fn main() -> BarrowResult<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("barrow v{} starting with seed {}", barrow::VERSION, seed);

    let mut rng = utils::create_rng(seed);
    let mut session = Session::new(&mut rng)?;
    let mut targeting = CancelTargeting;

    let mut ticks_run = 0;
    for _ in 0..args.ticks {
        if session.run_state() == RunState::Dead {
            break;
        }
        if session.level_up_pending() {
            session.choose_boost(StatBoost::Constitution)?;
        }
        let command = autopilot(&session, &mut rng);
        session.advance(command, &mut targeting, &mut rng)?;
        ticks_run += 1;
    }

    println!("{}", render_text(&session));
    println!();
    for (line, _color) in session.messages().lines() {
        println!("  {}", line);
    }
    println!();
    print_summary(&session, seed, ticks_run);

    if let Some(path) = args.save {
        std::fs::write(&path, session.save_to_json()?)?;
        println!("snapshot written to {}", path.display());
    }
    Ok(())
}

/// A deliberately dumb policy: descend when standing on the stairs, grab
/// items underfoot, quaff a potion when badly hurt, otherwise wander.
fn autopilot(session: &Session, rng: &mut StdRng) -> Option<Command> {
    let player = session.player()?;

    if let Some(stairs) = session.entity(session.stairs_id()) {
        if stairs.pos == player.pos {
            return Some(Command::Descend);
        }
    }

    if session.inventory().len() < config::INVENTORY_CAPACITY
        && session
            .entities()
            .iter()
            .any(|e| e.item.is_some() && e.pos == player.pos)
    {
        return Some(Command::PickUp);
    }

    if let Some(fighter) = player.fighter {
        if fighter.hp < fighter.max_hp / 2 {
            let potion = session
                .inventory()
                .iter()
                .position(|e| matches!(e.item, Some(ItemKind::Heal { .. })));
            if let Some(slot) = potion {
                return Some(Command::UseItem(slot));
            }
        }
    }

    let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
    Some(Command::Move(direction))
}

/// Draws the session the way a renderer would: explored terrain, visible
/// entities on top, the player above everything.
fn render_text(session: &Session) -> String {
    let map = session.map();
    let mut grid = vec![vec![' '; map.width as usize]; map.height as usize];

    for y in 0..map.height {
        for x in 0..map.width {
            let pos = Position::new(x, y);
            let Some(tile) = map.tile(pos) else {
                continue;
            };
            grid[y as usize][x as usize] = if !tile.explored {
                ' '
            } else if tile.blocked {
                '#'
            } else if session.is_visible(pos) {
                '.'
            } else {
                ','
            };
        }
    }

    for entity in session.entities() {
        if entity.id != session.player_id() && session.entity_visible(entity) {
            grid[entity.pos.y as usize][entity.pos.x as usize] = entity.glyph;
        }
    }
    if let Some(player) = session.player() {
        grid[player.pos.y as usize][player.pos.x as usize] = player.glyph;
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_summary(session: &Session, seed: u64, ticks: u64) {
    let (hp, max_hp) = session
        .player()
        .and_then(|p| p.fighter)
        .map(|f| (f.hp, f.max_hp))
        .unwrap_or((0, 0));
    println!(
        "seed {} | {} ticks | depth {} | level {} | hp {}/{} | {:?}",
        seed,
        ticks,
        session.depth(),
        session.player_level(),
        hp,
        max_hp,
        session.run_state()
    );
}

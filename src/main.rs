//! Starfall - headless skirmish runner
//!
//! Sets up a star map with a raiding fleet plotted onto a defended system,
//! runs strategic turns on the background worker until the fleets meet and
//! fight, then prints the combat reports.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use starfall::combat::{CombatReport, CombatWinner};
use starfall::core::config::{load_config, set_config, TacticsConfig};
use starfall::core::error::{Result, StarfallError};
use starfall::core::types::GridPos;
use starfall::starmap::{PlayerList, StarMap, Weapon};
use starfall::turn::{StrategicTurn, TurnWorker};

#[derive(Parser, Debug)]
#[command(name = "starfall")]
#[command(about = "Run a headless fleet engagement and report the outcome")]
struct Args {
    /// TOML configuration file (defaults are used for missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the combat seed from the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Ships per fleet
    #[arg(long, default_value_t = 3)]
    ships: u32,

    /// Strategic turns to run before giving up
    #[arg(long, default_value_t = 100)]
    turns: u32,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "starfall=debug" } else { "starfall=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => TacticsConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.combat_seed = seed;
    }
    config.validate().map_err(StarfallError::Config)?;
    if set_config(config.clone()).is_err() {
        tracing::warn!("global config was already set");
    }

    if args.ships as usize > config.max_fleet_size {
        return Err(StarfallError::Config(format!(
            "--ships {} exceeds max_fleet_size {}",
            args.ships, config.max_fleet_size
        )));
    }

    let (map, players) = build_scenario(&config, args.ships)?;
    let mut turn = StrategicTurn::new(map, players, config);
    let mut reports = Vec::new();

    for _ in 0..args.turns {
        let handle = TurnWorker::spawn(turn)?;
        let outcome = handle.finished().await?;
        turn = outcome.processor;

        reports.extend(turn.take_reports());
        if !reports.is_empty() || !turn.has_moving_fleets() {
            break;
        }
        turn.begin_next_turn();
    }
    tracing::info!(turns = turn.turn(), combats = reports.len(), "skirmish finished");

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&reports)?),
        _ => print_text(&reports, &turn.players),
    }
    Ok(())
}

/// Two realms: a raiding fleet on the west edge, a defended system to the
/// east, and a nebula wall with a single gap between them
fn build_scenario(config: &TacticsConfig, ships: u32) -> Result<(StarMap, PlayerList)> {
    let mut map = StarMap::from_config(config);
    let (width, height) = (config.starmap_width, config.starmap_height);
    let row = height / 2;

    let wall = width / 2;
    if width >= 8 && height >= 8 {
        for y in 0..height {
            if y != row - 2 {
                map.add_obstacle(wall, y)?;
            }
        }
    }

    let mut players = PlayerList::new();
    let terrans = players.add_player("Terran Union");
    let zorg = players.add_player("Zorg Hive");

    let raiders = players.create_fleet(terrans, "Third Raiding Group", GridPos::new(1, row))?;
    let garrison = players.create_fleet(zorg, "Hive Garrison", GridPos::new(width - 2, row))?;

    for i in 0..ships {
        let weapons = if i % 2 == 0 {
            vec![Weapon::laser(), Weapon::missile()]
        } else {
            vec![Weapon::railgun()]
        };
        let ship = players
            .build_ship(&format!("TUS Vanguard {}", i + 1))
            .with_initiative(6 + i % 3)
            .with_weapons(weapons);
        players.add_ship(raiders, ship)?;

        let ship = players
            .build_ship(&format!("Hive Drone {}", i + 1))
            .with_hull(12)
            .with_shield(4)
            .with_initiative(5 + i % 2)
            .with_weapons(vec![Weapon::missile(), Weapon::laser()]);
        players.add_ship(garrison, ship)?;
    }

    let target = GridPos::new(width - 2, row);
    if let Some(fleet) = players.fleet_mut(raiders) {
        if !fleet.plot_course(&map, target)? {
            tracing::warn!(?target, "raiders found no course to the garrison");
        }
    }
    Ok((map, players))
}

fn print_text(reports: &[CombatReport], players: &PlayerList) {
    if reports.is_empty() {
        println!("No combat took place.");
    }
    for report in reports {
        println!("=== Combat {} ===", report.combat);
        match report.winner {
            CombatWinner::Side(side) => println!("Winner: {:?} ({:?})", side, report.winner_fleet),
            CombatWinner::Draw => println!("Draw - both fleets lost"),
        }
        println!("Rounds fought: {}", report.rounds);
        println!("Ships destroyed: {}", report.destroyed_ships.len());
        println!("Fleets removed: {:?}", report.removed_fleets);
        if let Some(pos) = report.new_position {
            println!("Victor holds sector ({}, {})", pos.x, pos.y);
        }
    }

    println!();
    for player in players.players() {
        println!("{}:", player.name);
        for fleet in &player.fleets {
            println!(
                "  {} at ({}, {}) - {} ships, strength {}",
                fleet.name,
                fleet.position.x,
                fleet.position.y,
                fleet.ships.len(),
                fleet.strength()
            );
        }
    }
}

//! SkyHustle Intel - console front end
//!
//! Plays the part of the chat handler: reads spy commands from stdin,
//! runs them through the mission desk, and prints chat-style replies.

use clap::Parser;
use skyhustle_intel::core::config::{load_rules, EspionageRules};
use skyhustle_intel::core::error::Result;
use skyhustle_intel::core::types::PlayerId;
use skyhustle_intel::espionage::{ResolutionEngine, SeededSource};
use skyhustle_intel::player::{Player, COUNTER_INTEL_TECH, ESPIONAGE_TECH};
use skyhustle_intel::services::{InMemoryMissionLog, MissionDesk, RecordingNotifier};
use skyhustle_intel::ui::{render_error, render_history, render_leaderboard, render_result};

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The commander at the keyboard
const YOU: PlayerId = PlayerId(1);

type Desk = MissionDesk<InMemoryMissionLog, RecordingNotifier>;

/// Console spy desk - launch missions against rival commanders
#[derive(Parser, Debug)]
#[command(name = "skyhustle-intel")]
#[command(about = "Play espionage missions from the terminal")]
struct Args {
    /// Espionage rule set (TOML); defaults are used if the file is missing
    #[arg(long, default_value = "data/espionage_rules.toml")]
    rules: PathBuf,

    /// Fixed seed for reproducible missions
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("skyhustle_intel=info")),
        )
        .init();

    // Load the rule set and build the engine around it
    let rules = load_startup_rules(&args.rules);
    tracing::info!(rules = %rules.name, "SkyHustle Intel starting...");

    let engine = ResolutionEngine::new(rules)?;
    let mut desk = MissionDesk::new(engine, InMemoryMissionLog::new(), RecordingNotifier::new());

    // Populate rivals to spy on
    seed_roster(&mut desk);

    // Fixed seed replays the same dice; otherwise seed from the OS
    let mut rng = match args.seed {
        Some(seed) => {
            tracing::info!(seed, "Using fixed mission seed");
            SeededSource::from_seed(seed)
        }
        None => SeededSource::from_entropy(),
    };

    // Display welcome message
    println!("\n=== SKYHUSTLE INTEL ===");
    println!("Commands:");
    println!("  spy <target-id> <kind> <count> [<kind> <count> ...]");
    println!("  status / s      - Show your commander");
    println!("  log             - Your recent missions");
    println!("  incoming        - Missions aimed at you");
    println!("  board           - Leaderboard");
    println!("  quit / q        - Exit");
    println!();

    // Main command loop
    loop {
        // Prompt for input
        print!("> ");
        io::stdout().flush()?;

        // Read input (EOF ends the session)
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        // Handle empty input
        if input.is_empty() {
            continue;
        }

        // Handle quit command
        if input == "quit" || input == "q" {
            break;
        }

        // Handle status command
        if input == "status" || input == "s" {
            display_status(&desk);
            continue;
        }

        // Handle mission history commands
        if input == "log" {
            print!("{}", render_history(&desk.history(YOU, 10)));
            continue;
        }

        if input == "incoming" {
            print!("{}", render_history(&desk.incoming(YOU, 10)));
            continue;
        }

        // Handle leaderboard command
        if input == "board" {
            print!("{}", render_leaderboard(&desk.leaderboard(10)));
            continue;
        }

        // Handle spy <target-id> <kind> <count> ...
        if let Some(args) = input.strip_prefix("spy ") {
            match parse_spy_args(args) {
                Some((target, units)) => match desk.launch(YOU, target, &units, &mut rng) {
                    Ok(result) => print!("{}", render_result(&result)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Mission rejected");
                        println!("{}", render_error(&e));
                    }
                },
                None => println!("Usage: spy <target-id> <kind> <count> [<kind> <count> ...]"),
            }
            continue;
        }

        println!("Unknown command. Available: spy, status, log, incoming, board, quit");
    }

    println!("\nGoodbye, Commander. {} missions on file.", desk.store().len());
    Ok(())
}

fn load_startup_rules(path: &Path) -> EspionageRules {
    if !path.exists() {
        return EspionageRules::default();
    }
    match load_rules(path) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to default espionage rules");
            EspionageRules::default()
        }
    }
}

/// `<target-id> <kind> <count> ...`; counts may be negative so the engine can reject them
fn parse_spy_args(args: &str) -> Option<(PlayerId, BTreeMap<String, i64>)> {
    let mut parts = args.split_whitespace();
    let target = PlayerId(parts.next()?.parse().ok()?);

    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() || rest.len() % 2 != 0 {
        return None;
    }

    // Repeated kinds are summed; an overflowing total is unusable input
    let mut units: BTreeMap<String, i64> = BTreeMap::new();
    for pair in rest.chunks(2) {
        let count: i64 = pair[1].parse().ok()?;
        let total = units.entry(pair[0].to_string()).or_insert(0);
        *total = total.checked_add(count)?;
    }
    Some((target, units))
}

fn seed_roster(desk: &mut Desk) {
    let you = Player::new(YOU, "Vega")
        .with_units("spy_drones", 20)
        .with_units("fighters", 6)
        .with_tech(ESPIONAGE_TECH, 4);
    let rivals = [
        Player::new(PlayerId(2), "Orion")
            .with_units("cruisers", 4)
            .with_units("fighters", 10)
            .with_building("shipyard", 2)
            .with_tech(COUNTER_INTEL_TECH, 1),
        Player::new(PlayerId(3), "Lyra")
            .with_units("battleships", 2)
            .with_building("fortress", 3)
            .with_tech(COUNTER_INTEL_TECH, 5),
        Player::new(PlayerId(4), "Draco").with_units("fighters", 25),
    ];

    desk.register(you);
    let count = rivals.len();
    for rival in rivals {
        desk.register(rival);
    }
    tracing::info!("Registered {} rival commanders", count);
}

fn display_status(desk: &Desk) {
    let Some(you) = desk.player(YOU) else {
        return;
    };
    println!();
    println!("--- Commander {} | Power: {} ---", you.commander_name, you.power_score());
    println!("Espionage tech: {}", you.espionage_level());
    for (kind, count) in &you.units {
        println!("  {}: {}", kind, count);
    }
    println!("Rivals:");
    for player in desk.players().filter(|p| p.id != YOU) {
        println!("  #{} {}", player.id, player.commander_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_kind() {
        let (target, units) = parse_spy_args("2 spy_drones 5").unwrap();
        assert_eq!(target, PlayerId(2));
        assert_eq!(units.get("spy_drones"), Some(&5));
    }

    #[test]
    fn test_parse_sums_repeated_kinds() {
        let (_, units) = parse_spy_args("3 spy_drones 4 fighters 1 spy_drones 2").unwrap();
        assert_eq!(units.get("spy_drones"), Some(&6));
        assert_eq!(units.get("fighters"), Some(&1));
    }

    #[test]
    fn test_parse_keeps_negative_counts_for_engine() {
        let (_, units) = parse_spy_args("2 spy_drones -3").unwrap();
        assert_eq!(units.get("spy_drones"), Some(&-3));
    }

    #[test]
    fn test_parse_rejects_overflowing_total() {
        assert!(parse_spy_args("2 spy_drones 9223372036854775807 spy_drones 1").is_none());
        assert!(parse_spy_args("2 spy_drones -9223372036854775808 spy_drones -1").is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(parse_spy_args("").is_none());
        assert!(parse_spy_args("orion spy_drones 1").is_none());
        assert!(parse_spy_args("2").is_none());
        assert!(parse_spy_args("2 spy_drones").is_none());
        assert!(parse_spy_args("2 spy_drones many").is_none());
    }
}

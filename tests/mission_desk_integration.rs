//! Integration tests for the mission desk
//!
//! Covers the full caller-side flow: reserve units, resolve, deduct
//! losses, record history, and alert the defender.

use std::collections::BTreeMap;

use skyhustle_intel::core::config::load_rules;
use skyhustle_intel::core::types::PlayerId;
use skyhustle_intel::espionage::{IntelCategory, ResolutionEngine, ScriptedSource};
use skyhustle_intel::player::{Player, COUNTER_INTEL_TECH, ESPIONAGE_TECH};
use skyhustle_intel::services::{InMemoryMissionLog, MissionDesk, RecordingNotifier};
use skyhustle_intel::ui::{render_history, render_result};

const VEGA: PlayerId = PlayerId(1);
const ORION: PlayerId = PlayerId(2);

fn desk() -> MissionDesk<InMemoryMissionLog, RecordingNotifier> {
    let rules_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/espionage_rules.toml");
    let engine = ResolutionEngine::new(load_rules(&rules_path).unwrap()).unwrap();

    let mut desk = MissionDesk::new(engine, InMemoryMissionLog::new(), RecordingNotifier::new());
    desk.register(
        Player::new(VEGA, "Vega")
            .with_units("spy_drones", 12)
            .with_tech(ESPIONAGE_TECH, 6),
    );
    desk.register(
        Player::new(ORION, "Orion")
            .with_units("battleships", 2)
            .with_building("shipyard", 4)
            .with_tech(COUNTER_INTEL_TECH, 2),
    );
    desk
}

fn drones(n: i64) -> BTreeMap<String, i64> {
    BTreeMap::from([("spy_drones".to_string(), n)])
}

/// A campaign of three missions against the same rival
#[test]
fn test_mission_campaign() {
    let mut desk = desk();

    // 1. Clean success: full intel at tier 3
    let mut rng = ScriptedSource::new([0.1, 0.9]);
    let first = desk.launch(VEGA, ORION, &drones(4), &mut rng).unwrap();
    assert!(first.success() && !first.detected());
    assert_eq!(
        first.report().unwrap().categories(),
        IntelCategory::ALL.to_vec()
    );
    assert!(render_result(&first).contains("battleships"));

    // 2. Detected success: loses a fifth of the drones
    let mut rng = ScriptedSource::new([0.1, 0.0]);
    let second = desk.launch(VEGA, ORION, &drones(10), &mut rng).unwrap();
    assert!(second.success() && second.detected());
    assert_eq!(second.units_lost().get("spy_drones"), Some(&2));
    assert_eq!(desk.player(VEGA).unwrap().unit_count("spy_drones"), 10);

    // 3. Detected failure: loses half
    let mut rng = ScriptedSource::new([0.99, 0.0]);
    let third = desk.launch(VEGA, ORION, &drones(10), &mut rng).unwrap();
    assert!(!third.success() && third.detected());
    assert_eq!(desk.player(VEGA).unwrap().unit_count("spy_drones"), 5);

    // History is newest first and the defender got two alerts
    let history = desk.history(VEGA, 10);
    assert_eq!(history.len(), 3);
    assert_eq!(history[0], third);
    assert_eq!(history[2], first);
    assert_eq!(desk.incoming(ORION, 10).len(), 3);
    assert_eq!(desk.notifier().outbox.len(), 2);
    assert!(render_history(&history).contains("failure (detected)"));
}

/// Rejected missions leave no trace
#[test]
fn test_rejected_mission_changes_nothing() {
    let mut desk = desk();
    let mut rng = ScriptedSource::new(Vec::<f64>::new());

    assert!(desk.launch(VEGA, ORION, &drones(50), &mut rng).is_err());
    assert!(desk.launch(VEGA, ORION, &drones(-1), &mut rng).is_err());

    assert!(desk.store().is_empty());
    assert!(desk.notifier().outbox.is_empty());
    assert_eq!(desk.player(VEGA).unwrap().unit_count("spy_drones"), 12);
}

#[test]
fn test_leaderboard_ranks_fleet_power() {
    let desk = desk();
    let board = desk.leaderboard(5);
    assert_eq!(board[0].id, ORION);
    assert_eq!(board[0].power_score, 500);
    assert_eq!(board[1].id, VEGA);
}

//! Mission desk - the caller side of a spy mission
//!
//! Gathers attacker and defender state, hands a request to the engine,
//! then applies the consequences: losses, history, and the defender alert.

use ahash::AHashMap;
use std::collections::BTreeMap;

use crate::core::error::{IntelError, Result};
use crate::core::types::{PlayerId, UnitCounts};
use crate::espionage::engine::{MissionRequest, ResolutionEngine};
use crate::espionage::randomness::RandomnessSource;
use crate::espionage::result::{MissionResult, Participant};
use crate::player::leaderboard::{leaderboard, LeaderboardEntry};
use crate::player::profile::Player;
use crate::services::ledger::MissionStore;
use crate::services::notify::Notifier;

pub struct MissionDesk<S, N> {
    engine: ResolutionEngine,
    players: AHashMap<PlayerId, Player>,
    store: S,
    notifier: N,
}

impl<S: MissionStore, N: Notifier> MissionDesk<S, N> {
    pub fn new(engine: ResolutionEngine, store: S, notifier: N) -> Self {
        Self {
            engine,
            players: AHashMap::new(),
            store,
            notifier,
        }
    }

    /// Add or replace a commander
    pub fn register(&mut self, player: Player) {
        tracing::debug!(player = %player.id, name = %player.commander_name, "Registered commander");
        self.players.insert(player.id, player);
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    /// Top commanders by power score
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut players: Vec<&Player> = self.players.values().collect();
        players.sort_by_key(|p| p.id);
        leaderboard(players, limit)
    }

    /// Build the engine request for a mission between two known commanders
    fn prepare(
        &self,
        attacker_id: PlayerId,
        target_id: PlayerId,
        units: &BTreeMap<String, i64>,
    ) -> Result<MissionRequest> {
        if attacker_id == target_id {
            return Err(IntelError::Validation("attacker and target are the same".into()));
        }

        let attacker = self
            .players
            .get(&attacker_id)
            .ok_or(IntelError::PlayerNotFound(attacker_id))?;
        let target = self
            .players
            .get(&target_id)
            .ok_or(IntelError::PlayerNotFound(target_id))?;

        // Negative counts are left for the engine to reject.
        let reservable: UnitCounts = units
            .iter()
            .filter_map(|(kind, &count)| u64::try_from(count).ok().map(|c| (kind.clone(), c)))
            .collect();
        attacker.ensure_available(&reservable)?;

        let mut request = MissionRequest::new(
            Participant::new(attacker.id, attacker.commander_name.clone()),
            Participant::new(target.id, target.commander_name.clone()),
        )
        .with_tech(
            level_to_i64(attacker.espionage_level()),
            level_to_i64(target.spy_defense_level()),
        )
        .with_snapshot(target.capability_snapshot());
        request.units_sent = units.clone();

        Ok(request)
    }

    /// Run a spy mission end to end.
    ///
    /// A failed alert is logged and otherwise ignored; the mission has
    /// already been applied and recorded by then.
    pub fn launch(
        &mut self,
        attacker_id: PlayerId,
        target_id: PlayerId,
        units: &BTreeMap<String, i64>,
        rng: &mut dyn RandomnessSource,
    ) -> Result<MissionResult> {
        let request = self.prepare(attacker_id, target_id, units)?;
        let result = self.engine.resolve(&request, rng)?;

        if let Some(attacker) = self.players.get_mut(&attacker_id) {
            attacker.apply_losses(&result);
        }

        let mission_id = self.store.record(result.clone())?;

        if result.detected() {
            if let Err(e) = self.notifier.notify_detected(&result) {
                tracing::warn!(
                    mission = %mission_id,
                    target = %target_id,
                    error = %e,
                    "Failed to deliver detection alert"
                );
            }
        }

        Ok(result)
    }

    /// Missions this commander has launched, newest first
    pub fn history(&self, attacker: PlayerId, limit: usize) -> Vec<MissionResult> {
        self.store.by_attacker(attacker, limit)
    }

    /// Missions aimed at this commander, newest first
    pub fn incoming(&self, target: PlayerId, limit: usize) -> Vec<MissionResult> {
        self.store.by_target(target, limit)
    }
}

fn level_to_i64(level: u64) -> i64 {
    i64::try_from(level).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::espionage::randomness::ScriptedSource;
    use crate::player::profile::{COUNTER_INTEL_TECH, ESPIONAGE_TECH};
    use crate::services::ledger::InMemoryMissionLog;
    use crate::services::notify::RecordingNotifier;

    fn desk(notifier: RecordingNotifier) -> MissionDesk<InMemoryMissionLog, RecordingNotifier> {
        let mut desk = MissionDesk::new(
            ResolutionEngine::default(),
            InMemoryMissionLog::new(),
            notifier,
        );
        desk.register(
            Player::new(PlayerId(1), "Vega")
                .with_units("spy_drones", 10)
                .with_tech(ESPIONAGE_TECH, 4),
        );
        desk.register(
            Player::new(PlayerId(2), "Orion")
                .with_units("cruisers", 3)
                .with_tech(COUNTER_INTEL_TECH, 1),
        );
        desk
    }

    fn drones(n: i64) -> BTreeMap<String, i64> {
        BTreeMap::from([("spy_drones".to_string(), n)])
    }

    #[test]
    fn test_launch_uses_player_tech() {
        let desk = desk(RecordingNotifier::new());
        let request = desk.prepare(PlayerId(1), PlayerId(2), &drones(10)).unwrap();
        assert_eq!(request.attacker_tech_level, 4);
        assert_eq!(request.defender_spy_defense_level, 1);
        assert_eq!(request.defender_snapshot.units.get("cruisers"), Some(&3));
    }

    #[test]
    fn test_detected_failure_applies_losses_and_alerts() {
        let mut desk = desk(RecordingNotifier::new());
        let mut rng = ScriptedSource::new([0.99, 0.0]);

        let result = desk.launch(PlayerId(1), PlayerId(2), &drones(10), &mut rng).unwrap();

        assert!(!result.success());
        assert!(result.detected());
        assert_eq!(desk.player(PlayerId(1)).unwrap().unit_count("spy_drones"), 5);
        assert_eq!(desk.notifier().outbox.len(), 1);
        assert_eq!(desk.notifier().outbox[0].recipient, PlayerId(2));
        assert_eq!(desk.history(PlayerId(1), 5).len(), 1);
        assert_eq!(desk.incoming(PlayerId(2), 5).len(), 1);
    }

    #[test]
    fn test_undetected_mission_sends_no_alert() {
        let mut desk = desk(RecordingNotifier::new());
        let mut rng = ScriptedSource::new([0.5, 0.2]);

        let result = desk.launch(PlayerId(1), PlayerId(2), &drones(10), &mut rng).unwrap();

        assert!(result.success());
        assert!(!result.detected());
        assert!(desk.notifier().outbox.is_empty());
        assert_eq!(desk.player(PlayerId(1)).unwrap().unit_count("spy_drones"), 10);
    }

    #[test]
    fn test_alert_failure_keeps_result() {
        let mut desk = desk(RecordingNotifier::offline());
        let mut rng = ScriptedSource::new([0.99, 0.0]);

        let result = desk.launch(PlayerId(1), PlayerId(2), &drones(4), &mut rng);

        assert!(result.is_ok());
        assert_eq!(desk.store().len(), 1);
    }

    #[test]
    fn test_cannot_commit_more_than_owned() {
        let mut desk = desk(RecordingNotifier::new());
        let mut rng = ScriptedSource::new(Vec::<f64>::new());

        let err = desk
            .launch(PlayerId(1), PlayerId(2), &drones(11), &mut rng)
            .unwrap_err();
        assert!(matches!(err, IntelError::InsufficientUnits { .. }));
        assert!(desk.store().is_empty());
    }

    #[test]
    fn test_unknown_target() {
        let mut desk = desk(RecordingNotifier::new());
        let mut rng = ScriptedSource::new(Vec::<f64>::new());

        let err = desk
            .launch(PlayerId(1), PlayerId(99), &drones(1), &mut rng)
            .unwrap_err();
        assert!(matches!(err, IntelError::PlayerNotFound(PlayerId(99))));
    }

    #[test]
    fn test_negative_commitment_rejected_by_engine() {
        let mut desk = desk(RecordingNotifier::new());
        let mut rng = ScriptedSource::new(Vec::<f64>::new());

        let err = desk
            .launch(PlayerId(1), PlayerId(2), &drones(-3), &mut rng)
            .unwrap_err();
        assert!(matches!(err, IntelError::Validation(_)));
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_self_targeting_rejected() {
        let mut desk = desk(RecordingNotifier::new());
        let mut rng = ScriptedSource::new(Vec::<f64>::new());
        assert!(desk.launch(PlayerId(1), PlayerId(1), &drones(1), &mut rng).is_err());
    }
}

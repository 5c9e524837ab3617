//! Espionage mission resolution
//!
//! Success and detection are two independent Bernoulli draws whose
//! probabilities are closed-form functions of tech advantage and force
//! size. Everything else (losses, disclosure) follows from those two bits.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::core::config::EspionageRules;
use crate::core::error::{IntelError, Result};
use crate::core::types::{CapabilitySnapshot, PlayerId, UnitCounts};
use crate::espionage::randomness::RandomnessSource;
use crate::espionage::report::build_report;
use crate::espionage::result::{MissionResult, Participant};

/// Everything the engine needs to resolve one mission
///
/// Numeric fields are signed so that malformed input coming from chat
/// can be represented and rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionRequest {
    pub attacker_id: PlayerId,
    pub attacker_name: String,
    pub target_id: PlayerId,
    pub target_name: String,
    pub units_sent: BTreeMap<String, i64>,
    pub attacker_tech_level: i64,
    pub defender_spy_defense_level: i64,
    pub defender_snapshot: CapabilitySnapshot,
}

impl MissionRequest {
    pub fn new(attacker: Participant, target: Participant) -> Self {
        Self {
            attacker_id: attacker.id,
            attacker_name: attacker.name,
            target_id: target.id,
            target_name: target.name,
            units_sent: BTreeMap::new(),
            attacker_tech_level: 0,
            defender_spy_defense_level: 0,
            defender_snapshot: CapabilitySnapshot::default(),
        }
    }

    pub fn with_units(mut self, kind: &str, count: i64) -> Self {
        self.units_sent.insert(kind.to_string(), count);
        self
    }

    pub fn with_tech(mut self, attacker_tech_level: i64, defender_spy_defense_level: i64) -> Self {
        self.attacker_tech_level = attacker_tech_level;
        self.defender_spy_defense_level = defender_spy_defense_level;
        self
    }

    pub fn with_snapshot(mut self, snapshot: CapabilitySnapshot) -> Self {
        self.defender_snapshot = snapshot;
        self
    }
}

/// Request fields after validation
struct ValidatedRequest {
    units_sent: UnitCounts,
    total_units: u64,
    attacker_tech_level: u64,
    defender_spy_defense_level: u64,
}

impl ValidatedRequest {
    fn advantage(&self) -> i64 {
        // Both levels came from non-negative i64 values.
        self.attacker_tech_level as i64 - self.defender_spy_defense_level as i64
    }
}

/// Probabilities for a mission before any dice are rolled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionOdds {
    pub advantage: i64,
    pub total_units: u64,
    pub p_success: f64,
    pub p_detect: f64,
    pub tier: usize,
}

/// Stateless mission resolver bound to one rule set
///
/// Holds nothing mutable, so a single engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    rules: EspionageRules,
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self {
            rules: EspionageRules::default(),
        }
    }
}

impl ResolutionEngine {
    pub fn new(rules: EspionageRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &EspionageRules {
        &self.rules
    }

    fn validate(&self, request: &MissionRequest) -> Result<ValidatedRequest> {
        if request.attacker_tech_level < 0 {
            return Err(IntelError::Validation(format!(
                "attacker_tech_level is negative ({})",
                request.attacker_tech_level
            )));
        }
        if request.defender_spy_defense_level < 0 {
            return Err(IntelError::Validation(format!(
                "defender_spy_defense_level is negative ({})",
                request.defender_spy_defense_level
            )));
        }

        let mut units_sent = UnitCounts::new();
        let mut total_units: u64 = 0;
        for (kind, &count) in &request.units_sent {
            let count = u64::try_from(count).map_err(|_| {
                IntelError::Validation(format!("unit count for {} is negative ({})", kind, count))
            })?;
            total_units = total_units.checked_add(count).ok_or_else(|| {
                IntelError::Validation("total committed units overflow".to_string())
            })?;
            units_sent.insert(kind.clone(), count);
        }

        Ok(ValidatedRequest {
            units_sent,
            total_units,
            attacker_tech_level: request.attacker_tech_level as u64,
            defender_spy_defense_level: request.defender_spy_defense_level as u64,
        })
    }

    fn odds_for(&self, request: &ValidatedRequest) -> MissionOdds {
        let advantage = request.advantage();
        MissionOdds {
            advantage,
            total_units: request.total_units,
            p_success: self.rules.success.evaluate(advantage, request.total_units),
            p_detect: self.rules.detection.evaluate(advantage, request.total_units),
            tier: self.rules.tier_for(request.attacker_tech_level),
        }
    }

    /// Success/detection probabilities and disclosure tier for a request
    pub fn odds(&self, request: &MissionRequest) -> Result<MissionOdds> {
        let validated = self.validate(request)?;
        Ok(self.odds_for(&validated))
    }

    /// Resolve a mission, stamping it with the current UTC time
    pub fn resolve(
        &self,
        request: &MissionRequest,
        rng: &mut dyn RandomnessSource,
    ) -> Result<MissionResult> {
        self.resolve_at(request, rng, Utc::now())
    }

    /// Resolve a mission with an explicit resolution timestamp.
    ///
    /// Draws exactly two variates (success, then detection) unless the
    /// request is rejected or commits no units, in which case none are drawn.
    pub fn resolve_at(
        &self,
        request: &MissionRequest,
        rng: &mut dyn RandomnessSource,
        resolved_at: DateTime<Utc>,
    ) -> Result<MissionResult> {
        let validated = self.validate(request)?;

        let attacker = Participant::new(request.attacker_id, request.attacker_name.clone());
        let target = Participant::new(request.target_id, request.target_name.clone());

        if validated.total_units == 0 {
            tracing::debug!(
                attacker = %attacker.id,
                target = %target.id,
                "No units committed, mission aborted without a roll"
            );
            return Ok(MissionResult::new(
                attacker,
                target,
                validated.units_sent,
                UnitCounts::new(),
                false,
                false,
                None,
                resolved_at,
            ));
        }

        let odds = self.odds_for(&validated);
        let r_success = rng.next();
        let r_detect = rng.next();
        let success = r_success < odds.p_success;
        let detected = r_detect < odds.p_detect;

        tracing::debug!(
            attacker = %attacker.id,
            target = %target.id,
            advantage = odds.advantage,
            p_success = odds.p_success,
            p_detect = odds.p_detect,
            r_success,
            r_detect,
            "Rolled espionage mission"
        );

        let fraction = self.rules.losses.fraction(success, detected);
        let units_lost = compute_losses(&validated.units_sent, fraction);

        let report = success.then(|| {
            build_report(&request.defender_snapshot, odds.tier, &self.rules.disclosure)
        });

        tracing::info!(
            attacker = %attacker.id,
            target = %target.id,
            success,
            detected,
            tier = odds.tier,
            lost = units_lost.values().sum::<u64>(),
            "Espionage mission resolved"
        );

        Ok(MissionResult::new(
            attacker,
            target,
            validated.units_sent,
            units_lost,
            success,
            detected,
            report,
            resolved_at,
        ))
    }
}

/// `floor(sent * fraction)` per kind; kinds that lose nothing are left out
fn compute_losses(units_sent: &UnitCounts, fraction: f64) -> UnitCounts {
    units_sent
        .iter()
        .filter_map(|(kind, &sent)| {
            let lost = ((sent as f64) * fraction).floor() as u64;
            let lost = lost.min(sent);
            (lost > 0).then(|| (kind.clone(), lost))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::espionage::randomness::ScriptedSource;
    use crate::espionage::report::IntelCategory;

    fn request() -> MissionRequest {
        MissionRequest::new(
            Participant::new(PlayerId(10), "Vega"),
            Participant::new(PlayerId(20), "Orion"),
        )
        .with_snapshot(
            CapabilitySnapshot::new()
                .with_resource("metal", 900)
                .with_building("shipyard", 2)
                .with_unit("battleships", 1)
                .with_tech("counter_intel", 1),
        )
    }

    #[test]
    fn test_odds_match_closed_form() {
        let engine = ResolutionEngine::default();
        let odds = engine
            .odds(&request().with_tech(4, 1).with_units("spy_drones", 10))
            .unwrap();

        assert_eq!(odds.advantage, 3);
        assert!((odds.p_success - 0.65).abs() < 1e-9);
        assert!((odds.p_detect - 0.13).abs() < 1e-9);
        assert_eq!(odds.tier, 2);
    }

    #[test]
    fn test_draw_order_is_success_then_detection() {
        let engine = ResolutionEngine::default();
        let req = request().with_tech(4, 1).with_units("spy_drones", 10);

        // Low first draw, high second: succeeds unseen.
        let mut rng = ScriptedSource::new([0.01, 0.99]);
        let result = engine.resolve(&req, &mut rng).unwrap();
        assert!(result.success());
        assert!(!result.detected());
        assert_eq!(rng.consumed(), 2);

        // High first draw, low second: fails and gets caught.
        let mut rng = ScriptedSource::new([0.99, 0.01]);
        let result = engine.resolve(&req, &mut rng).unwrap();
        assert!(!result.success());
        assert!(result.detected());
    }

    #[test]
    fn test_detected_success_loses_fifth() {
        let engine = ResolutionEngine::default();
        let req = request()
            .with_tech(2, 2)
            .with_units("spy_drones", 10)
            .with_units("infiltrators", 4);

        let mut rng = ScriptedSource::new([0.0, 0.0]);
        let result = engine.resolve(&req, &mut rng).unwrap();

        assert!(result.success() && result.detected());
        assert_eq!(result.units_lost().get("spy_drones"), Some(&2));
        // floor(4 * 0.2) = 0, so the kind is not listed
        assert_eq!(result.units_lost().get("infiltrators"), None);
    }

    #[test]
    fn test_report_tier_follows_tech() {
        let engine = ResolutionEngine::default();
        let req = request().with_tech(7, 0).with_units("spy_drones", 1);

        let mut rng = ScriptedSource::new([0.0, 0.99]);
        let result = engine.resolve(&req, &mut rng).unwrap();
        let report = result.report().unwrap();
        assert_eq!(report.categories(), IntelCategory::ALL.to_vec());
    }

    #[test]
    fn test_negative_unit_count_rejected_before_rolling() {
        let engine = ResolutionEngine::default();
        let req = request().with_units("spy_drones", -2);
        let mut rng = ScriptedSource::new(Vec::<f64>::new());

        let err = engine.resolve(&req, &mut rng).unwrap_err();
        assert!(matches!(err, IntelError::Validation(_)));
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_negative_spy_defense_rejected() {
        let engine = ResolutionEngine::default();
        let req = request().with_tech(1, -1).with_units("spy_drones", 1);
        assert!(matches!(engine.odds(&req), Err(IntelError::Validation(_))));
    }

    #[test]
    fn test_custom_rules_are_honoured() {
        let mut rules = EspionageRules::default();
        rules.losses.detected_failure = 1.0;
        let engine = ResolutionEngine::new(rules).unwrap();
        let req = request().with_units("spy_drones", 5);

        let mut rng = ScriptedSource::new([0.99, 0.0]);
        let result = engine.resolve(&req, &mut rng).unwrap();
        assert_eq!(result.units_lost().get("spy_drones"), Some(&5));
    }

    #[test]
    fn test_invalid_rules_rejected_at_construction() {
        let mut rules = EspionageRules::default();
        rules.losses.detected_failure = 1.5;
        assert!(ResolutionEngine::new(rules).is_err());
    }

    #[test]
    fn test_compute_losses_floor() {
        let mut sent = UnitCounts::new();
        sent.insert("a".into(), 3);
        sent.insert("b".into(), 1);
        let lost = compute_losses(&sent, 0.5);
        assert_eq!(lost.get("a"), Some(&1));
        assert_eq!(lost.get("b"), None);
        assert!(compute_losses(&sent, 0.0).is_empty());
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResolutionEngine>();
    }
}

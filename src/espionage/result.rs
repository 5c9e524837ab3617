//! Mission outcome record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{PlayerId, UnitCounts};
use crate::espionage::report::IntelligenceReport;

/// A player taking part in a mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub name: String,
}

impl Participant {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Immutable outcome of a single espionage mission.
///
/// Invariants upheld by construction:
/// - every kind in `units_lost` is in `units_sent` with a count at least as large
/// - `report` is `Some` exactly when `success` is true
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionResult {
    attacker: Participant,
    target: Participant,
    units_sent: UnitCounts,
    units_lost: UnitCounts,
    success: bool,
    detected: bool,
    report: Option<IntelligenceReport>,
    resolved_at: DateTime<Utc>,
}

impl MissionResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        attacker: Participant,
        target: Participant,
        units_sent: UnitCounts,
        units_lost: UnitCounts,
        success: bool,
        detected: bool,
        report: Option<IntelligenceReport>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        debug_assert_eq!(report.is_some(), success);
        debug_assert!(units_lost
            .iter()
            .all(|(kind, lost)| units_sent.get(kind).is_some_and(|sent| lost <= sent)));

        Self {
            attacker,
            target,
            units_sent,
            units_lost,
            success,
            detected,
            report,
            resolved_at,
        }
    }

    pub fn attacker(&self) -> &Participant {
        &self.attacker
    }

    pub fn target(&self) -> &Participant {
        &self.target
    }

    pub fn units_sent(&self) -> &UnitCounts {
        &self.units_sent
    }

    pub fn units_lost(&self) -> &UnitCounts {
        &self.units_lost
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    pub fn report(&self) -> Option<&IntelligenceReport> {
        self.report.as_ref()
    }

    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    pub fn total_sent(&self) -> u64 {
        self.units_sent.values().sum()
    }

    pub fn total_lost(&self) -> u64 {
        self.units_lost.values().sum()
    }

    /// Compare everything the dice decided, ignoring the timestamp
    pub fn same_outcome(&self, other: &MissionResult) -> bool {
        self.attacker == other.attacker
            && self.target == other.target
            && self.units_sent == other.units_sent
            && self.units_lost == other.units_lost
            && self.success == other.success
            && self.detected == other.detected
            && self.report == other.report
    }
}

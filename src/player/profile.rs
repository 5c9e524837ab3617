//! Commander profile: resources, buildings, fleet and research

use serde::{Deserialize, Serialize};

use crate::core::error::{IntelError, Result};
use crate::core::types::{CapabilitySnapshot, Ledger, PlayerId, UnitCounts};
use crate::espionage::result::MissionResult;

/// Research line that raises an attacker's espionage tech level
pub const ESPIONAGE_TECH: &str = "espionage";

/// Research line that raises a defender's spy defense level
pub const COUNTER_INTEL_TECH: &str = "counter_intel";

/// Starting stock for a fresh commander
const STARTING_RESOURCES: [(&str, u64); 3] = [("metal", 100), ("crystal", 50), ("fuel", 25)];

/// Power contributed per ship of each hull class
const UNIT_POWER: [(&str, u64); 3] = [("fighters", 10), ("cruisers", 50), ("battleships", 250)];

/// A commander in the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub commander_name: String,
    pub resources: Ledger,
    pub buildings: Ledger,
    pub units: UnitCounts,
    pub tech: Ledger,
    pub experience: u64,
}

impl Player {
    pub fn new(id: PlayerId, commander_name: impl Into<String>) -> Self {
        Self {
            id,
            commander_name: commander_name.into(),
            resources: STARTING_RESOURCES
                .iter()
                .map(|(name, amount)| (name.to_string(), *amount))
                .collect(),
            buildings: Ledger::new(),
            units: UnitCounts::new(),
            tech: Ledger::new(),
            experience: 0,
        }
    }

    pub fn with_units(mut self, kind: &str, count: u64) -> Self {
        self.units.insert(kind.to_string(), count);
        self
    }

    pub fn with_tech(mut self, name: &str, level: u64) -> Self {
        self.tech.insert(name.to_string(), level);
        self
    }

    pub fn with_building(mut self, name: &str, level: u64) -> Self {
        self.buildings.insert(name.to_string(), level);
        self
    }

    pub fn tech_level(&self, name: &str) -> u64 {
        self.tech.get(name).copied().unwrap_or(0)
    }

    pub fn espionage_level(&self) -> u64 {
        self.tech_level(ESPIONAGE_TECH)
    }

    pub fn spy_defense_level(&self) -> u64 {
        self.tech_level(COUNTER_INTEL_TECH)
    }

    pub fn unit_count(&self, kind: &str) -> u64 {
        self.units.get(kind).copied().unwrap_or(0)
    }

    /// Fleet strength plus a small experience bonus
    pub fn power_score(&self) -> u64 {
        let fleet_power: u64 = UNIT_POWER
            .iter()
            .map(|(kind, power)| self.unit_count(kind).saturating_mul(*power))
            .fold(0, u64::saturating_add);
        fleet_power.saturating_add(self.experience / 10)
    }

    /// Everything a spy could learn about this commander
    pub fn capability_snapshot(&self) -> CapabilitySnapshot {
        CapabilitySnapshot {
            resources: self.resources.clone(),
            buildings: self.buildings.clone(),
            units: self.units.clone(),
            tech: self.tech.clone(),
        }
    }

    /// Check that every requested unit is actually in the hangar
    pub fn ensure_available(&self, requested: &UnitCounts) -> Result<()> {
        for (kind, &count) in requested {
            let available = self.unit_count(kind);
            if count > available {
                return Err(IntelError::InsufficientUnits {
                    kind: kind.clone(),
                    requested: count,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Remove the mission's losses from this commander's fleet
    pub fn apply_losses(&mut self, result: &MissionResult) {
        for (kind, &lost) in result.units_lost() {
            if let Some(count) = self.units.get_mut(kind) {
                *count = count.saturating_sub(lost);
            }
        }
    }
}

//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Chat user identifier (players are keyed by their numeric chat id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated unit-kind -> count mapping
pub type UnitCounts = BTreeMap<String, u64>;

/// Named amounts (resource name -> amount, building name -> level, ...)
pub type Ledger = BTreeMap<String, u64>;

/// A defender's full revealable state at resolution time.
///
/// All four categories are always present, possibly empty. The engine
/// decides which of them an attacker gets to see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    pub resources: Ledger,
    pub buildings: Ledger,
    pub units: Ledger,
    pub tech: Ledger,
}

impl CapabilitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, name: &str, amount: u64) -> Self {
        self.resources.insert(name.to_string(), amount);
        self
    }

    pub fn with_building(mut self, name: &str, level: u64) -> Self {
        self.buildings.insert(name.to_string(), level);
        self
    }

    pub fn with_unit(mut self, name: &str, count: u64) -> Self {
        self.units.insert(name.to_string(), count);
        self
    }

    pub fn with_tech(mut self, name: &str, level: u64) -> Self {
        self.tech.insert(name.to_string(), level);
        self
    }
}

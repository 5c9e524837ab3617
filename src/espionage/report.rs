//! Tiered intelligence disclosure
//!
//! Which parts of a defender's snapshot an attacker sees is decided by a
//! lookup table, not by branching: each row of the table lists the
//! categories unlocked at that tier.

use serde::{Deserialize, Serialize};

use crate::core::types::{CapabilitySnapshot, Ledger};

/// A revealable slice of a defender's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelCategory {
    Resources,
    Buildings,
    Units,
    Tech,
}

impl IntelCategory {
    pub const ALL: [IntelCategory; 4] = [
        IntelCategory::Resources,
        IntelCategory::Buildings,
        IntelCategory::Units,
        IntelCategory::Tech,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IntelCategory::Resources => "Resources",
            IntelCategory::Buildings => "Buildings",
            IntelCategory::Units => "Units",
            IntelCategory::Tech => "Tech",
        }
    }
}

/// Ordered tier -> unlocked categories lookup
///
/// Row `t` holds every category visible at tier `t`. Adding a tier is a
/// matter of appending a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureTable {
    tiers: Vec<Vec<IntelCategory>>,
}

impl Default for DisclosureTable {
    fn default() -> Self {
        use IntelCategory::*;
        Self {
            tiers: vec![
                vec![Resources],
                vec![Resources, Buildings],
                vec![Resources, Buildings, Units],
                vec![Resources, Buildings, Units, Tech],
            ],
        }
    }
}

impl DisclosureTable {
    pub fn new(tiers: Vec<Vec<IntelCategory>>) -> Self {
        Self { tiers }
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Highest tier in the table
    pub fn max_tier(&self) -> usize {
        self.tiers.len().saturating_sub(1)
    }

    /// Categories unlocked at `tier`; tiers past the end use the top row
    pub fn categories(&self, tier: usize) -> &[IntelCategory] {
        self.tiers
            .get(tier)
            .or_else(|| self.tiers.last())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn unlocks(&self, tier: usize, category: IntelCategory) -> bool {
        self.categories(tier).contains(&category)
    }

    /// True when every tier reveals at least what the tier below it does
    pub fn is_cumulative(&self) -> bool {
        self.tiers
            .windows(2)
            .all(|pair| pair[0].iter().all(|c| pair[1].contains(c)))
    }
}

/// The part of a defender's snapshot disclosed to a successful attacker
///
/// A category is either present with all of its entries or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelligenceReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Ledger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildings: Option<Ledger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Ledger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<Ledger>,
}

impl IntelligenceReport {
    pub fn get(&self, category: IntelCategory) -> Option<&Ledger> {
        match category {
            IntelCategory::Resources => self.resources.as_ref(),
            IntelCategory::Buildings => self.buildings.as_ref(),
            IntelCategory::Units => self.units.as_ref(),
            IntelCategory::Tech => self.tech.as_ref(),
        }
    }

    pub fn contains(&self, category: IntelCategory) -> bool {
        self.get(category).is_some()
    }

    /// Categories present in this report, in canonical order
    pub fn categories(&self) -> Vec<IntelCategory> {
        IntelCategory::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    fn slot_mut(&mut self, category: IntelCategory) -> &mut Option<Ledger> {
        match category {
            IntelCategory::Resources => &mut self.resources,
            IntelCategory::Buildings => &mut self.buildings,
            IntelCategory::Units => &mut self.units,
            IntelCategory::Tech => &mut self.tech,
        }
    }
}

fn snapshot_category(snapshot: &CapabilitySnapshot, category: IntelCategory) -> &Ledger {
    match category {
        IntelCategory::Resources => &snapshot.resources,
        IntelCategory::Buildings => &snapshot.buildings,
        IntelCategory::Units => &snapshot.units,
        IntelCategory::Tech => &snapshot.tech,
    }
}

/// Copy the categories unlocked at `tier` out of `snapshot`.
///
/// The caller is responsible for capping `tier`. Categories the defender
/// has nothing in are left out rather than emitted empty.
pub fn build_report(
    snapshot: &CapabilitySnapshot,
    tier: usize,
    table: &DisclosureTable,
) -> IntelligenceReport {
    let mut report = IntelligenceReport::default();

    for &category in table.categories(tier) {
        let entries = snapshot_category(snapshot, category);
        if entries.is_empty() {
            continue;
        }
        *report.slot_mut(category) = Some(entries.clone());
    }

    report
}

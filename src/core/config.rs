//! Espionage rule set with documented coefficients
//!
//! Every tunable number used by mission resolution is collected here.
//! A rule set is a plain value bound into a `ResolutionEngine` at
//! construction, so several balance variants can live side by side.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{IntelError, Result};
use crate::espionage::report::DisclosureTable;

/// Linear probability model clamped to a closed interval
///
/// `p = clamp(base + per_advantage * adv + per_unit * units, min, max)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityCurve {
    /// Probability at zero advantage with no units committed
    pub base: f64,
    /// Change per point of tech advantage (attacker tech - defender spy defense)
    pub per_advantage: f64,
    /// Change per committed unit
    pub per_unit: f64,
    /// Lower clamp
    pub min: f64,
    /// Upper clamp
    pub max: f64,
}

impl ProbabilityCurve {
    pub fn evaluate(&self, advantage: i64, units: u64) -> f64 {
        let raw = self.base + self.per_advantage * advantage as f64 + self.per_unit * units as f64;
        raw.clamp(self.min, self.max)
    }

    fn validate(&self, name: &str) -> Result<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.min) || !in_unit(self.max) {
            return Err(IntelError::Config(format!(
                "{} bounds ({}, {}) must lie within [0, 1]",
                name, self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(IntelError::Config(format!(
                "{} min ({}) exceeds max ({})",
                name, self.min, self.max
            )));
        }
        if !(self.base.is_finite() && self.per_advantage.is_finite() && self.per_unit.is_finite()) {
            return Err(IntelError::Config(format!("{} coefficients must be finite", name)));
        }
        Ok(())
    }
}

impl ProbabilityCurve {
    /// Success odds: tech advantage and force size both help
    pub fn success() -> Self {
        Self {
            base: 0.30,
            per_advantage: 0.05,
            per_unit: 0.02,
            min: 0.05,
            max: 0.95,
        }
    }

    /// Detection odds: tech advantage hides the spies, force size doesn't matter
    pub fn detection() -> Self {
        Self {
            base: 0.25,
            per_advantage: -0.04,
            per_unit: 0.0,
            min: 0.02,
            max: 0.90,
        }
    }
}

/// A curve as written in a rule file; absent keys keep the default curve's value
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurveOverrides {
    base: Option<f64>,
    per_advantage: Option<f64>,
    per_unit: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl CurveOverrides {
    fn over(self, defaults: ProbabilityCurve) -> ProbabilityCurve {
        ProbabilityCurve {
            base: self.base.unwrap_or(defaults.base),
            per_advantage: self.per_advantage.unwrap_or(defaults.per_advantage),
            per_unit: self.per_unit.unwrap_or(defaults.per_unit),
            min: self.min.unwrap_or(defaults.min),
            max: self.max.unwrap_or(defaults.max),
        }
    }
}

fn success_curve<'de, D>(deserializer: D) -> std::result::Result<ProbabilityCurve, D::Error>
where
    D: Deserializer<'de>,
{
    CurveOverrides::deserialize(deserializer).map(|o| o.over(ProbabilityCurve::success()))
}

fn detection_curve<'de, D>(deserializer: D) -> std::result::Result<ProbabilityCurve, D::Error>
where
    D: Deserializer<'de>,
{
    CurveOverrides::deserialize(deserializer).map(|o| o.over(ProbabilityCurve::detection()))
}

/// Fraction of each committed unit kind lost when the mission is detected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LossRules {
    /// Detected, but the spies got the intel out
    pub detected_success: f64,
    /// Detected and empty-handed
    pub detected_failure: f64,
}

impl Default for LossRules {
    fn default() -> Self {
        Self {
            detected_success: 0.2,
            detected_failure: 0.5,
        }
    }
}

impl LossRules {
    pub fn fraction(&self, success: bool, detected: bool) -> f64 {
        match (detected, success) {
            (false, _) => 0.0,
            (true, true) => self.detected_success,
            (true, false) => self.detected_failure,
        }
    }
}

/// Maps the attacker's tech level onto a disclosure tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierRules {
    /// Tech levels needed per tier step (tier = tech / levels_per_tier)
    pub levels_per_tier: u64,
}

impl Default for TierRules {
    fn default() -> Self {
        Self { levels_per_tier: 2 }
    }
}

/// Complete rule set for espionage resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EspionageRules {
    /// Name of this rule set (set from the filename when loaded)
    #[serde(default)]
    pub name: String,
    #[serde(default = "ProbabilityCurve::success", deserialize_with = "success_curve")]
    pub success: ProbabilityCurve,
    #[serde(default = "ProbabilityCurve::detection", deserialize_with = "detection_curve")]
    pub detection: ProbabilityCurve,
    #[serde(default)]
    pub losses: LossRules,
    #[serde(default)]
    pub tiers: TierRules,
    #[serde(default)]
    pub disclosure: DisclosureTable,
}

impl Default for EspionageRules {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            success: ProbabilityCurve::success(),
            detection: ProbabilityCurve::detection(),
            losses: LossRules::default(),
            tiers: TierRules::default(),
            disclosure: DisclosureTable::default(),
        }
    }
}

impl EspionageRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disclosure tier for an attacker tech level, capped at the table's top tier
    pub fn tier_for(&self, attacker_tech_level: u64) -> usize {
        let step = self.tiers.levels_per_tier.max(1);
        let raw = (attacker_tech_level / step).min(usize::MAX as u64) as usize;
        raw.min(self.disclosure.max_tier())
    }

    /// Validate the rule set for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.success.validate("success")?;
        self.detection.validate("detection")?;

        for (name, value) in [
            ("losses.detected_success", self.losses.detected_success),
            ("losses.detected_failure", self.losses.detected_failure),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(IntelError::Config(format!(
                    "{} ({}) must lie within [0, 1]",
                    name, value
                )));
            }
        }

        if self.tiers.levels_per_tier == 0 {
            return Err(IntelError::Config("tiers.levels_per_tier must be positive".into()));
        }

        if self.disclosure.is_empty() {
            return Err(IntelError::Config("disclosure table has no tiers".into()));
        }

        if !self.disclosure.is_cumulative() {
            return Err(IntelError::Config(
                "disclosure tiers must each include every category of the tier below".into(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a rule set from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let rules: EspionageRules = toml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }
}

/// Load a rule set from a TOML file
///
/// Sections missing from the file fall back to their defaults.
pub fn load_rules(path: &Path) -> Result<EspionageRules> {
    let content = fs::read_to_string(path)?;
    let mut rules = EspionageRules::from_toml_str(&content)?;

    if rules.name.is_empty() {
        rules.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    tracing::debug!(rules = %rules.name, path = %path.display(), "Loaded espionage rules");
    Ok(rules)
}

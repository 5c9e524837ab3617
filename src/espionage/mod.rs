//! Espionage layer - mission resolution and tiered intelligence disclosure

pub mod engine;
pub mod randomness;
pub mod report;
pub mod result;

pub use engine::{MissionOdds, MissionRequest, ResolutionEngine};
pub use randomness::{RandomnessSource, ScriptedSource, SeededSource};
pub use report::{build_report, DisclosureTable, IntelCategory, IntelligenceReport};
pub use result::{MissionResult, Participant};

//! Services around the engine - mission log, alerts, and the mission desk

pub mod desk;
pub mod ledger;
pub mod notify;

pub use desk::MissionDesk;
pub use ledger::{InMemoryMissionLog, MissionStore};
pub use notify::{DetectionAlert, Notifier, RecordingNotifier};

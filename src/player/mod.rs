//! Player layer - commander state and rankings

pub mod leaderboard;
pub mod profile;

pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use profile::{Player, COUNTER_INTEL_TECH, ESPIONAGE_TECH};

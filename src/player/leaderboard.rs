//! Power rankings

use serde::{Deserialize, Serialize};

use crate::core::types::PlayerId;
use crate::player::profile::Player;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub id: PlayerId,
    pub commander_name: String,
    pub power_score: u64,
}

/// Top `limit` commanders by power score, strongest first.
///
/// Ties keep the order players were given in.
pub fn leaderboard<'a>(
    players: impl IntoIterator<Item = &'a Player>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut scored: Vec<(u64, &Player)> = players
        .into_iter()
        .map(|p| (p.power_score(), p))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (power_score, player))| LeaderboardEntry {
            rank: i + 1,
            id: player.id,
            commander_name: player.commander_name.clone(),
            power_score,
        })
        .collect()
}

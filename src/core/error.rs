use thiserror::Error;

use crate::core::types::PlayerId;

/// Message shown to players whenever a mission request is rejected
pub const MISSION_REJECTED_MESSAGE: &str = "Mission could not be processed.";

#[derive(Error, Debug)]
pub enum IntelError {
    #[error("Invalid mission input: {0}")]
    Validation(String),

    #[error("Invalid rule set: {0}")]
    Config(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Not enough {kind}: requested {requested}, available {available}")]
    InsufficientUnits {
        kind: String,
        requested: u64,
        available: u64,
    },

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rules parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl IntelError {
    /// Text suitable for the player who issued the command.
    ///
    /// Validation details are diagnostics, not gameplay messages.
    pub fn user_message(&self) -> String {
        match self {
            IntelError::Validation(_) | IntelError::Config(_) => {
                MISSION_REJECTED_MESSAGE.to_string()
            }
            IntelError::PlayerNotFound(_) => "Target commander not found.".to_string(),
            IntelError::InsufficientUnits {
                kind, available, ..
            } => format!("You only have {} {} available.", available, kind),
            _ => MISSION_REJECTED_MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IntelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_generic_for_players() {
        let err = IntelError::Validation("attacker_tech_level is -1".into());
        assert_eq!(err.user_message(), MISSION_REJECTED_MESSAGE);
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_insufficient_units_message() {
        let err = IntelError::InsufficientUnits {
            kind: "spy_drones".into(),
            requested: 5,
            available: 2,
        };
        assert_eq!(err.user_message(), "You only have 2 spy_drones available.");
    }
}

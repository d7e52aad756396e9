use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{FenParseError, InvariantViolation, NotationError};
use crate::variant::Variant;

/// Settings a session supplies when it creates a [`Game`](super::Game)
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: Variant,
    /// Start from this FEN instead of the variant's initial position
    pub start_fen: Option<String>,
    /// Scharnagl number of a Chess960 setup, random when absent
    pub chess960_index: Option<u16>,
    /// Declare threefold repetition without waiting for a claim
    pub auto_claim_draws: bool,
    pub initial_clock_millis: Option<i64>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error("Chess960 index {0} is outside 0..=959")]
    InvalidChess960Index(u16),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl From<FenParseError> for ConfigError {
    fn from(err: FenParseError) -> Self {
        ConfigError::Notation(err.into())
    }
}

impl GameConfig {
    pub fn new(variant: Variant) -> Self {
        Self { variant, ..Default::default() }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let config = GameConfig::from_json(r#"{ "variant": "crazyhouse" }"#).unwrap();
        assert_eq!(config.variant, Variant::Crazyhouse);
        assert_eq!(config.start_fen, None);
        assert!(!config.auto_claim_draws);

        let empty = GameConfig::from_json("{}").unwrap();
        assert_eq!(empty, GameConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig {
            variant: Variant::FischerRandom,
            chess960_index: Some(518),
            auto_claim_draws: true,
            initial_clock_millis: Some(180_000),
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(GameConfig::from_json("{ variant: 1 }"), Err(ConfigError::Json(_))));
        assert!(matches!(
            GameConfig::from_json(r#"{ "variant": "shogi" }"#),
            Err(ConfigError::Json(_))
        ));
    }
}

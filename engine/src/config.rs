//! Engine configuration, loadable from JSON. Every field has a default, so
//! `{}` is a valid config.
//!
//! ```json
//! { "players": 3, "mexico_round_seconds": 20, "ai": { "seed": 12345 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::rules::{CUSTOM_MAX_PLAYERS, MEXICO_ROUND_SECONDS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Seats for the multiplayer variants. Mexico and Chicago ignore it.
    pub players: usize,
    pub mexico_round_seconds: u32,
    /// Inclusive range the simulated Mexico opponent rolls in.
    pub mexico_opponent_range: (u32, u32),
    pub ai: AiConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            players: 2,
            mexico_round_seconds: MEXICO_ROUND_SECONDS,
            mexico_opponent_range: (21, 65),
            ai: AiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AiConfig {
    /// Seeds the AI and opponent draws; random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Hard stop for a single AI turn.
    pub max_steps_per_turn: u32,
}

impl Default for AiConfig {
    fn default() -> Self { AiConfig { seed: None, max_steps_per_turn: 64 } }
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(raw).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(2..=CUSTOM_MAX_PLAYERS).contains(&self.players) {
            return Err(EngineError::Config(format!("players must be 2..={CUSTOM_MAX_PLAYERS}, got {}", self.players)));
        }
        if self.mexico_round_seconds == 0 {
            return Err(EngineError::Config("mexico_round_seconds must be positive".into()));
        }
        let (low, high) = self.mexico_opponent_range;
        if low > high {
            return Err(EngineError::Config(format!("mexico_opponent_range {low}..={high} is empty")));
        }
        if self.ai.max_steps_per_turn == 0 {
            return Err(EngineError::Config("ai.max_steps_per_turn must be positive".into()));
        }
        Ok(())
    }
}

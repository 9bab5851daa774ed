//! Battle tuning knobs.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::error::Result;

/// Configuration for battle resolution.
///
/// Every field falls back to its default when missing from a loaded
/// config, so partial JSON overrides are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Turns a special ability stays locked after use
    pub special_cooldown: u32,

    /// Chance (0.0-1.0) that a `run` attempt succeeds
    pub escape_chance: f64,

    /// Chance (0.0-1.0) that a Rogue's Critical Strike triples damage
    pub crit_chance: f64,

    /// Health restored by the Cleric's Heal
    pub cleric_heal: u32,

    /// Maximum battle log entries kept (oldest dropped first)
    pub log_capacity: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            special_cooldown: SPECIAL_COOLDOWN_TURNS,
            escape_chance: ESCAPE_CHANCE,
            crit_chance: ROGUE_CRIT_CHANCE,
            cleric_heal: CLERIC_HEAL_AMOUNT,
            log_capacity: COMBAT_LOG_CAPACITY,
        }
    }
}

impl BattleConfig {
    /// Parse a JSON override. Probabilities are clamped into 0.0-1.0.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: BattleConfig = serde_json::from_str(json)?;
        config.escape_chance = config.escape_chance.clamp(0.0, 1.0);
        config.crit_chance = config.crit_chance.clamp(0.0, 1.0);
        Ok(config)
    }

    /// Escapes always succeed and crits always land.
    pub fn lucky() -> Self {
        Self {
            escape_chance: 1.0,
            crit_chance: 1.0,
            ..Default::default()
        }
    }
}

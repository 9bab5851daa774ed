//! Simulation configuration.

use crate::character::CharacterClass;
use crate::combat::EnemyKind;
use crate::core::config::BattleConfig;

/// How the simulated player picks actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPolicy {
    /// Attack every turn
    Attack,
    /// Use the special ability whenever it is ready
    SpecialWhenReady,
}

impl ActionPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "attack" => Some(ActionPolicy::Attack),
            "special" => Some(ActionPolicy::SpecialWhenReady),
            _ => None,
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of battles per class
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Enemy every battle is fought against
    pub enemy: EnemyKind,

    /// Character level; stats are grown through the real level-up rules
    pub level: u32,

    /// Classes to simulate
    pub classes: Vec<CharacterClass>,

    pub policy: ActionPolicy,

    pub battle: BattleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            enemy: EnemyKind::Goblin,
            level: 1,
            classes: CharacterClass::playable().to_vec(),
            policy: ActionPolicy::Attack,
            battle: BattleConfig::default(),
        }
    }
}

impl SimConfig {
    /// Quick config for checking one bracket
    pub fn bracket_test(enemy: EnemyKind, level: u32) -> Self {
        Self {
            num_runs: 100,
            enemy,
            level,
            ..Default::default()
        }
    }
}

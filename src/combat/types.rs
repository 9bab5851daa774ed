use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::combat_math::{apply_damage, is_alive};
use crate::core::constants::{GOBLIN_MAX_LEVEL, ORC_MAX_LEVEL};
use crate::core::error::{GameError, Result};

/// The fixed enemy table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

impl EnemyKind {
    pub fn all() -> [EnemyKind; 3] {
        [EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Dragon]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Goblin => "Goblin",
            EnemyKind::Orc => "Orc",
            EnemyKind::Dragon => "Dragon",
        }
    }

    /// Level bracket: 1-2 goblins, 3-5 orcs, 6+ dragons.
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=GOBLIN_MAX_LEVEL => EnemyKind::Goblin,
            _ if level <= ORC_MAX_LEVEL => EnemyKind::Orc,
            _ => EnemyKind::Dragon,
        }
    }

    pub fn spawn(&self) -> Enemy {
        // (hp, strength, magic, xp, gold)
        let (hp, strength, magic, xp_reward, gold_reward) = match self {
            EnemyKind::Goblin => (50, 8, 2, 25, 10),
            EnemyKind::Orc => (80, 12, 5, 50, 25),
            EnemyKind::Dragon => (200, 25, 15, 200, 100),
        };
        Enemy {
            name: self.name().to_string(),
            health: hp,
            max_health: hp,
            strength,
            magic,
            xp_reward,
            gold_reward,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        EnemyKind::all()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidTarget(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        is_alive(self.health)
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = apply_damage(self.health, amount);
    }
}

/// Creates an enemy by case-insensitive type name (goblin, orc, dragon).
pub fn create_enemy(enemy_type: &str) -> Result<Enemy> {
    Ok(enemy_type.parse::<EnemyKind>()?.spawn())
}

/// Picks the enemy for a character level. Never fails.
pub fn enemy_for_level(level: u32) -> Enemy {
    EnemyKind::for_level(level).spawn()
}

/// Experience and gold paid out for a defeated enemy or a completed quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub xp: u32,
    pub gold: u32,
}

pub fn rewards_for(enemy: &Enemy) -> Reward {
    Reward {
        xp: enemy.xp_reward,
        gold: enemy.gold_reward,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub message: String,
    pub is_crit: bool,
    pub is_player_action: bool,
}

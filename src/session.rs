//! A play session: the current character, its battle config and RNG.
//!
//! Replaces any notion of a global "current character". Every operation
//! goes through the session that owns the state it touches.

use rand::Rng;
use tracing::info;

use crate::character::{apply_battle_rewards, revive, Character};
use crate::combat::{
    create_enemy, enemy_for_level, resolve_battle_with_config, ActionSource, BattleOutcome,
    BattleResult, Enemy,
};
use crate::core::config::BattleConfig;
use crate::core::error::Result;

/// What happened on one trip out exploring.
#[derive(Debug, Clone)]
pub struct ExploreReport {
    pub battle: BattleResult,
    /// Levels gained from applying the rewards (0 unless the player won).
    pub levels_gained: u32,
}

impl ExploreReport {
    pub fn outcome(&self) -> BattleOutcome {
        self.battle.outcome
    }
}

pub struct GameSession<R: Rng> {
    character: Character,
    config: BattleConfig,
    rng: R,
}

impl<R: Rng> GameSession<R> {
    pub fn new(character: Character, rng: R) -> Self {
        Self::with_config(character, BattleConfig::default(), rng)
    }

    pub fn with_config(character: Character, config: BattleConfig, rng: R) -> Self {
        Self {
            character,
            config,
            rng,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn into_character(self) -> Character {
        self.character
    }

    /// Fights the enemy matching the character's level bracket.
    pub fn explore(&mut self, source: &mut impl ActionSource) -> Result<ExploreReport> {
        let enemy = enemy_for_level(self.character.level);
        self.fight_enemy(enemy, source)
    }

    /// Fights an enemy chosen by type name.
    pub fn fight(&mut self, enemy_type: &str, source: &mut impl ActionSource) -> Result<ExploreReport> {
        let enemy = create_enemy(enemy_type)?;
        self.fight_enemy(enemy, source)
    }

    /// Resolves the battle and applies any victory payout exactly once.
    pub fn fight_enemy(
        &mut self,
        enemy: Enemy,
        source: &mut impl ActionSource,
    ) -> Result<ExploreReport> {
        let battle = resolve_battle_with_config(
            &mut self.character,
            enemy,
            source,
            &mut self.rng,
            self.config.clone(),
        )?;

        let levels_gained = if battle.outcome == BattleOutcome::PlayerWon {
            apply_battle_rewards(&mut self.character, battle.xp_gained, battle.gold_gained)?
        } else {
            0
        };

        if battle.outcome == BattleOutcome::EnemyWon {
            info!(name = %self.character.name, "character died");
        }

        Ok(ExploreReport {
            battle,
            levels_gained,
        })
    }

    /// Revives the character if dead. Returns whether anything changed.
    pub fn revive(&mut self) -> bool {
        revive(&mut self.character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use crate::combat::{AlwaysAttack, PlayerAction, ScriptedActions};
    use crate::core::error::GameError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session(class: CharacterClass) -> GameSession<ChaCha8Rng> {
        GameSession::new(
            Character::new("Hero", class).unwrap(),
            ChaCha8Rng::seed_from_u64(9),
        )
    }

    #[test]
    fn test_explore_applies_rewards_once() {
        let mut session = session(CharacterClass::Warrior);
        let report = session.explore(&mut AlwaysAttack).unwrap();
        assert_eq!(report.outcome(), BattleOutcome::PlayerWon);
        assert_eq!(report.battle.enemy_name, "Goblin");
        assert_eq!(session.character().experience, 25);
        assert_eq!(session.character().gold, 110);
        assert_eq!(report.levels_gained, 0);
    }

    #[test]
    fn test_escape_applies_nothing() {
        let mut session = session(CharacterClass::Mage);
        let mut script = ScriptedActions::new([PlayerAction::forced_run(true)]);
        let report = session.fight("dragon", &mut script).unwrap();
        assert_eq!(report.outcome(), BattleOutcome::Escaped);
        assert_eq!(session.character().experience, 0);
        assert_eq!(session.character().gold, 100);
    }

    #[test]
    fn test_fight_unknown_enemy() {
        let mut session = session(CharacterClass::Mage);
        assert!(matches!(
            session.fight("slime", &mut AlwaysAttack),
            Err(GameError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_death_then_revive() {
        let mut session = session(CharacterClass::Mage);
        let report = session.fight("dragon", &mut AlwaysAttack).unwrap();
        assert_eq!(report.outcome(), BattleOutcome::EnemyWon);
        assert_eq!(session.character().health, 0);

        assert!(matches!(
            session.explore(&mut AlwaysAttack),
            Err(GameError::CharacterDead { .. })
        ));

        assert!(session.revive());
        assert_eq!(session.character().health, 40);
        assert!(!session.revive());
    }

    #[test]
    fn test_level_up_from_victories() {
        let mut session = session(CharacterClass::Warrior);
        let mut total_levels = 0;
        for _ in 0..4 {
            total_levels += session.explore(&mut AlwaysAttack).unwrap().levels_gained;
        }
        // 4 goblins = 100 xp
        assert_eq!(total_levels, 1);
        assert_eq!(session.character().level, 2);
        assert_eq!(session.character().experience, 0);
        assert_eq!(session.character().gold, 140);
    }
}

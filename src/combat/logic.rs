//! The turn-based battle state machine.
//!
//! A `Battle` borrows one character mutably for its whole lifetime and owns
//! one enemy. Each round is a player turn followed, if the battle is still
//! running and the player did not escape, by an enemy turn.
//!
//! The battle never applies rewards. On victory it reports the payout in
//! `BattleResult` and the caller applies it once through
//! `character::apply_battle_rewards`.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info};

use crate::character::Character;
use crate::core::combat_math::{apply_damage, calculate_damage, roll_chance};
use crate::core::config::BattleConfig;
use crate::core::error::{GameError, Result};

use super::abilities::use_special_ability;
use super::actions::{ActionSource, BattleView, PlayerAction};
use super::types::{rewards_for, CombatLogEntry, Enemy, Reward};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Active,
    PlayerWon,
    EnemyWon,
    Escaped,
}

impl BattleState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BattleState::Active)
    }
}

/// How a finished battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BattleOutcome {
    PlayerWon,
    EnemyWon,
    Escaped,
}

#[derive(Debug, Clone)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    pub xp_gained: u32,
    pub gold_gained: u32,
    pub rounds: u32,
    pub enemy_name: String,
    pub log: Vec<CombatLogEntry>,
}

impl BattleResult {
    pub fn reward(&self) -> Reward {
        Reward {
            xp: self.xp_gained,
            gold: self.gold_gained,
        }
    }
}

pub struct Battle<'c> {
    character: &'c mut Character,
    enemy: Enemy,
    config: BattleConfig,
    state: BattleState,
    turn_counter: u32,
    log: VecDeque<CombatLogEntry>,
}

impl<'c> Battle<'c> {
    pub fn new(character: &'c mut Character, enemy: Enemy) -> Result<Self> {
        Self::with_config(character, enemy, BattleConfig::default())
    }

    /// Fails with `CharacterDead` before touching anything if the character
    /// has no health left.
    pub fn with_config(
        character: &'c mut Character,
        enemy: Enemy,
        config: BattleConfig,
    ) -> Result<Self> {
        if !character.is_alive() {
            return Err(GameError::CharacterDead {
                name: character.name.clone(),
            });
        }

        debug!(character = %character.name, enemy = %enemy.name, "battle started");

        Ok(Self {
            character,
            enemy,
            log: VecDeque::with_capacity(config.log_capacity),
            config,
            state: BattleState::Active,
            turn_counter: 0,
        })
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BattleState::Active
    }

    /// Completed rounds.
    pub fn turn_counter(&self) -> u32 {
        self.turn_counter
    }

    pub fn character(&self) -> &Character {
        &*self.character
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn log(&self) -> impl Iterator<Item = &CombatLogEntry> {
        self.log.iter()
    }

    pub fn view(&self) -> BattleView<'_> {
        BattleView {
            character: &*self.character,
            enemy: &self.enemy,
            turn: self.turn_counter,
        }
    }

    fn add_log_entry(&mut self, message: String, is_crit: bool, is_player_action: bool) {
        if self.config.log_capacity == 0 {
            return;
        }
        if self.log.len() >= self.config.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(CombatLogEntry {
            message,
            is_crit,
            is_player_action,
        });
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(GameError::CombatNotActive)
        }
    }

    /// Plays one full round: the player's action, then the enemy's attack if
    /// the battle is still running.
    ///
    /// An `AbilityOnCooldown` error leaves the battle exactly as it was; the
    /// caller can retry the round with another action.
    pub fn play_round(&mut self, action: PlayerAction, rng: &mut impl Rng) -> Result<BattleState> {
        self.player_turn(action, rng)?;

        if self.is_active() {
            self.enemy_turn()?;
        }

        self.turn_counter += 1;
        debug!(
            round = self.turn_counter,
            player_hp = self.character.health,
            enemy_hp = self.enemy.health,
            state = ?self.state,
            "round complete"
        );

        Ok(self.state)
    }

    /// Resolves the player's action and decrements the special cooldown once.
    pub fn player_turn(&mut self, action: PlayerAction, rng: &mut impl Rng) -> Result<()> {
        self.ensure_active()?;

        match action {
            PlayerAction::Attack => {
                let damage = calculate_damage(self.character.strength, self.enemy.strength);
                self.enemy.take_damage(damage);
                let message = format!(
                    "{} attacks {} for {} damage!",
                    self.character.name, self.enemy.name, damage
                );
                self.add_log_entry(message, false, true);
            }
            PlayerAction::Special => {
                let result =
                    use_special_ability(self.character, &mut self.enemy, &self.config, rng)?;
                self.add_log_entry(result.message, result.is_crit, true);
            }
            PlayerAction::Run { forced } => {
                let escaped = self.attempt_escape(forced, rng);
                let message = if escaped {
                    format!("{} successfully escaped!", self.character.name)
                } else {
                    format!("{} failed to escape.", self.character.name)
                };
                self.add_log_entry(message, false, true);
            }
        }

        // Runs after the action so a fresh special starts its cooldown this turn.
        if self.character.special_cooldown > 0 {
            self.character.special_cooldown -= 1;
        }

        self.check_battle_end();
        Ok(())
    }

    /// The enemy always attacks.
    pub fn enemy_turn(&mut self) -> Result<()> {
        self.ensure_active()?;

        let damage = calculate_damage(self.enemy.strength, self.character.strength);
        self.character.health = apply_damage(self.character.health, damage);
        let message = format!(
            "{} attacks {} for {} damage!",
            self.enemy.name, self.character.name, damage
        );
        self.add_log_entry(message, false, false);

        self.check_battle_end();
        Ok(())
    }

    fn attempt_escape(&mut self, forced: Option<bool>, rng: &mut impl Rng) -> bool {
        let success = forced.unwrap_or_else(|| roll_chance(self.config.escape_chance, rng));
        if success {
            self.state = BattleState::Escaped;
        }
        success
    }

    /// Moves to a terminal state when either side has fallen.
    pub fn check_battle_end(&mut self) -> BattleState {
        if self.state.is_terminal() {
            return self.state;
        }
        if !self.enemy.is_alive() {
            self.state = BattleState::PlayerWon;
        } else if !self.character.is_alive() {
            self.state = BattleState::EnemyWon;
        }
        self.state
    }

    /// The final result, or `None` while the battle is still running.
    pub fn into_result(self) -> Option<BattleResult> {
        let (outcome, reward) = match self.state {
            BattleState::Active => return None,
            BattleState::PlayerWon => (BattleOutcome::PlayerWon, rewards_for(&self.enemy)),
            BattleState::EnemyWon => (BattleOutcome::EnemyWon, Reward::default()),
            BattleState::Escaped => (BattleOutcome::Escaped, Reward::default()),
        };

        Some(BattleResult {
            outcome,
            xp_gained: reward.xp,
            gold_gained: reward.gold,
            rounds: self.turn_counter,
            enemy_name: self.enemy.name,
            log: self.log.into(),
        })
    }
}

/// Runs a battle to completion with the default config.
pub fn resolve_battle(
    character: &mut Character,
    enemy: Enemy,
    source: &mut impl ActionSource,
    rng: &mut impl Rng,
) -> Result<BattleResult> {
    resolve_battle_with_config(character, enemy, source, rng, BattleConfig::default())
}

/// Runs a battle to completion.
///
/// A special requested while on cooldown is logged and replaced by a basic
/// attack for that turn. Rewards are returned, never applied.
pub fn resolve_battle_with_config(
    character: &mut Character,
    enemy: Enemy,
    source: &mut impl ActionSource,
    rng: &mut impl Rng,
    config: BattleConfig,
) -> Result<BattleResult> {
    let mut battle = Battle::with_config(character, enemy, config)?;

    while battle.is_active() {
        let action = source.choose_action(&battle.view());
        match battle.play_round(action, rng) {
            Ok(_) => {}
            Err(e) if e.is_recoverable() => {
                battle.add_log_entry(e.to_string(), false, true);
                battle.play_round(PlayerAction::Attack, rng)?;
            }
            Err(e) => return Err(e),
        }
    }

    let result = battle.into_result().ok_or(GameError::CombatNotActive)?;
    info!(
        outcome = ?result.outcome,
        enemy = %result.enemy_name,
        rounds = result.rounds,
        xp = result.xp_gained,
        gold = result.gold_gained,
        "battle resolved"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use crate::combat::actions::{AlwaysAttack, ScriptedActions};
    use crate::combat::types::create_enemy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    fn hero(class: CharacterClass) -> Character {
        Character::new("Hero", class).unwrap()
    }

    #[test]
    fn test_new_battle_is_active() {
        let mut c = hero(CharacterClass::Warrior);
        let battle = Battle::new(&mut c, create_enemy("goblin").unwrap()).unwrap();
        assert!(battle.is_active());
        assert_eq!(battle.turn_counter(), 0);
        assert_eq!(battle.log().count(), 0);
    }

    #[test]
    fn test_dead_character_cannot_start() {
        let mut c = hero(CharacterClass::Warrior);
        c.health = 0;
        let before = c.clone();
        let result = Battle::new(&mut c, create_enemy("goblin").unwrap());
        assert!(matches!(result, Err(GameError::CharacterDead { .. })));
        assert_eq!(c, before);
    }

    #[test]
    fn test_first_round_damage() {
        let mut c = hero(CharacterClass::Warrior);
        let mut rng = rng();
        let mut battle = Battle::new(&mut c, create_enemy("goblin").unwrap()).unwrap();
        let state = battle.play_round(PlayerAction::Attack, &mut rng).unwrap();
        assert_eq!(state, BattleState::Active);
        assert_eq!(battle.enemy().health, 37);
        assert_eq!(battle.character().health, 115);
        assert_eq!(battle.turn_counter(), 1);
        assert_eq!(battle.log().count(), 2);
    }

    #[test]
    fn test_warrior_beats_goblin_in_four_rounds() {
        let mut c = hero(CharacterClass::Warrior);
        let result =
            resolve_battle(&mut c, create_enemy("goblin").unwrap(), &mut AlwaysAttack, &mut rng())
                .unwrap();
        assert_eq!(result.outcome, BattleOutcome::PlayerWon);
        assert_eq!(result.rounds, 4);
        assert_eq!(result.xp_gained, 25);
        assert_eq!(result.gold_gained, 10);
        // Goblin dies in round 4 before it can counter: 3 hits of 5
        assert_eq!(c.health, 105);
        assert_eq!(c.experience, 0);
        assert_eq!(c.gold, 100);
    }

    #[test]
    fn test_no_enemy_turn_after_victory() {
        let mut c = hero(CharacterClass::Warrior);
        let mut goblin = create_enemy("goblin").unwrap();
        goblin.health = 5;
        let mut battle = Battle::new(&mut c, goblin).unwrap();
        let state = battle.play_round(PlayerAction::Attack, &mut rng()).unwrap();
        assert_eq!(state, BattleState::PlayerWon);
        assert_eq!(battle.character().health, 120);
        assert_eq!(battle.enemy().health, 0);
    }

    #[test]
    fn test_enemy_wins() {
        let mut c = hero(CharacterClass::Mage);
        c.health = 10;
        let result =
            resolve_battle(&mut c, create_enemy("dragon").unwrap(), &mut AlwaysAttack, &mut rng())
                .unwrap();
        assert_eq!(result.outcome, BattleOutcome::EnemyWon);
        assert_eq!(result.reward(), Reward::default());
        assert_eq!(c.health, 0);
    }

    #[test]
    fn test_forced_escape() {
        let mut c = hero(CharacterClass::Rogue);
        let mut script = ScriptedActions::new([PlayerAction::forced_run(true)]);
        let result =
            resolve_battle(&mut c, create_enemy("dragon").unwrap(), &mut script, &mut rng())
                .unwrap();
        assert_eq!(result.outcome, BattleOutcome::Escaped);
        assert_eq!(result.xp_gained, 0);
        assert_eq!(result.gold_gained, 0);
        assert_eq!(c.health, 90);
    }

    #[test]
    fn test_failed_escape_gives_enemy_a_turn() {
        let mut c = hero(CharacterClass::Rogue);
        let mut battle = Battle::new(&mut c, create_enemy("orc").unwrap()).unwrap();
        let state = battle
            .play_round(PlayerAction::forced_run(false), &mut rng())
            .unwrap();
        assert_eq!(state, BattleState::Active);
        // Orc: 12 - 12/4 = 9
        assert_eq!(battle.character().health, 81);
        assert_eq!(battle.enemy().health, 80);
    }

    #[test]
    fn test_special_on_cooldown_leaves_battle_untouched() {
        let mut c = hero(CharacterClass::Rogue);
        let mut rng = rng();
        let mut battle = Battle::new(&mut c, create_enemy("dragon").unwrap()).unwrap();

        battle.play_round(PlayerAction::Special, &mut rng).unwrap();
        assert_eq!(battle.character().special_cooldown, 2);
        let enemy_hp = battle.enemy().health;
        let hero_hp = battle.character().health;

        let err = battle
            .play_round(PlayerAction::Special, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GameError::AbilityOnCooldown { turns_remaining: 2 }));
        assert_eq!(battle.enemy().health, enemy_hp);
        assert_eq!(battle.character().health, hero_hp);
        assert_eq!(battle.character().special_cooldown, 2);
        assert_eq!(battle.turn_counter(), 1);
        assert!(battle.is_active());
    }

    #[test]
    fn test_cooldown_decrements_once_per_turn() {
        let mut c = hero(CharacterClass::Warrior);
        let mut rng = rng();
        let mut battle = Battle::new(&mut c, create_enemy("dragon").unwrap()).unwrap();

        battle.play_round(PlayerAction::Special, &mut rng).unwrap();
        assert_eq!(battle.character().special_cooldown, 2);
        battle.play_round(PlayerAction::Attack, &mut rng).unwrap();
        assert_eq!(battle.character().special_cooldown, 1);
        battle.play_round(PlayerAction::Attack, &mut rng).unwrap();
        assert_eq!(battle.character().special_cooldown, 0);
        assert!(battle.play_round(PlayerAction::Special, &mut rng).is_ok());
    }

    #[test]
    fn test_turn_after_end_fails() {
        let mut c = hero(CharacterClass::Warrior);
        let mut battle = Battle::new(&mut c, create_enemy("goblin").unwrap()).unwrap();
        battle
            .play_round(PlayerAction::forced_run(true), &mut rng())
            .unwrap();
        assert_eq!(battle.state(), BattleState::Escaped);
        assert!(matches!(
            battle.play_round(PlayerAction::Attack, &mut rng()),
            Err(GameError::CombatNotActive)
        ));
        assert!(matches!(battle.enemy_turn(), Err(GameError::CombatNotActive)));
    }

    #[test]
    fn test_into_result_while_active() {
        let mut c = hero(CharacterClass::Warrior);
        let battle = Battle::new(&mut c, create_enemy("goblin").unwrap()).unwrap();
        assert!(battle.into_result().is_none());
    }

    #[test]
    fn test_resolver_replaces_cooldown_special_with_attack() {
        let mut c = hero(CharacterClass::Warrior);
        let mut script = ScriptedActions::new([PlayerAction::Special, PlayerAction::Special]);
        let result =
            resolve_battle(&mut c, create_enemy("goblin").unwrap(), &mut script, &mut rng())
                .unwrap();
        assert_eq!(result.outcome, BattleOutcome::PlayerWon);
        assert!(result
            .log
            .iter()
            .any(|entry| entry.message.contains("cooldown")));
    }

    #[test]
    fn test_log_capacity_bounded() {
        let mut c = hero(CharacterClass::Warrior);
        let config = BattleConfig {
            log_capacity: 3,
            ..Default::default()
        };
        let result = resolve_battle_with_config(
            &mut c,
            create_enemy("goblin").unwrap(),
            &mut AlwaysAttack,
            &mut rng(),
            config,
        )
        .unwrap();
        assert_eq!(result.log.len(), 3);
        assert!(result.log.last().unwrap().is_player_action);
    }
}

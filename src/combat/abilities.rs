//! Class special abilities.

use rand::Rng;

use crate::character::{Character, CharacterClass};
use crate::core::combat_math::{apply_heal, roll_chance};
use crate::core::config::BattleConfig;
use crate::core::constants::*;
use crate::core::error::{GameError, Result};

use super::types::Enemy;

/// What a special ability did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityResult {
    pub message: String,
    pub damage: u32,
    pub healed: u32,
    pub is_crit: bool,
}

/// Uses the character's class ability and puts it on cooldown.
///
/// Fails with `AbilityOnCooldown` without touching either combatant when the
/// cooldown has not expired.
pub fn use_special_ability(
    character: &mut Character,
    enemy: &mut Enemy,
    config: &BattleConfig,
    rng: &mut impl Rng,
) -> Result<AbilityResult> {
    if character.special_cooldown > 0 {
        return Err(GameError::AbilityOnCooldown {
            turns_remaining: character.special_cooldown,
        });
    }

    let result = match character.class {
        CharacterClass::Warrior => power_strike(character, enemy),
        CharacterClass::Mage => fireball(character, enemy),
        CharacterClass::Rogue => critical_strike(character, enemy, config.crit_chance, rng),
        CharacterClass::Cleric => cleric_heal(character, config.cleric_heal),
        CharacterClass::None => AbilityResult {
            message: format!("{} has no special ability.", character.name),
            damage: 0,
            healed: 0,
            is_crit: false,
        },
    };

    character.special_cooldown = config.special_cooldown;
    Ok(result)
}

fn strike(enemy: &mut Enemy, damage: u32, message: String, is_crit: bool) -> AbilityResult {
    enemy.take_damage(damage);
    AbilityResult {
        message,
        damage,
        healed: 0,
        is_crit,
    }
}

fn power_strike(character: &Character, enemy: &mut Enemy) -> AbilityResult {
    let damage = character.strength.saturating_mul(POWER_STRIKE_MULTIPLIER);
    let message = format!(
        "{} uses Power Strike on {} for {} damage!",
        character.name, enemy.name, damage
    );
    strike(enemy, damage, message, false)
}

fn fireball(character: &Character, enemy: &mut Enemy) -> AbilityResult {
    let damage = character.magic.saturating_mul(FIREBALL_MULTIPLIER);
    let message = format!(
        "{} casts Fireball on {} for {} damage!",
        character.name, enemy.name, damage
    );
    strike(enemy, damage, message, false)
}

fn critical_strike(
    character: &Character,
    enemy: &mut Enemy,
    crit_chance: f64,
    rng: &mut impl Rng,
) -> AbilityResult {
    if roll_chance(crit_chance, rng) {
        let damage = character.strength.saturating_mul(CRITICAL_STRIKE_MULTIPLIER);
        let message = format!(
            "{} lands a Critical Strike on {} for {} damage!",
            character.name, enemy.name, damage
        );
        strike(enemy, damage, message, true)
    } else {
        let damage = character.strength;
        let message = format!("{} attacks normally for {} damage.", character.name, damage);
        strike(enemy, damage, message, false)
    }
}

fn cleric_heal(character: &mut Character, amount: u32) -> AbilityResult {
    let (health, healed) = apply_heal(character.health, character.max_health, amount);
    character.health = health;
    AbilityResult {
        message: format!("{} heals for {} HP!", character.name, healed),
        damage: 0,
        healed,
        is_crit: false,
    }
}

//! Experience, leveling, gold, healing and death/revival rules.
//!
//! These functions are the only place a character's progression fields
//! change outside of battle. Battle rewards are applied here by the
//! caller, exactly once, through `apply_battle_rewards`.

use tracing::{debug, info};

use super::types::Character;
use crate::core::combat_math::apply_heal;
use crate::core::constants::*;
use crate::core::error::{GameError, Result};

/// Adds experience and resolves every level-up it pays for.
///
/// The threshold is `level * 100` and scales with the new level on each
/// iteration, so one large grant can cross several levels. Each level
/// grants +10 max health, +2 strength, +2 magic and a full heal.
///
/// Returns the number of levels gained. Fails with `ExperienceOverflow`,
/// changing nothing, when the new total would not fit in a `u32`.
pub fn gain_experience(character: &mut Character, amount: u32) -> Result<u32> {
    if is_dead(character) {
        return Err(GameError::CharacterDead {
            name: character.name.clone(),
        });
    }

    character.experience = character.experience.checked_add(amount).ok_or(
        GameError::ExperienceOverflow {
            experience: character.experience,
            amount,
        },
    )?;

    let mut levels_gained = 0;
    while character.experience >= character.xp_for_next_level() {
        character.experience -= character.xp_for_next_level();
        character.level = character.level.saturating_add(1);
        character.max_health = character.max_health.saturating_add(LEVEL_UP_MAX_HEALTH);
        character.strength = character.strength.saturating_add(LEVEL_UP_STRENGTH);
        character.magic = character.magic.saturating_add(LEVEL_UP_MAGIC);
        character.health = character.max_health;
        levels_gained += 1;
    }

    if levels_gained > 0 {
        info!(
            name = %character.name,
            level = character.level,
            levels_gained,
            "level up"
        );
    }

    Ok(levels_gained)
}

/// Applies a gold change (negative for spending) and returns the new total.
///
/// Fails rather than clamping when the result would be negative.
pub fn adjust_gold(character: &mut Character, delta: i64) -> Result<u32> {
    let new_gold = character.gold as i64 + delta;
    if new_gold < 0 {
        return Err(GameError::InsufficientGold {
            gold: character.gold,
            delta,
        });
    }

    character.gold = u32::try_from(new_gold).unwrap_or(u32::MAX);
    Ok(character.gold)
}

/// Heals up to `max_health`. Dead characters are not healed.
///
/// Returns the amount actually restored.
pub fn heal(character: &mut Character, amount: u32) -> u32 {
    if is_dead(character) {
        return 0;
    }
    let (health, healed) = apply_heal(character.health, character.max_health, amount);
    character.health = health;
    healed
}

pub fn is_dead(character: &Character) -> bool {
    character.health == 0
}

pub fn can_fight(character: &Character) -> bool {
    !is_dead(character)
}

/// Brings a dead character back at half health (at least 1).
///
/// Returns false and changes nothing when the character is alive.
pub fn revive(character: &mut Character) -> bool {
    if !is_dead(character) {
        return false;
    }
    character.health = (character.max_health / 2).max(1);
    debug!(name = %character.name, health = character.health, "revived");
    true
}

pub fn xp_to_next_level(character: &Character) -> u32 {
    character
        .xp_for_next_level()
        .saturating_sub(character.experience)
}

/// Applies a battle or quest payout through the progression rules.
///
/// Returns the number of levels gained.
pub fn apply_battle_rewards(character: &mut Character, xp: u32, gold: u32) -> Result<u32> {
    let levels = gain_experience(character, xp)?;
    adjust_gold(character, gold as i64)?;
    Ok(levels)
}

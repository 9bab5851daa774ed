//! Inventory slots, item use, equipment and the shop.
//!
//! The inventory is a list of item ids capped at `MAX_INVENTORY_SIZE`.
//! Equipped items leave the inventory and their effect stays applied until
//! they are unequipped, which reverses it.

use tracing::debug;

use crate::character::{adjust_gold, heal, is_dead, Character};
use crate::core::combat_math::apply_damage;
use crate::core::constants::{MAX_INVENTORY_SIZE, SELL_PRICE_DIVISOR};
use crate::core::error::{GameError, Result};

use super::types::{ItemCatalog, ItemEffect, ItemKind, Stat};

pub fn add_item(character: &mut Character, item_id: &str) -> Result<()> {
    if space_remaining(character) == 0 {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }
    character.inventory.push(item_id.to_string());
    Ok(())
}

/// Removes one copy of the item.
pub fn remove_item(character: &mut Character, item_id: &str) -> Result<()> {
    let index = character
        .inventory
        .iter()
        .position(|id| id == item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    character.inventory.remove(index);
    Ok(())
}

pub fn has_item(character: &Character, item_id: &str) -> bool {
    character.inventory.iter().any(|id| id == item_id)
}

pub fn count_item(character: &Character, item_id: &str) -> usize {
    character.inventory.iter().filter(|id| *id == item_id).count()
}

pub fn space_remaining(character: &Character) -> usize {
    MAX_INVENTORY_SIZE.saturating_sub(character.inventory.len())
}

/// Empties the inventory and returns what was in it.
pub fn clear_inventory(character: &mut Character) -> Vec<String> {
    std::mem::take(&mut character.inventory)
}

/// Item ids with their counts, in first-seen order.
pub fn inventory_counts(character: &Character) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for id in &character.inventory {
        match counts.iter().position(|(seen, _)| *seen == id.as_str()) {
            Some(i) => counts[i].1 += 1,
            None => counts.push((id.as_str(), 1)),
        }
    }
    counts
}

fn offset(value: u32, delta: i64) -> u32 {
    (i64::from(value) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

/// Applies `effect` scaled by `sign` (1 to apply, -1 to reverse).
///
/// Health is healed up to max or damaged down to 0. Max health never drops
/// below 1 and current health is clamped to it.
fn apply_effect(character: &mut Character, effect: ItemEffect, sign: i64) {
    let delta = i64::from(effect.value) * sign;
    match effect.stat {
        Stat::Health if delta >= 0 => {
            heal(character, offset(0, delta));
        }
        Stat::Health => {
            character.health = apply_damage(character.health, offset(0, -delta));
        }
        Stat::MaxHealth => {
            character.max_health = offset(character.max_health, delta).max(1);
            character.health = character.health.min(character.max_health);
        }
        Stat::Strength => character.strength = offset(character.strength, delta),
        Stat::Magic => character.magic = offset(character.magic, delta),
    }
}

/// Consumes one consumable and applies its effect.
pub fn use_item(character: &mut Character, item_id: &str, catalog: &ItemCatalog) -> Result<String> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let item = catalog.get(item_id)?;
    if item.kind != ItemKind::Consumable {
        return Err(GameError::InvalidItemType(format!(
            "cannot use a {} ({})",
            item.kind, item.name
        )));
    }
    if is_dead(character) {
        return Err(GameError::CharacterDead {
            name: character.name.clone(),
        });
    }

    apply_effect(character, item.effect, 1);
    remove_item(character, item_id)?;
    debug!(name = %character.name, item = item_id, "used item");

    Ok(format!(
        "{} used {}: {} changed by {}.",
        character.name, item.name, item.effect.stat, item.effect.value
    ))
}

fn slot(character: &mut Character, kind: ItemKind) -> Result<&mut Option<String>> {
    match kind {
        ItemKind::Weapon => Ok(&mut character.equipped_weapon),
        ItemKind::Armor => Ok(&mut character.equipped_armor),
        ItemKind::Consumable => Err(GameError::InvalidItemType(
            "consumables cannot be equipped".to_string(),
        )),
    }
}

fn equip(
    character: &mut Character,
    item_id: &str,
    catalog: &ItemCatalog,
    kind: ItemKind,
) -> Result<String> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let item = catalog.get(item_id)?;
    if item.kind != kind {
        return Err(GameError::InvalidItemType(format!(
            "cannot equip a {} as {}",
            item.kind, kind
        )));
    }

    // Removing the new item first frees the slot the old one returns to.
    remove_item(character, item_id)?;
    unequip(character, catalog, kind)?;

    apply_effect(character, item.effect, 1);
    *slot(character, kind)? = Some(item_id.to_string());
    debug!(name = %character.name, item = item_id, "equipped");

    Ok(format!(
        "{} equipped {} ({}).",
        character.name, item.name, item.effect
    ))
}

fn unequip(character: &mut Character, catalog: &ItemCatalog, kind: ItemKind) -> Result<Option<String>> {
    let Some(item_id) = slot(character, kind)?.clone() else {
        return Ok(None);
    };
    if space_remaining(character) == 0 {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }

    if let Ok(item) = catalog.get(&item_id) {
        apply_effect(character, item.effect, -1);
    }
    *slot(character, kind)? = None;
    character.inventory.push(item_id.clone());
    Ok(Some(item_id))
}

pub fn equip_weapon(character: &mut Character, item_id: &str, catalog: &ItemCatalog) -> Result<String> {
    equip(character, item_id, catalog, ItemKind::Weapon)
}

pub fn equip_armor(character: &mut Character, item_id: &str, catalog: &ItemCatalog) -> Result<String> {
    equip(character, item_id, catalog, ItemKind::Armor)
}

/// Returns the weapon to the inventory. `None` when nothing was equipped.
pub fn unequip_weapon(character: &mut Character, catalog: &ItemCatalog) -> Result<Option<String>> {
    unequip(character, catalog, ItemKind::Weapon)
}

pub fn unequip_armor(character: &mut Character, catalog: &ItemCatalog) -> Result<Option<String>> {
    unequip(character, catalog, ItemKind::Armor)
}

/// Buys one item, spending its cost through `adjust_gold`.
///
/// Space is checked before gold so a full inventory never costs anything.
pub fn purchase_item(character: &mut Character, item_id: &str, catalog: &ItemCatalog) -> Result<u32> {
    let item = catalog.get(item_id)?;
    if space_remaining(character) == 0 {
        return Err(GameError::InventoryFull {
            capacity: MAX_INVENTORY_SIZE,
        });
    }

    let gold = adjust_gold(character, -i64::from(item.cost))?;
    character.inventory.push(item_id.to_string());
    debug!(name = %character.name, item = item_id, cost = item.cost, "purchased");
    Ok(gold)
}

/// Sells one item for half its cost. Returns the price received.
pub fn sell_item(character: &mut Character, item_id: &str, catalog: &ItemCatalog) -> Result<u32> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let price = catalog.get(item_id)?.cost / SELL_PRICE_DIVISOR;

    remove_item(character, item_id)?;
    adjust_gold(character, i64::from(price))?;
    Ok(price)
}

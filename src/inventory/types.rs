use std::collections::btree_map::{BTreeMap, Values};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Consumable => "consumable",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Character stat an item modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
}

impl Stat {
    pub fn name(&self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        [Stat::Health, Stat::MaxHealth, Stat::Strength, Stat::Magic]
            .into_iter()
            .find(|stat| stat.name() == s.trim().to_lowercase())
            .ok_or_else(|| GameError::InvalidItemType(format!("unknown stat '{}'", s.trim())))
    }
}

/// A `stat:value` modifier such as `health:50` or `strength:5`.
///
/// Serialized in that same string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemEffect {
    pub stat: Stat,
    pub value: i32,
}

impl FromStr for ItemEffect {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let (stat, value) = s
            .split_once(':')
            .ok_or_else(|| GameError::InvalidItemType(format!("invalid effect '{}'", s)))?;
        let value = value
            .trim()
            .parse::<i32>()
            .map_err(|e| GameError::InvalidItemType(format!("invalid effect '{}': {}", s, e)))?;
        Ok(Self {
            stat: stat.parse()?,
            value,
        })
    }
}

impl TryFrom<String> for ItemEffect {
    type Error = GameError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ItemEffect> for String {
    fn from(effect: ItemEffect) -> Self {
        effect.to_string()
    }
}

impl fmt::Display for ItemEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stat, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub effect: ItemEffect,
    pub cost: u32,
    #[serde(default)]
    pub description: String,
}

/// Every item the shop knows, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCatalog {
    items: BTreeMap<String, Item>,
}

impl ItemCatalog {
    pub fn new(items: Vec<Item>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for item in items {
            if map.contains_key(&item.id) {
                return Err(GameError::InvalidConfig(format!(
                    "duplicate item id '{}'",
                    item.id
                )));
            }
            map.insert(item.id.clone(), item);
        }
        Ok(Self { items: map })
    }

    /// Parses a JSON array of items.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn get(&self, item_id: &str) -> Result<&Item> {
        self.items
            .get(item_id)
            .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))
    }

    pub fn iter(&self) -> Values<'_, String, Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn item(id: &str, name: &str, kind: ItemKind, effect: (Stat, i32), cost: u32, description: &str) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        effect: ItemEffect {
            stat: effect.0,
            value: effect.1,
        },
        cost,
        description: description.to_string(),
    }
}

impl Default for ItemCatalog {
    /// The built-in shop stock.
    fn default() -> Self {
        let items = [
            item(
                "health_potion",
                "Health Potion",
                ItemKind::Consumable,
                (Stat::Health, 50),
                20,
                "Restores 50 health.",
            ),
            item(
                "elixir_of_might",
                "Elixir of Might",
                ItemKind::Consumable,
                (Stat::Strength, 2),
                120,
                "Permanently adds 2 strength.",
            ),
            item(
                "iron_sword",
                "Iron Sword",
                ItemKind::Weapon,
                (Stat::Strength, 5),
                50,
                "A plain, reliable blade.",
            ),
            item(
                "oak_staff",
                "Oak Staff",
                ItemKind::Weapon,
                (Stat::Magic, 6),
                60,
                "Focuses a caster's magic.",
            ),
            item(
                "leather_armor",
                "Leather Armor",
                ItemKind::Armor,
                (Stat::MaxHealth, 15),
                40,
                "Light armor.",
            ),
            item(
                "chain_mail",
                "Chain Mail",
                ItemKind::Armor,
                (Stat::MaxHealth, 30),
                90,
                "Heavy armor.",
            ),
        ];

        Self {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }
}

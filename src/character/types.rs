use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::combat_math::is_alive;
use crate::core::constants::*;
use crate::core::error::{GameError, Result};

/// Character class. Each class carries its own special ability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
    /// No special ability. Legal on a record but not offered at creation.
    None,
}

impl CharacterClass {
    /// The classes a new character may pick.
    pub fn playable() -> [CharacterClass; 4] {
        [
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::None => "None",
        }
    }

    /// Starting (health, strength, magic).
    pub fn base_stats(&self) -> (u32, u32, u32) {
        match self {
            CharacterClass::Warrior => (120, 15, 5),
            CharacterClass::Mage => (80, 8, 20),
            CharacterClass::Rogue => (90, 12, 10),
            CharacterClass::Cleric => (100, 10, 15),
            CharacterClass::None => (100, 10, 10),
        }
    }

    pub fn ability_name(&self) -> Option<&'static str> {
        match self {
            CharacterClass::Warrior => Some("Power Strike"),
            CharacterClass::Mage => Some("Fireball"),
            CharacterClass::Rogue => Some("Critical Strike"),
            CharacterClass::Cleric => Some("Heal"),
            CharacterClass::None => None,
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    /// Parses playable classes only, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        CharacterClass::playable()
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidCharacterClass(s.to_string()))
    }
}

/// A player character record.
///
/// Battles touch the numeric fields and `special_cooldown`. The inventory,
/// equipment slots and quest lists are owned by the `inventory` and
/// `quest` modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub experience: u32,
    pub gold: u32,
    #[serde(default)]
    pub special_cooldown: u32,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub active_quests: Vec<String>,
    #[serde(default)]
    pub completed_quests: Vec<String>,
    #[serde(default)]
    pub equipped_weapon: Option<String>,
    #[serde(default)]
    pub equipped_armor: Option<String>,
}

impl Character {
    /// Creates a level 1 character with the class's base stats.
    pub fn new(name: &str, class: CharacterClass) -> Result<Self> {
        validate_name(name)?;
        let (health, strength, magic) = class.base_stats();
        Ok(Self {
            name: name.trim().to_string(),
            class,
            level: STARTING_LEVEL,
            health,
            max_health: health,
            strength,
            magic,
            experience: 0,
            gold: STARTING_GOLD,
            special_cooldown: 0,
            inventory: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
        })
    }

    /// Checks the invariants a loaded record must satisfy.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if self.level < 1 {
            return Err(GameError::InvalidSaveData(
                "level must be at least 1".to_string(),
            ));
        }
        if self.max_health == 0 {
            return Err(GameError::InvalidSaveData(
                "max_health must be positive".to_string(),
            ));
        }
        if self.health > self.max_health {
            return Err(GameError::InvalidSaveData(format!(
                "health {} exceeds max_health {}",
                self.health, self.max_health
            )));
        }
        if self.inventory.len() > MAX_INVENTORY_SIZE {
            return Err(GameError::InvalidSaveData(format!(
                "inventory holds {} items, limit is {}",
                self.inventory.len(),
                MAX_INVENTORY_SIZE
            )));
        }
        Ok(())
    }

    pub fn is_alive(&self) -> bool {
        is_alive(self.health)
    }

    pub fn xp_for_next_level(&self) -> u32 {
        self.level.saturating_mul(XP_PER_LEVEL)
    }
}

/// Creates a new character from a class name (Warrior/Mage/Rogue/Cleric).
pub fn create_character(name: &str, class_name: &str) -> Result<Character> {
    let class = class_name.parse::<CharacterClass>()?;
    Character::new(name, class)
}

pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(GameError::InvalidSaveData(
            "Name cannot be empty".to_string(),
        ));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(GameError::InvalidSaveData(format!(
            "Name must be {} characters or less",
            MAX_NAME_LENGTH
        )));
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');

    if !valid_chars {
        return Err(GameError::InvalidSaveData(
            "Name can only contain letters, numbers, spaces, hyphens, and underscores".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_character_base_stats() {
        let hero = create_character("Hero", "Warrior").unwrap();
        assert_eq!(hero.class, CharacterClass::Warrior);
        assert_eq!(hero.level, 1);
        assert_eq!(hero.health, 120);
        assert_eq!(hero.max_health, 120);
        assert_eq!(hero.strength, 15);
        assert_eq!(hero.magic, 5);
        assert_eq!(hero.experience, 0);
        assert_eq!(hero.gold, 100);
        assert_eq!(hero.special_cooldown, 0);
        assert!(hero.inventory.is_empty());
        assert!(hero.active_quests.is_empty());
        assert!(hero.completed_quests.is_empty());
        assert_eq!(hero.equipped_weapon, None);

        let mage = create_character("Merlin", "Mage").unwrap();
        assert_eq!((mage.max_health, mage.strength, mage.magic), (80, 8, 20));
        let rogue = create_character("Shade", "Rogue").unwrap();
        assert_eq!((rogue.max_health, rogue.strength, rogue.magic), (90, 12, 10));
        let cleric = create_character("Ana", "Cleric").unwrap();
        assert_eq!(
            (cleric.max_health, cleric.strength, cleric.magic),
            (100, 10, 15)
        );
    }

    #[test]
    fn test_class_parse_case_insensitive() {
        assert_eq!("warrior".parse::<CharacterClass>().unwrap(), CharacterClass::Warrior);
        assert_eq!(" MAGE ".parse::<CharacterClass>().unwrap(), CharacterClass::Mage);
    }

    #[test]
    fn test_invalid_class_rejected() {
        assert!(matches!(
            create_character("Hero", "Bard"),
            Err(GameError::InvalidCharacterClass(_))
        ));
        assert!(matches!(
            create_character("Hero", "None"),
            Err(GameError::InvalidCharacterClass(_))
        ));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Hero").is_ok());
        assert!(validate_name("Warrior-2").is_ok());
        assert!(validate_name("under_score").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("12345678901234567").is_err());
        assert!(validate_name("test@123").is_err());
    }

    #[test]
    fn test_validate_record() {
        let mut hero = create_character("Hero", "Rogue").unwrap();
        assert!(hero.validate().is_ok());

        hero.health = hero.max_health + 1;
        assert!(matches!(hero.validate(), Err(GameError::InvalidSaveData(_))));

        hero.health = 10;
        hero.level = 0;
        assert!(hero.validate().is_err());

        hero.level = 1;
        hero.inventory = vec!["health_potion".to_string(); MAX_INVENTORY_SIZE + 1];
        assert!(matches!(hero.validate(), Err(GameError::InvalidSaveData(_))));
    }

    #[test]
    fn test_ability_names() {
        assert_eq!(CharacterClass::Warrior.ability_name(), Some("Power Strike"));
        assert_eq!(CharacterClass::None.ability_name(), None);
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::Character;
use crate::core::constants::{SAVE_DIR_NAME, SAVE_FILE_VERSION};
use crate::core::error::{GameError, Result};

#[derive(Serialize, Deserialize)]
struct CharacterSaveData {
    version: u32,
    last_save_time: i64,
    character: Character,
}

#[derive(Debug, Clone)]
pub struct CharacterInfo {
    pub character_name: String,
    pub filename: String,
    pub class_name: String,
    pub level: u32,
    pub last_save_time: i64,
    pub is_corrupted: bool,
}

/// Stores one JSON file per character in a save directory.
pub struct CharacterManager {
    save_dir: PathBuf,
}

impl CharacterManager {
    /// Uses `~/.quest-chronicles`, creating it if needed.
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;
        Self::with_dir(home_dir.join(SAVE_DIR_NAME))
    }

    pub fn with_dir(save_dir: impl Into<PathBuf>) -> Result<Self> {
        let save_dir = save_dir.into();
        fs::create_dir_all(&save_dir)?;
        Ok(Self { save_dir })
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.save_dir.join(format!("{}.json", sanitize_name(name)))
    }

    pub fn save_character(&self, character: &Character) -> Result<()> {
        character.validate()?;

        let save_data = CharacterSaveData {
            version: SAVE_FILE_VERSION,
            last_save_time: chrono::Utc::now().timestamp(),
            character: character.clone(),
        };

        let json = serde_json::to_string_pretty(&save_data)?;
        let filepath = self.path_for(&character.name);
        fs::write(&filepath, json)?;
        debug!(path = %filepath.display(), "saved character");

        Ok(())
    }

    pub fn load_character(&self, name: &str) -> Result<Character> {
        Ok(self.load_file(&self.path_for(name), name)?.character)
    }

    fn load_file(&self, filepath: &Path, name: &str) -> Result<CharacterSaveData> {
        let json_content = match fs::read_to_string(filepath) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(GameError::CharacterNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let save_data: CharacterSaveData = serde_json::from_str(&json_content)?;
        save_data.character.validate()?;
        Ok(save_data)
    }

    /// All saved characters sorted by name. Unreadable files are listed as corrupted.
    pub fn list_characters(&self) -> Result<Vec<CharacterInfo>> {
        let mut characters = Vec::new();

        for entry in fs::read_dir(&self.save_dir)? {
            let path = entry?.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let filename = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("")
                .to_string();
            let stem = filename.trim_end_matches(".json").to_string();

            match self.load_file(&path, &stem) {
                Ok(CharacterSaveData {
                    character,
                    last_save_time,
                    ..
                }) => {
                    characters.push(CharacterInfo {
                        character_name: character.name,
                        filename,
                        class_name: character.class.to_string(),
                        level: character.level,
                        last_save_time,
                        is_corrupted: false,
                    });
                }
                Err(e) => {
                    warn!(file = %filename, error = %e, "corrupted save file");
                    characters.push(CharacterInfo {
                        character_name: "[CORRUPTED]".to_string(),
                        filename,
                        class_name: String::new(),
                        level: 0,
                        last_save_time: 0,
                        is_corrupted: true,
                    });
                }
            }
        }

        characters.sort_by(|a, b| a.filename.cmp(&b.filename));

        Ok(characters)
    }

    pub fn delete_character(&self, name: &str) -> Result<()> {
        let filepath = self.path_for(name);
        if !filepath.exists() {
            return Err(GameError::CharacterNotFound(name.to_string()));
        }
        fs::remove_file(filepath)?;
        Ok(())
    }

    pub fn character_exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }
}

pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::types::create_character;

    fn temp_manager() -> (tempfile::TempDir, CharacterManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = CharacterManager::with_dir(dir.path()).unwrap();
        (dir, manager)
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Hero"), "hero");
        assert_eq!(sanitize_name("Mage the Great"), "mage_the_great");
        assert_eq!(sanitize_name("Warrior-2"), "warrior-2");
        assert_eq!(sanitize_name("   Spaces   "), "spaces");
    }

    #[test]
    fn test_save_and_load_character() {
        let (_dir, manager) = temp_manager();
        let mut hero = create_character("Test Hero", "Cleric").unwrap();
        hero.inventory.push("health_potion".to_string());
        hero.active_quests.push("first_quest".to_string());
        hero.special_cooldown = 2;

        manager.save_character(&hero).unwrap();
        assert!(manager.save_dir().join("test_hero.json").exists());

        let loaded = manager.load_character("Test Hero").unwrap();
        assert_eq!(loaded, hero);
    }

    #[test]
    fn test_load_missing_character() {
        let (_dir, manager) = temp_manager();
        assert!(matches!(
            manager.load_character("Nobody"),
            Err(GameError::CharacterNotFound(_))
        ));
    }

    #[test]
    fn test_load_corrupted_json() {
        let (_dir, manager) = temp_manager();
        fs::write(manager.save_dir().join("broken.json"), "{ not json").unwrap();
        assert!(matches!(
            manager.load_character("broken"),
            Err(GameError::SaveFileCorrupted(_))
        ));
    }

    #[test]
    fn test_load_invalid_record() {
        let (_dir, manager) = temp_manager();
        let mut hero = create_character("Hero", "Warrior").unwrap();
        hero.health = 500;
        let data = CharacterSaveData {
            version: SAVE_FILE_VERSION,
            last_save_time: 0,
            character: hero,
        };
        fs::write(
            manager.save_dir().join("hero.json"),
            serde_json::to_string(&data).unwrap(),
        )
        .unwrap();
        assert!(matches!(
            manager.load_character("Hero"),
            Err(GameError::InvalidSaveData(_))
        ));
    }

    #[test]
    fn test_list_characters() {
        let (_dir, manager) = temp_manager();
        manager
            .save_character(&create_character("Bravo", "Mage").unwrap())
            .unwrap();
        manager
            .save_character(&create_character("Alpha", "Rogue").unwrap())
            .unwrap();
        fs::write(manager.save_dir().join("zzz.json"), "garbage").unwrap();
        fs::write(manager.save_dir().join("notes.txt"), "ignored").unwrap();

        let list = manager.list_characters().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].character_name, "Alpha");
        assert_eq!(list[0].class_name, "Rogue");
        assert_eq!(list[1].character_name, "Bravo");
        assert!(list[2].is_corrupted);
    }

    #[test]
    fn test_list_reports_saved_timestamp() {
        let (_dir, manager) = temp_manager();
        let data = CharacterSaveData {
            version: SAVE_FILE_VERSION,
            last_save_time: 1_700_000_000,
            character: create_character("Stamp", "Cleric").unwrap(),
        };
        fs::write(
            manager.save_dir().join("stamp.json"),
            serde_json::to_string(&data).unwrap(),
        )
        .unwrap();

        let list = manager.list_characters().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].last_save_time, 1_700_000_000);
        assert_eq!(list[0].level, 1);
    }

    #[test]
    fn test_delete_character() {
        let (_dir, manager) = temp_manager();
        let hero = create_character("Hero", "Warrior").unwrap();
        manager.save_character(&hero).unwrap();
        assert!(manager.character_exists("Hero"));

        manager.delete_character("Hero").unwrap();
        assert!(!manager.character_exists("Hero"));
        assert!(matches!(
            manager.delete_character("Hero"),
            Err(GameError::CharacterNotFound(_))
        ));
    }
}

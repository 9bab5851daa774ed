use std::collections::btree_map::{BTreeMap, Values};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};

/// A quest definition. Characters only store quest ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward_xp: u32,
    pub reward_gold: u32,
    pub required_level: u32,
    /// Quest that must be completed before this one can be accepted.
    #[serde(default)]
    pub prerequisite: Option<String>,
}

/// Every quest the game offers, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCatalog {
    quests: BTreeMap<String, Quest>,
}

impl QuestCatalog {
    /// Builds a catalog, rejecting duplicate ids and dangling prerequisites.
    pub fn new(quests: Vec<Quest>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for quest in quests {
            if map.contains_key(&quest.id) {
                return Err(GameError::InvalidConfig(format!(
                    "duplicate quest id '{}'",
                    quest.id
                )));
            }
            map.insert(quest.id.clone(), quest);
        }

        let catalog = Self { quests: map };
        catalog.validate_prerequisites()?;
        Ok(catalog)
    }

    /// Parses a JSON array of quests.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn get(&self, quest_id: &str) -> Result<&Quest> {
        self.quests
            .get(quest_id)
            .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))
    }

    pub fn contains(&self, quest_id: &str) -> bool {
        self.quests.contains_key(quest_id)
    }

    pub fn iter(&self) -> Values<'_, String, Quest> {
        self.quests.values()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Quests whose required level lies in `min_level..=max_level`.
    pub fn quests_by_level(&self, min_level: u32, max_level: u32) -> Vec<&Quest> {
        self.iter()
            .filter(|q| (min_level..=max_level).contains(&q.required_level))
            .collect()
    }

    /// The prerequisite chain ending at `quest_id`, first quest first.
    pub fn prerequisite_chain(&self, quest_id: &str) -> Result<Vec<String>> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::new();
        let mut current = Some(quest_id.to_string());

        while let Some(id) = current {
            if !seen.insert(id.clone()) {
                return Err(GameError::InvalidConfig(format!(
                    "prerequisite cycle through '{}'",
                    id
                )));
            }
            current = self.get(&id)?.prerequisite.clone();
            chain.push(id);
        }

        chain.reverse();
        Ok(chain)
    }

    fn validate_prerequisites(&self) -> Result<()> {
        for quest in self.iter() {
            if let Some(prereq) = &quest.prerequisite {
                if !self.contains(prereq) {
                    return Err(GameError::QuestNotFound(format!(
                        "{} (prerequisite of '{}')",
                        prereq, quest.id
                    )));
                }
            }
            self.prerequisite_chain(&quest.id)?;
        }
        Ok(())
    }
}

fn quest(
    id: &str,
    title: &str,
    description: &str,
    reward: (u32, u32),
    required_level: u32,
    prerequisite: Option<&str>,
) -> Quest {
    Quest {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        reward_xp: reward.0,
        reward_gold: reward.1,
        required_level,
        prerequisite: prerequisite.map(str::to_string),
    }
}

impl Default for QuestCatalog {
    /// The built-in quest line.
    fn default() -> Self {
        let quests = [
            quest(
                "first_adventure",
                "First Adventure",
                "Complete your first quest.",
                (100, 50),
                1,
                None,
            ),
            quest(
                "lost_heirloom",
                "Lost Heirloom",
                "Find the ring a villager lost in the woods.",
                (50, 40),
                1,
                None,
            ),
            quest(
                "goblin_menace",
                "Goblin Menace",
                "Drive the goblins off the trade road.",
                (150, 75),
                2,
                Some("first_adventure"),
            ),
            quest(
                "orc_warband",
                "Orc Warband",
                "Break the orc warband camped in the hills.",
                (300, 150),
                4,
                Some("goblin_menace"),
            ),
            quest(
                "dragon_slayer",
                "Dragon Slayer",
                "Face the dragon in its mountain lair.",
                (1000, 500),
                6,
                Some("orc_warband"),
            ),
        ];

        Self {
            quests: quests.into_iter().map(|q| (q.id.clone(), q)).collect(),
        }
    }
}

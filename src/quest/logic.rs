//! Accepting, completing and abandoning quests.
//!
//! A character's quest state is two id lists: `active_quests` and
//! `completed_quests`. An id is in at most one of them.

use tracing::info;

use crate::character::{apply_battle_rewards, Character};
use crate::combat::Reward;
use crate::core::error::{GameError, Result};

use super::types::{Quest, QuestCatalog};

/// What completing a quest paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestCompletion {
    pub reward: Reward,
    pub levels_gained: u32,
}

/// Checks every acceptance rule in order: the quest exists, the level is
/// high enough, the prerequisite is done, and the quest is neither completed
/// nor already active.
fn check_can_accept<'q>(
    character: &Character,
    quest_id: &str,
    catalog: &'q QuestCatalog,
) -> Result<&'q Quest> {
    let quest = catalog.get(quest_id)?;

    if character.level < quest.required_level {
        return Err(GameError::InsufficientLevel {
            required: quest.required_level,
            current: character.level,
        });
    }

    if let Some(prereq) = &quest.prerequisite {
        if !is_quest_completed(character, prereq) {
            return Err(GameError::QuestRequirementsNotMet(format!(
                "prerequisite '{}' not completed",
                prereq
            )));
        }
    }

    if is_quest_completed(character, quest_id) {
        return Err(GameError::QuestAlreadyCompleted(quest_id.to_string()));
    }

    if is_quest_active(character, quest_id) {
        return Err(GameError::QuestRequirementsNotMet(format!(
            "'{}' is already active",
            quest_id
        )));
    }

    Ok(quest)
}

pub fn accept_quest(character: &mut Character, quest_id: &str, catalog: &QuestCatalog) -> Result<()> {
    check_can_accept(character, quest_id, catalog)?;
    character.active_quests.push(quest_id.to_string());
    info!(name = %character.name, quest = quest_id, "quest accepted");
    Ok(())
}

/// Same rules as `accept_quest`, without the error.
pub fn can_accept_quest(character: &Character, quest_id: &str, catalog: &QuestCatalog) -> bool {
    check_can_accept(character, quest_id, catalog).is_ok()
}

/// Completes an active quest and pays its reward through the progression
/// rules.
///
/// The reward is applied before the quest moves to the completed list, so a
/// failed payout (a dead character) leaves the quest active.
pub fn complete_quest(
    character: &mut Character,
    quest_id: &str,
    catalog: &QuestCatalog,
) -> Result<QuestCompletion> {
    let quest = catalog.get(quest_id)?;
    if !is_quest_active(character, quest_id) {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }

    let levels_gained = apply_battle_rewards(character, quest.reward_xp, quest.reward_gold)?;

    character.active_quests.retain(|id| id != quest_id);
    character.completed_quests.push(quest_id.to_string());
    info!(
        name = %character.name,
        quest = quest_id,
        xp = quest.reward_xp,
        gold = quest.reward_gold,
        "quest completed"
    );

    Ok(QuestCompletion {
        reward: Reward {
            xp: quest.reward_xp,
            gold: quest.reward_gold,
        },
        levels_gained,
    })
}

pub fn abandon_quest(character: &mut Character, quest_id: &str) -> Result<()> {
    if !is_quest_active(character, quest_id) {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }
    character.active_quests.retain(|id| id != quest_id);
    Ok(())
}

pub fn is_quest_active(character: &Character, quest_id: &str) -> bool {
    character.active_quests.iter().any(|id| id == quest_id)
}

pub fn is_quest_completed(character: &Character, quest_id: &str) -> bool {
    character.completed_quests.iter().any(|id| id == quest_id)
}

/// Active quests that exist in the catalog.
pub fn active_quests<'q>(character: &Character, catalog: &'q QuestCatalog) -> Vec<&'q Quest> {
    character
        .active_quests
        .iter()
        .filter_map(|id| catalog.get(id).ok())
        .collect()
}

/// Completed quests that exist in the catalog.
pub fn completed_quests<'q>(character: &Character, catalog: &'q QuestCatalog) -> Vec<&'q Quest> {
    character
        .completed_quests
        .iter()
        .filter_map(|id| catalog.get(id).ok())
        .collect()
}

pub fn available_quests<'q>(character: &Character, catalog: &'q QuestCatalog) -> Vec<&'q Quest> {
    catalog
        .iter()
        .filter(|q| can_accept_quest(character, &q.id, catalog))
        .collect()
}

/// Share of the catalog completed, 0-100.
pub fn completion_percentage(character: &Character, catalog: &QuestCatalog) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }
    let completed = completed_quests(character, catalog).len();
    completed as f64 / catalog.len() as f64 * 100.0
}

/// Sum of the rewards of every completed quest.
pub fn total_rewards_earned(character: &Character, catalog: &QuestCatalog) -> Reward {
    completed_quests(character, catalog)
        .into_iter()
        .fold(Reward::default(), |total, q| Reward {
            xp: total.xp.saturating_add(q.reward_xp),
            gold: total.gold.saturating_add(q.reward_gold),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;

    fn hero() -> Character {
        Character::new("Hero", CharacterClass::Warrior).unwrap()
    }

    #[test]
    fn test_accept_quest() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        accept_quest(&mut c, "first_adventure", &catalog).unwrap();
        assert!(is_quest_active(&c, "first_adventure"));
        assert_eq!(active_quests(&c, &catalog).len(), 1);
    }

    #[test]
    fn test_accept_unknown_quest() {
        let mut c = hero();
        assert!(matches!(
            accept_quest(&mut c, "missing", &QuestCatalog::default()),
            Err(GameError::QuestNotFound(_))
        ));
    }

    #[test]
    fn test_accept_requires_level() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        c.completed_quests.push("first_adventure".to_string());
        assert!(matches!(
            accept_quest(&mut c, "goblin_menace", &catalog),
            Err(GameError::InsufficientLevel {
                required: 2,
                current: 1
            })
        ));
        assert!(c.active_quests.is_empty());
    }

    #[test]
    fn test_accept_requires_prerequisite() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        c.level = 2;
        assert!(matches!(
            accept_quest(&mut c, "goblin_menace", &catalog),
            Err(GameError::QuestRequirementsNotMet(_))
        ));

        c.completed_quests.push("first_adventure".to_string());
        accept_quest(&mut c, "goblin_menace", &catalog).unwrap();
    }

    #[test]
    fn test_accept_twice_or_after_completion() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        accept_quest(&mut c, "lost_heirloom", &catalog).unwrap();
        assert!(matches!(
            accept_quest(&mut c, "lost_heirloom", &catalog),
            Err(GameError::QuestRequirementsNotMet(_))
        ));
        assert_eq!(c.active_quests.len(), 1);

        complete_quest(&mut c, "lost_heirloom", &catalog).unwrap();
        assert!(matches!(
            accept_quest(&mut c, "lost_heirloom", &catalog),
            Err(GameError::QuestAlreadyCompleted(_))
        ));
    }

    #[test]
    fn test_complete_pays_reward_once() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        c.health = 40;
        accept_quest(&mut c, "first_adventure", &catalog).unwrap();

        let done = complete_quest(&mut c, "first_adventure", &catalog).unwrap();
        assert_eq!(done.reward, Reward { xp: 100, gold: 50 });
        assert_eq!(done.levels_gained, 1);
        assert_eq!(c.level, 2);
        assert_eq!(c.health, c.max_health);
        assert_eq!(c.gold, 150);
        assert!(!is_quest_active(&c, "first_adventure"));
        assert!(is_quest_completed(&c, "first_adventure"));

        assert!(matches!(
            complete_quest(&mut c, "first_adventure", &catalog),
            Err(GameError::QuestNotActive(_))
        ));
        assert_eq!(c.gold, 150);
    }

    #[test]
    fn test_complete_when_dead_keeps_quest_active() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        accept_quest(&mut c, "first_adventure", &catalog).unwrap();
        c.health = 0;

        assert!(matches!(
            complete_quest(&mut c, "first_adventure", &catalog),
            Err(GameError::CharacterDead { .. })
        ));
        assert!(is_quest_active(&c, "first_adventure"));
        assert!(c.completed_quests.is_empty());
        assert_eq!(c.gold, 100);
    }

    #[test]
    fn test_abandon_quest() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        accept_quest(&mut c, "first_adventure", &catalog).unwrap();
        abandon_quest(&mut c, "first_adventure").unwrap();
        assert!(c.active_quests.is_empty());
        assert!(matches!(
            abandon_quest(&mut c, "first_adventure"),
            Err(GameError::QuestNotActive(_))
        ));
        assert!(can_accept_quest(&c, "first_adventure", &catalog));
    }

    #[test]
    fn test_available_quests() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        let ids: Vec<_> = available_quests(&c, &catalog)
            .into_iter()
            .map(|q| q.id.clone())
            .collect();
        assert_eq!(ids, vec!["first_adventure", "lost_heirloom"]);

        accept_quest(&mut c, "first_adventure", &catalog).unwrap();
        assert_eq!(available_quests(&c, &catalog).len(), 1);
    }

    #[test]
    fn test_progress_stats() {
        let catalog = QuestCatalog::default();
        let mut c = hero();
        assert_eq!(completion_percentage(&c, &catalog), 0.0);

        for id in ["first_adventure", "lost_heirloom"] {
            accept_quest(&mut c, id, &catalog).unwrap();
            complete_quest(&mut c, id, &catalog).unwrap();
        }
        assert_eq!(completion_percentage(&c, &catalog), 40.0);
        assert_eq!(
            total_rewards_earned(&c, &catalog),
            Reward { xp: 150, gold: 90 }
        );
        assert_eq!(completed_quests(&c, &catalog).len(), 2);
    }
}

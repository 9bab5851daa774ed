//! Quest Chronicles - turn-based RPG combat and progression engine.
//!
//! The battle state machine lives in `combat`, the experience/gold/revival
//! rules in `character`. A battle only reports its payout; callers apply it
//! once through `character::apply_battle_rewards` (or let `GameSession` do it).
//! Quests pay out through the same function; the shop spends through
//! `character::adjust_gold`.

pub mod build_info;
pub mod character;
pub mod combat;
pub mod core;
pub mod inventory;
pub mod quest;
pub mod session;
pub mod simulator;

pub use character::{Character, CharacterClass};
pub use combat::{resolve_battle, BattleOutcome, BattleResult, Enemy, EnemyKind};
pub use crate::core::{BattleConfig, GameError, Result};
pub use inventory::{Item, ItemCatalog};
pub use quest::{Quest, QuestCatalog};
pub use session::GameSession;

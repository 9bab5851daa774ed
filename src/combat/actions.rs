//! Player actions and the sources that pick them.

use std::collections::VecDeque;

use crate::character::Character;

use super::types::Enemy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    Special,
    /// Escape attempt. `forced` overrides the escape roll.
    Run { forced: Option<bool> },
}

impl PlayerAction {
    pub fn run() -> Self {
        PlayerAction::Run { forced: None }
    }

    pub fn forced_run(success: bool) -> Self {
        PlayerAction::Run {
            forced: Some(success),
        }
    }

    /// Parses `attack`, `special` or `run` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "attack" | "a" => Some(PlayerAction::Attack),
            "special" | "s" => Some(PlayerAction::Special),
            "run" | "r" => Some(PlayerAction::run()),
            _ => None,
        }
    }
}

/// Read-only snapshot handed to an `ActionSource` each turn.
#[derive(Debug, Clone, Copy)]
pub struct BattleView<'a> {
    pub character: &'a Character,
    pub enemy: &'a Enemy,
    pub turn: u32,
}

impl BattleView<'_> {
    pub fn special_ready(&self) -> bool {
        self.character.special_cooldown == 0
    }
}

/// Chooses the player's action for each turn.
pub trait ActionSource {
    fn choose_action(&mut self, view: &BattleView<'_>) -> PlayerAction;
}

impl<F> ActionSource for F
where
    F: FnMut(&BattleView<'_>) -> PlayerAction,
{
    fn choose_action(&mut self, view: &BattleView<'_>) -> PlayerAction {
        self(view)
    }
}

/// Attacks every turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAttack;

impl ActionSource for AlwaysAttack {
    fn choose_action(&mut self, _view: &BattleView<'_>) -> PlayerAction {
        PlayerAction::Attack
    }
}

/// Uses the special ability whenever it is off cooldown, attacks otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialWhenReady;

impl ActionSource for SpecialWhenReady {
    fn choose_action(&mut self, view: &BattleView<'_>) -> PlayerAction {
        if view.special_ready() {
            PlayerAction::Special
        } else {
            PlayerAction::Attack
        }
    }
}

/// Plays a fixed list of actions, then attacks once the list runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedActions {
    queue: VecDeque<PlayerAction>,
}

impl ScriptedActions {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ActionSource for ScriptedActions {
    fn choose_action(&mut self, _view: &BattleView<'_>) -> PlayerAction {
        self.queue.pop_front().unwrap_or(PlayerAction::Attack)
    }
}

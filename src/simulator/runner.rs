//! Simulation runner built on the real battle resolver.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::config::{ActionPolicy, SimConfig};
use super::report::{BattleStats, SimReport};
use crate::character::{gain_experience, Character, CharacterClass};
use crate::combat::{resolve_battle_with_config, AlwaysAttack, SpecialWhenReady};
use crate::core::constants::{MAX_SIM_LEVEL, XP_PER_LEVEL};
use crate::core::error::{GameError, Result};

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport> {
    if config.level > MAX_SIM_LEVEL {
        return Err(GameError::InvalidConfig(format!(
            "level {} is above the simulator limit of {}",
            config.level, MAX_SIM_LEVEL
        )));
    }

    let mut per_class = Vec::with_capacity(config.classes.len());

    for (class_idx, &class) in config.classes.iter().enumerate() {
        let mut runs = Vec::with_capacity(config.num_runs as usize);

        for run_idx in 0..config.num_runs {
            // Create RNG for this run
            let mut rng = match config.seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(
                    seed.wrapping_add(class_idx as u64 * config.num_runs as u64 + run_idx as u64),
                ),
                None => ChaCha8Rng::from_entropy(),
            };

            runs.push(simulate_single_battle(config, class, &mut rng)?);
        }

        debug!(class = %class, runs = runs.len(), "class simulated");
        per_class.push((class, runs));
    }

    Ok(SimReport::from_runs(config, per_class))
}

/// Builds a character at `level` by feeding it exactly the experience the
/// level-up rules require, one level's threshold at a time.
pub fn character_at_level(class: CharacterClass, level: u32) -> Result<Character> {
    let mut character = Character::new("Simulant", class)?;
    for current in 1..level.max(1) {
        gain_experience(&mut character, current.saturating_mul(XP_PER_LEVEL))?;
    }
    Ok(character)
}

fn simulate_single_battle(
    config: &SimConfig,
    class: CharacterClass,
    rng: &mut ChaCha8Rng,
) -> Result<BattleStats> {
    let mut character = character_at_level(class, config.level)?;
    let enemy = config.enemy.spawn();

    let result = match config.policy {
        ActionPolicy::Attack => resolve_battle_with_config(
            &mut character,
            enemy,
            &mut AlwaysAttack,
            rng,
            config.battle.clone(),
        )?,
        ActionPolicy::SpecialWhenReady => resolve_battle_with_config(
            &mut character,
            enemy,
            &mut SpecialWhenReady,
            rng,
            config.battle.clone(),
        )?,
    };

    Ok(BattleStats {
        outcome: result.outcome,
        rounds: result.rounds,
        health_left: character.health,
        max_health: character.max_health,
    })
}

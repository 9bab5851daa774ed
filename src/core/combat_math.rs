//! Pure combat math shared by the battle state machine and the simulator.

use rand::Rng;

use super::constants::{DEFENSE_DIVISOR, MIN_ATTACK_DAMAGE};

/// Damage of a basic attack.
///
/// `attacker_strength - defender_strength / 4`, never below 1 so even a
/// weak attacker always makes progress.
pub fn calculate_damage(attacker_strength: u32, defender_strength: u32) -> u32 {
    attacker_strength
        .saturating_sub(defender_strength / DEFENSE_DIVISOR)
        .max(MIN_ATTACK_DAMAGE)
}

/// Apply damage to HP, returning remaining HP (minimum 0).
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Heal without exceeding `max_hp`. Returns (new_hp, amount_healed).
pub fn apply_heal(current_hp: u32, max_hp: u32, amount: u32) -> (u32, u32) {
    let healed = amount.min(max_hp.saturating_sub(current_hp));
    (current_hp + healed, healed)
}

pub fn is_alive(current_hp: u32) -> bool {
    current_hp > 0
}

/// Roll a probability in 0.0-1.0.
pub fn roll_chance(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < chance
}

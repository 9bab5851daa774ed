//! Shared constants, configuration, errors and combat math.

pub mod combat_math;
pub mod config;
pub mod constants;
pub mod error;

pub use config::BattleConfig;
pub use constants::*;
pub use error::{GameError, Result};

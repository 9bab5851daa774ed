//! Battle balance simulator for Monte Carlo analysis.
//!
//! Runs many seeded battles per class against one enemy type to compare:
//! - Win, loss and escape rates
//! - Average battle length in rounds
//! - Health left over after a win
//!
//! Battles go through `resolve_battle_with_config`, so results match real
//! gameplay exactly.

mod config;
mod report;
mod runner;

pub use config::{ActionPolicy, SimConfig};
pub use report::{ClassReport, SimReport};
pub use runner::run_simulation;

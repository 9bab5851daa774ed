//! Enemy catalog, special abilities, and the battle state machine.

pub mod abilities;
pub mod actions;
pub mod logic;
pub mod types;

pub use abilities::*;
pub use actions::*;
pub use logic::*;
pub use types::*;

//! Character records, progression rules, and persistence.

pub mod manager;
pub mod progression;
pub mod types;

pub use manager::*;
pub use progression::*;
pub use types::*;

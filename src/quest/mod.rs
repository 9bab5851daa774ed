//! Quest catalog and the per-character quest ledger.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;

//! Item catalog, character inventory, equipment and the shop.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;

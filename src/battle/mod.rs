//! The battle facade and its construction.
//!
//! ## Key Types
//!
//! - `Battle`: inbound API for a presentation layer
//! - `BattleBuilder`: lays out a battle from a catalog, session and encounter
//! - `BattleSnapshot`: plain serde data for the persistence boundary

mod builder;
mod engine;
mod snapshot;

pub use builder::BattleBuilder;
pub use engine::Battle;
pub use snapshot::{BattleSnapshot, UnitSnapshot};

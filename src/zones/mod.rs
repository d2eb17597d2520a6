//! Card locations: the slot board and the player's piles.
//!
//! ## Key Types
//!
//! - `SlotBoard`: two 5-slot rows of units with adjacency
//! - `Piles`: bench, draw pile, hand and discard
//! - `Graveyard`: dead creatures, most recent first

pub mod piles;
pub mod slots;

pub use piles::{DrawOutcome, Graveyard, PileKind, Piles};
pub use slots::{SlotBoard, SLOT_COUNT};

//! Card effects and target selection.
//!
//! - `EffectKind`: closed set of effect variants
//! - `EffectResolver`: precondition checks and the handler table
//! - `Selection`: the player's pending target interaction
//!
//! ## Design Philosophy
//!
//! Effects are plain data on templates. Behavior lives in one exhaustive
//! `match`, so adding a variant is a compile error until every handler
//! covers it.

mod effect;
mod linear;
mod resolver;
mod targeting;

pub use effect::{EffectKind, Scope};
pub use resolver::EffectResolver;
pub use targeting::{
    accepts_hero, attack_targets, selectable_units, validate_attack, validate_target, Selection,
};

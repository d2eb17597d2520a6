//! Battle rules: stat derivation, overload and combat.
//!
//! ## Key Types
//!
//! - `stats`: the stat pipeline (`recompute`, `recompute_side`)
//! - `overload`: overload gain, decay and boosters
//! - `combat`: attacks, damage, healing, death and the commander cascade
//!
//! Every function here takes `&mut BattleState` and re-finds units by id,
//! so callers can chain them freely.

pub mod combat;
pub mod overload;
pub mod stats;

pub use combat::{
    apply_damage, damage_all, damage_hero, default_target, enforce_commander, heal_hero,
    heal_unit, resolve_attack, resolve_death, AttackMode, DamageReport, Target,
};
pub use overload::{modify_overload, set_overload};
pub use stats::{derive, recompute, recompute_side, recompute_unit, DerivedStats};

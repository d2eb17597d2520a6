//! Stat pipeline: derives a unit's attack and max health from its modifiers.
//!
//! ## Composition order
//!
//! 1. Base attack and base max health
//! 2. Per equipment: +1/+1 (+2/+2 while evolved) plus the equipment's own bonus.
//!    Battle shields only absorb and add no stats.
//! 3. Overload commanders: +2 attack while overloaded, or +2 per overload
//!    after limit operation
//! 4. +1 max health per adjacent health-aura unit
//! 5. Temporary, then permanent attack modifiers
//!
//! ## Health reconciliation
//!
//! When max health moves by Δ, current health moves by Δ too. Increases
//! clamp to `[1, max]`; decreases never take a living unit below 1. Current
//! health never exceeds max health afterwards.
//!
//! `recompute` is idempotent: with no intervening mutation a second call
//! changes nothing, since Δ is then zero.

use smallvec::SmallVec;

use crate::cards::UnitInstance;
use crate::core::{Side, UnitId};
use crate::zones::{SlotBoard, SLOT_COUNT};

/// Derived attributes of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivedStats {
    pub attack: i32,
    pub max_health: i32,
}

/// Compute derived attributes without touching the unit.
#[must_use]
pub fn derive(unit: &UnitInstance, aura_neighbors: i32) -> DerivedStats {
    let mut attack = unit.base_attack;
    let mut health = unit.base_max_health;

    let flat = if unit.is_evolved() { 2 } else { 1 };
    for piece in &unit.equipment {
        let spec = piece.template.equipment.unwrap_or_default();
        if spec.battle_shield {
            continue;
        }
        attack += flat + spec.attack_bonus;
        health += flat + spec.health_bonus;
    }

    if unit.is_overload_commander() {
        if unit.limit_operation {
            attack += 2 * unit.overload;
        } else if unit.overload > 0 {
            attack += 2;
        }
    }

    health += aura_neighbors;

    attack += unit.temporary_attack_modifier;
    attack += unit.permanent_attack_modifier;

    DerivedStats {
        attack: attack.max(0),
        max_health: health.max(1),
    }
}

/// Rewrite a unit's derived attributes and reconcile current health.
///
/// Dead units are left alone.
pub fn recompute(unit: &mut UnitInstance, aura_neighbors: i32) {
    if !unit.is_alive() {
        log::warn!("skipping stat recompute for dead unit {}", unit.name);
        return;
    }

    let derived = derive(unit, aura_neighbors);
    let delta = derived.max_health - unit.max_health;

    unit.current_attack = derived.attack;
    unit.max_health = derived.max_health;

    if delta > 0 {
        unit.current_health = (unit.current_health + delta).clamp(1, unit.max_health);
    } else if delta < 0 {
        unit.current_health = (unit.current_health + delta).max(1);
    }
    unit.current_health = unit.current_health.min(unit.max_health);
}

/// Recompute one unit in place on the board.
pub fn recompute_unit(board: &mut SlotBoard, id: UnitId) {
    let Some((side, slot)) = board.locate(id) else {
        return;
    };
    let aura = board.aura_neighbors(side, slot);
    if let Some(unit) = board.unit_mut(id) {
        recompute(unit, aura);
    }
}

/// Recompute every living unit on a side.
pub fn recompute_side(board: &mut SlotBoard, side: Side) {
    let plan: SmallVec<[(UnitId, i32); SLOT_COUNT]> = board
        .units(side)
        .filter(|u| u.is_alive())
        .map(|u| (u.id, board.aura_neighbors(side, u.slot)))
        .collect();

    for (id, aura) in plan {
        if let Some(unit) = board.unit_mut(id) {
            recompute(unit, aura);
        }
    }
}

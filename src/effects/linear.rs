//! Linear-algebra family effects.
//!
//! - **Swap**: exchange a unit with its neighbor (right first), +1 permanent
//!   attack each
//! - **Scalar double**: identity-matrix units and units next to a
//!   linear-algebra unit double their attack this turn and their current
//!   health up to max
//! - **Transpose**: every allied unit swaps attack and current health
//! - **Orthogonalize**: standard-basis units evolve permanently; if the basis
//!   rank reaches the commander threshold the side becomes immune to enemy
//!   effects until its next turn start

use smallvec::SmallVec;

use crate::cards::{Evolution, Family, Role, UnitInstance};
use crate::core::{BattleState, Side, UnitId};
use crate::rules::stats;
use crate::triggers::BattleEvent;
use crate::zones::SLOT_COUNT;

/// The unit `unit` would swap with: right neighbor first, then left.
#[must_use]
pub fn swap_partner(state: &BattleState, unit: &UnitInstance) -> Option<UnitId> {
    state
        .board
        .neighbor_slots(unit.slot)
        .into_iter()
        .rev()
        .find_map(|slot| state.board.at(unit.side, slot).filter(|u| u.is_alive()))
        .map(|u| u.id)
}

pub fn swap_adjacent(state: &mut BattleState, id: UnitId) {
    let Some(unit) = state.unit(id) else {
        return;
    };
    let Some(partner) = swap_partner(state, unit) else {
        return;
    };
    let side = unit.side;
    let slot = unit.slot;
    let Some(other_slot) = state.unit(partner).map(|u| u.slot) else {
        return;
    };

    state.board.swap(side, slot, other_slot);
    for moved in [id, partner] {
        if let Some(unit) = state.unit_mut(moved) {
            unit.permanent_attack_modifier += 1;
        }
    }
    stats::recompute_side(&mut state.board, side);
    let left = state.unit_name(id);
    let right = state.unit_name(partner);
    state.emit(BattleEvent::UnitsSwapped { left, right });
}

/// Units on `owner`'s side that scalar doubling applies to.
#[must_use]
pub fn scalar_candidates(state: &BattleState, owner: Side) -> SmallVec<[UnitId; SLOT_COUNT]> {
    state
        .board
        .units(owner)
        .filter(|u| u.is_alive())
        .filter(|u| {
            u.role() == Role::IdentityMatrix
                || state
                    .board
                    .neighbors(owner, u.slot)
                    .any(|n| n.is_alive() && n.family() == Family::LinearAlgebra)
        })
        .map(|u| u.id)
        .collect()
}

pub fn scalar_double(state: &mut BattleState, owner: Side) {
    for id in scalar_candidates(state, owner) {
        let Some(unit) = state.unit_mut(id) else {
            continue;
        };
        let gain = unit.current_attack;
        unit.temporary_attack_modifier += gain;
        unit.current_health = (unit.current_health * 2).min(unit.max_health);
        let name = unit.name.clone();
        stats::recompute_unit(&mut state.board, id);
        state.emit(BattleEvent::AttackModified { unit: name, amount: gain });
    }
}

/// Swap attack and current health on every allied unit.
///
/// The temporary modifier is folded into the permanent one first so the new
/// attack survives the next turn start.
pub fn transpose(state: &mut BattleState, owner: Side) {
    for id in state.board.unit_ids(owner) {
        let Some(unit) = state.unit_mut(id).filter(|u| u.is_alive()) else {
            continue;
        };
        let old_attack = unit.current_attack;
        let old_health = unit.current_health;

        unit.permanent_attack_modifier += unit.temporary_attack_modifier;
        unit.temporary_attack_modifier = 0;
        unit.permanent_attack_modifier += old_health - old_attack;

        let health_bonus = unit.max_health - unit.base_max_health;
        unit.base_max_health = (old_attack - health_bonus).max(1);

        stats::recompute_unit(&mut state.board, id);
        let Some(unit) = state.unit_mut(id) else {
            continue;
        };
        unit.current_health = old_attack.clamp(1, unit.max_health);
        let event = BattleEvent::StatsTransposed {
            unit: unit.name.clone(),
            attack: unit.current_attack,
            health: unit.current_health,
        };
        state.emit(event);
    }
}

pub fn orthogonalize(state: &mut BattleState, owner: Side) {
    let mut rank = 0;
    let mut threshold = 0;

    for id in state.board.unit_ids(owner) {
        let Some(unit) = state.unit_mut(id).filter(|u| u.is_alive()) else {
            continue;
        };
        if unit.role() == Role::StandardBasis {
            rank += 1;
            if !unit.is_evolved() {
                unit.evolution = Some(Evolution::Permanent);
                let name = unit.name.clone();
                stats::recompute_unit(&mut state.board, id);
                state.emit(BattleEvent::Evolved { unit: name });
            }
        }
        if let Some(unit) = state.unit(id) {
            if unit.is_commander() || unit.role() == Role::IdentityMatrix {
                threshold = unit.current_attack.min(unit.current_health);
            }
        }
    }

    state.emit(BattleEvent::RankComputed { rank, threshold });
    if threshold > 0 && rank as i32 >= threshold && !state.immunity[owner] {
        state.immunity[owner] = true;
        state.emit(BattleEvent::ImmunityGranted { side: owner });
    }
}

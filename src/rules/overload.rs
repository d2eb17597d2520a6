//! Overload counters.
//!
//! Overload stacks on a unit, powers the overload commander's attack bonus and
//! decays by one at each owner turn start. Living overload boosters on the
//! same side add +1 each to every positive gain.

use super::stats;
use crate::cards::Role;
use crate::core::{BattleState, UnitId};
use crate::triggers::BattleEvent;

/// Number of living boosters on the unit's side.
#[must_use]
pub fn booster_count(state: &BattleState, id: UnitId) -> i32 {
    let Some(side) = state.unit(id).map(|u| u.side) else {
        return 0;
    };
    state
        .board
        .units(side)
        .filter(|u| u.is_alive() && u.role() == Role::OverloadBooster)
        .count() as i32
}

/// Change a unit's overload and rerun the stat pipeline.
///
/// Positive changes gain the booster bonus; the counter never drops below 0.
/// Returns the new overload, or `None` when the unit is gone.
pub fn modify_overload(state: &mut BattleState, id: UnitId, delta: i32) -> Option<i32> {
    if delta == 0 {
        return state.unit(id).map(|u| u.overload);
    }
    let bonus = if delta > 0 { booster_count(state, id) } else { 0 };
    let unit = state.unit_mut(id).filter(|u| u.is_alive())?;
    unit.overload = (unit.overload + delta + bonus).max(0);
    let overload = unit.overload;
    let name = unit.name.clone();

    stats::recompute_unit(&mut state.board, id);
    state.emit(BattleEvent::OverloadChanged { unit: name, overload });
    Some(overload)
}

/// Set a unit's overload to an exact value. Boosters do not apply.
pub fn set_overload(state: &mut BattleState, id: UnitId, overload: i32) -> Option<i32> {
    let unit = state.unit_mut(id).filter(|u| u.is_alive())?;
    unit.overload = overload.max(0);
    let overload = unit.overload;
    let name = unit.name.clone();

    stats::recompute_unit(&mut state.board, id);
    state.emit(BattleEvent::OverloadChanged { unit: name, overload });
    Some(overload)
}

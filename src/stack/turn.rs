//! Turn sequencing.
//!
//! ## Phases
//!
//! ```text
//! PlayerTurnStart -> PlayerAction -> PlayerTurnEnd -> EnemyTurnRunning
//!        ^                                                  |
//!        +------------------ EnemyTurnEnd <-----------------+
//! ```
//!
//! `Finished` is terminal. The opener is chosen by coin flip unless the
//! config pins it; the opening turn skips its draw and cannot attack.
//!
//! ## Turn start maintenance
//!
//! For the side whose turn begins, in order:
//! 1. Its effect immunity expires and hero attack bonuses clear
//! 2. Per unit: clear temporary modifiers, tick evolutions, promote queued
//!    fatigue, re-arm attacks, reset the rotation hit counter
//! 3. The player draws (not on the opening turn), plus relic extra draws
//! 4. Overload decays by one; reaching 0 queues fatigue for the next turn
//! 5. Queued overload self-damage lands
//! 6. Units that need a commander die if none stands

use serde::{Deserialize, Serialize};

use super::enemy::EnemyTurn;
use crate::cards::Evolution;
use crate::core::{BattleState, Side, UnitId};
use crate::effects::Selection;
use crate::rules::{self, stats};
use crate::triggers::BattleEvent;

/// Where the battle is in the turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    PlayerTurnStart,
    PlayerAction,
    PlayerTurnEnd,
    EnemyTurnRunning,
    EnemyTurnEnd,
    Finished,
}

impl Phase {
    #[must_use]
    pub fn is_player_action(self) -> bool {
        self == Phase::PlayerAction
    }
}

/// Drives turn transitions.
pub struct TurnController;

impl TurnController {
    /// Pick the opener and start its opening turn.
    pub fn start_battle(state: &mut BattleState) -> Side {
        let opener = match state.config.opener {
            Some(side) => side,
            None if state.rng.coin_flip() => Side::Ally,
            None => Side::Enemy,
        };
        state.emit(BattleEvent::BattleStarted { opener });
        let opening = state.config.opening_hand;
        state.draw_cards(opening);
        Self::begin_turn(state, opener, true);
        opener
    }

    /// Start `side`'s turn.
    pub fn begin_turn(state: &mut BattleState, side: Side, opening: bool) {
        if state.is_over() {
            return;
        }
        state.turn.number += 1;
        state.turn.active = side;
        state.turn.attacks_allowed = !opening;
        state.turn.summons = 0;
        state.turn.evolutions = 0;
        state.turn.phase = match side {
            Side::Ally => Phase::PlayerTurnStart,
            Side::Enemy => Phase::EnemyTurnRunning,
        };
        let turn = state.turn.number;
        state.emit(BattleEvent::TurnStarted { side, turn });

        if state.immunity[side] {
            state.immunity[side] = false;
            state.emit(BattleEvent::ImmunityExpired { side });
        }
        state.heroes[side].temporary_attack = 0;

        let ids = state.board.unit_ids(side);
        for &id in &ids {
            Self::refresh_unit(state, id);
        }
        stats::recompute_side(&mut state.board, side);

        if side == Side::Ally && !opening {
            let draws = state.config.draws_per_turn + state.session.extra_draws();
            state.draw_cards(draws);
        }

        for &id in &ids {
            Self::decay_overload(state, id);
        }
        for &id in &ids {
            Self::apply_self_damage(state, id);
        }
        rules::enforce_commander(state, side);

        if state.is_over() {
            return;
        }
        match side {
            Side::Ally => state.turn.phase = Phase::PlayerAction,
            Side::Enemy => state.enemy_turn = Some(EnemyTurn::plan(state)),
        }
    }

    fn refresh_unit(state: &mut BattleState, id: UnitId) {
        let attacks_allowed = state.turn.attacks_allowed;
        let Some(unit) = state.unit_mut(id).filter(|u| u.is_alive()) else {
            return;
        };
        unit.temporary_attack_modifier = 0;
        unit.hits_this_rotation = 0;

        let mut expired = false;
        if let Some(Evolution::Timed(turns)) = unit.evolution {
            if turns <= 1 {
                unit.evolution = None;
                expired = true;
            } else {
                unit.evolution = Some(Evolution::Timed(turns - 1));
            }
        }

        unit.fatigued = std::mem::take(&mut unit.fatigue_pending);
        unit.can_attack = attacks_allowed && !unit.fatigued;
        let fatigued = unit.fatigued;
        let name = unit.name.clone();

        if expired {
            state.emit(BattleEvent::EvolutionExpired { unit: name.clone() });
        }
        if fatigued {
            state.emit(BattleEvent::Fatigued { unit: name });
        }
    }

    fn decay_overload(state: &mut BattleState, id: UnitId) {
        let has_overload = state.unit(id).is_some_and(|u| u.is_alive() && u.overload > 0);
        if !has_overload {
            return;
        }
        if rules::modify_overload(state, id, -1) == Some(0) {
            if let Some(unit) = state.unit_mut(id) {
                unit.fatigue_pending = true;
            }
        }
    }

    fn apply_self_damage(state: &mut BattleState, id: UnitId) {
        let Some(unit) = state.unit_mut(id).filter(|u| u.is_alive()) else {
            return;
        };
        let amount = std::mem::take(&mut unit.pending_self_damage);
        if amount > 0 {
            rules::apply_damage(state, id, amount, None);
        }
    }

    /// Close the player's turn: relic healing, disarm units, clear selection.
    pub fn end_player_turn(state: &mut BattleState) {
        state.turn.phase = Phase::PlayerTurnEnd;
        state.selection = Selection::Idle;

        let heal = state.session.end_turn_heal();
        if heal > 0 {
            let damaged: Vec<UnitId> = state
                .board
                .units(Side::Ally)
                .filter(|u| u.is_alive() && u.is_damaged())
                .map(|u| u.id)
                .collect();
            for id in damaged {
                rules::heal_unit(state, id, heal);
            }
        }
        for unit in state.board.units_mut(Side::Ally) {
            unit.can_attack = false;
        }
        state.emit(BattleEvent::TurnEnded { side: Side::Ally });
        Self::begin_turn(state, Side::Enemy, false);
    }

    /// Close the enemy's turn and hand control back to the player.
    pub fn end_enemy_turn(state: &mut BattleState) {
        if state.is_over() {
            return;
        }
        state.turn.phase = Phase::EnemyTurnEnd;
        state.enemy_turn = None;
        for unit in state.board.units_mut(Side::Enemy) {
            unit.can_attack = false;
        }
        state.emit(BattleEvent::TurnEnded { side: Side::Enemy });
        Self::begin_turn(state, Side::Ally, false);
    }
}

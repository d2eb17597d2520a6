//! The `Battle` facade: the inbound API a presentation layer drives.
//!
//! Every entry point checks its gates first and returns an [`ActionError`]
//! without touching state when one fails. Failures are also logged as a
//! `Rejected` event so a renderer can show them.
//!
//! After every call the new events are flushed to the attached
//! [`Presenter`], followed by one `on_state_changed`.

use super::snapshot::BattleSnapshot;
use crate::cards::{CardKind, RuntimeCard};
use crate::core::{
    ActionError, BattleState, CardUid, Outcome, PreconditionError, SessionContext, Side, UnitId,
};
use crate::effects::{validate_attack, validate_target, EffectResolver, Selection};
use crate::rules::{self, AttackMode, Target};
use crate::stack::{self, Phase, StepStatus, TurnController};
use crate::triggers::{BattleEvent, EventLog, Presenter};

/// One battle between the player and an encounter.
pub struct Battle {
    state: BattleState,
    presenter: Option<Box<dyn Presenter>>,
    /// Events before this index have been delivered.
    cursor: usize,
    announced: bool,
}

impl Battle {
    /// Wrap a prepared state. Setup events are delivered immediately.
    pub fn from_state(state: BattleState, presenter: Option<Box<dyn Presenter>>) -> Self {
        let mut battle = Self {
            state,
            presenter,
            cursor: 0,
            announced: false,
        };
        battle.flush();
        battle
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.state.events
    }

    /// Plain-data view of the battle for persistence.
    #[must_use]
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::capture(&self.state)
    }

    /// End the battle and hand the session back with the player's health.
    #[must_use]
    pub fn into_session(self) -> SessionContext {
        let mut session = self.state.session;
        session.player_health = self.state.heroes[Side::Ally].health.max(0);
        session
    }

    // === Inbound ===

    /// Play a card from hand or bench.
    ///
    /// Playing the card that is already waiting for a target cancels it.
    /// Playing a different card cancels any pending selection first.
    pub fn play_card(&mut self, uid: CardUid) -> Result<(), ActionError> {
        self.dispatch(|state| play_card(state, uid))
    }

    /// Click the unit in `slot` on `side`.
    pub fn click_unit(&mut self, slot: usize, side: Side) -> Result<(), ActionError> {
        self.dispatch(|state| click_unit(state, slot, side))
    }

    /// Click a hero portrait.
    pub fn click_hero(&mut self, side: Side) -> Result<(), ActionError> {
        self.dispatch(|state| click_target(state, Target::Hero(side)))
    }

    /// Pick the graveyard card a pending revive brings back.
    pub fn confirm_graveyard_selection(&mut self, uid: CardUid) -> Result<(), ActionError> {
        self.dispatch(|state| confirm_graveyard(state, uid))
    }

    /// Drop any pending selection. Never fails outside a finished battle.
    pub fn cancel(&mut self) -> Result<(), ActionError> {
        self.dispatch(|state| {
            ensure_running(state)?;
            cancel_selection(state);
            Ok(())
        })
    }

    /// End the player's turn and start the enemy turn.
    pub fn end_turn(&mut self) -> Result<(), ActionError> {
        self.dispatch(|state| {
            ensure_player_action(state)?;
            cancel_selection(state);
            TurnController::end_player_turn(state);
            Ok(())
        })
    }

    /// Run exactly one enemy step.
    pub fn step_enemy(&mut self) -> Result<StepStatus, ActionError> {
        self.dispatch(|state| {
            ensure_running(state)?;
            if state.turn.phase != Phase::EnemyTurnRunning {
                return Err(ActionError::WrongPhase(state.turn.phase));
            }
            Ok(stack::advance(state))
        })
    }

    /// Step the enemy until its turn is complete. Returns the steps taken.
    pub fn run_enemy_turn(&mut self) -> Result<usize, ActionError> {
        let mut steps = 0;
        loop {
            steps += 1;
            if self.step_enemy()? == StepStatus::Complete {
                return Ok(steps);
            }
        }
    }

    // === Internals ===

    fn dispatch<T>(
        &mut self,
        action: impl FnOnce(&mut BattleState) -> Result<T, ActionError>,
    ) -> Result<T, ActionError> {
        let result = action(&mut self.state);
        if let Err(err) = &result {
            self.state.emit(BattleEvent::Rejected { reason: err.to_string() });
        }
        self.flush();
        result
    }

    fn flush(&mut self) {
        let Some(presenter) = self.presenter.as_mut() else {
            let pending = self.state.events.len() - self.cursor;
            if pending > 0 {
                log::debug!("no presenter attached, {pending} events not delivered");
            }
            self.cursor = self.state.events.len();
            return;
        };

        for event in self.state.events.since(self.cursor) {
            presenter.on_event(event);
        }
        self.cursor = self.state.events.len();
        presenter.on_state_changed(&self.state);

        if self.announced {
            return;
        }
        if let Some(outcome) = self.state.outcome {
            self.announced = true;
            match outcome {
                Outcome::Victory => presenter.on_victory(),
                Outcome::Defeat => presenter.on_defeat(),
            }
        }
    }
}

fn ensure_running(state: &BattleState) -> Result<(), ActionError> {
    if state.is_over() {
        Err(ActionError::BattleOver)
    } else {
        Ok(())
    }
}

fn ensure_player_action(state: &BattleState) -> Result<(), ActionError> {
    ensure_running(state)?;
    if state.turn.phase.is_player_action() {
        Ok(())
    } else {
        Err(ActionError::WrongPhase(state.turn.phase))
    }
}

fn cancel_selection(state: &mut BattleState) {
    if state.selection.is_idle() {
        return;
    }
    let previous = std::mem::take(&mut state.selection);
    if let Some(uid) = previous.pending_card() {
        let card = state
            .piles
            .find_playable(uid)
            .map_or_else(|| uid.to_string(), |(_, c)| c.name().to_string());
        state.emit(BattleEvent::SelectionCancelled { card });
    }
}

fn play_card(state: &mut BattleState, uid: CardUid) -> Result<(), ActionError> {
    ensure_player_action(state)?;
    if state.selection.pending_card() == Some(uid) {
        cancel_selection(state);
        return Ok(());
    }
    let card = state
        .piles
        .find_playable(uid)
        .map(|(_, card)| card.clone())
        .ok_or(ActionError::CardNotFound(uid))?;
    cancel_selection(state);
    if card.template.is_creature() {
        return summon(state, card);
    }

    let template = &card.template;
    if template.kind == CardKind::Evolution
        && state.turn.evolutions >= state.config.evolutions_per_turn
    {
        return Err(ActionError::EvolutionLimit);
    }
    if template.is_color_gated() && !state.has_color(Side::Ally, template.color) {
        return Err(ActionError::ColorGated(template.color));
    }

    if template.effect.is_some_and(|kind| kind.picks_from_graveyard()) {
        EffectResolver::check_condition(state, &card, Side::Ally, None)?;
        state.selection = Selection::AwaitingGraveyard { card: uid };
        state.emit(BattleEvent::GraveyardSelectionRequested { card: card.name().to_string() });
        return Ok(());
    }

    if template.target.needs_target() {
        state.selection = Selection::AwaitingTarget { card: uid };
        state.emit(BattleEvent::TargetRequested {
            card: card.name().to_string(),
            requirement: template.target,
        });
        return Ok(());
    }

    if template.is_equipment() {
        let holder = state
            .board
            .units(Side::Ally)
            .find(|u| u.is_alive())
            .map(|u| u.id)
            .ok_or(PreconditionError::NothingToEquip)?;
        return equip(state, uid, holder);
    }

    EffectResolver::check_condition(state, &card, Side::Ally, None)?;
    resolve(state, uid, None);
    Ok(())
}

fn summon(state: &mut BattleState, card: RuntimeCard) -> Result<(), ActionError> {
    if state.turn.summons >= state.config.summons_per_turn {
        return Err(ActionError::SummonLimit);
    }
    if state.board.is_full(Side::Ally) {
        return Err(ActionError::BoardFull(Side::Ally));
    }
    let card = state.piles.take(card.uid).ok_or(ActionError::CardNotFound(card.uid))?;
    state.emit(BattleEvent::CardPlayed { side: Side::Ally, card: card.name().to_string() });
    match EffectResolver::summon(state, Side::Ally, card, false) {
        Ok(_) => {
            state.turn.summons += 1;
            Ok(())
        }
        Err(card) => {
            state.piles.bench.push(card);
            Err(ActionError::BoardFull(Side::Ally))
        }
    }
}

fn equip(state: &mut BattleState, uid: CardUid, holder: UnitId) -> Result<(), ActionError> {
    let card = state.piles.take(uid).ok_or(ActionError::CardNotFound(uid))?;
    state.emit(BattleEvent::CardPlayed { side: Side::Ally, card: card.name().to_string() });
    if let Err(card) = EffectResolver::equip(state, card, holder) {
        state.piles.hand.push(card);
        return Err(PreconditionError::NothingToEquip.into());
    }
    Ok(())
}

/// Take a checked card out of hand, run it and discard it.
fn resolve(state: &mut BattleState, uid: CardUid, target: Option<Target>) {
    let Some(card) = state.piles.take(uid) else {
        return;
    };
    state.emit(BattleEvent::CardPlayed { side: Side::Ally, card: card.name().to_string() });
    if card.template.kind == CardKind::Evolution {
        state.turn.evolutions += 1;
    }
    EffectResolver::execute(state, &card, Side::Ally, target);
    state.piles.discard(card);
}

fn click_unit(state: &mut BattleState, slot: usize, side: Side) -> Result<(), ActionError> {
    ensure_player_action(state)?;
    let unit = state
        .board
        .at(side, slot)
        .filter(|u| u.is_alive())
        .ok_or(ActionError::EmptySlot { side, slot })?;
    let id = unit.id;

    match state.selection {
        Selection::SelectedAttacker { unit } if unit == id => {
            state.selection = Selection::Idle;
            Ok(())
        }
        Selection::Idle | Selection::SelectedAttacker { .. } if side == Side::Ally => {
            select_attacker(state, id)
        }
        _ => click_target(state, Target::Unit(id)),
    }
}

fn select_attacker(state: &mut BattleState, id: UnitId) -> Result<(), ActionError> {
    let Some(unit) = state.unit(id) else {
        return Err(ActionError::NoAttackerSelected);
    };
    if !unit.can_attack || !state.turn.attacks_allowed {
        return Err(ActionError::AttackerExhausted(unit.name.clone()));
    }
    let name = unit.name.clone();
    state.selection = Selection::SelectedAttacker { unit: id };
    state.emit(BattleEvent::AttackerSelected { unit: name });
    Ok(())
}

fn click_target(state: &mut BattleState, target: Target) -> Result<(), ActionError> {
    ensure_player_action(state)?;
    match state.selection {
        Selection::Idle => Err(ActionError::NoAttackerSelected),
        Selection::AwaitingGraveyard { .. } => Err(ActionError::GraveyardSelectionPending),
        Selection::SelectedAttacker { unit } => {
            validate_attack(state, Side::Ally, target)?;
            state.selection = Selection::Idle;
            rules::resolve_attack(state, unit, target, AttackMode::Standard)?;
            Ok(())
        }
        Selection::AwaitingTarget { card } => resolve_targeted(state, card, target),
    }
}

fn resolve_targeted(state: &mut BattleState, uid: CardUid, target: Target) -> Result<(), ActionError> {
    let Some(card) = state.piles.find_playable(uid).map(|(_, c)| c.clone()) else {
        state.selection = Selection::Idle;
        return Err(ActionError::CardNotFound(uid));
    };
    // A click in the wrong category keeps the card waiting.
    validate_target(state, &card.template, Side::Ally, target)?;
    state.selection = Selection::Idle;

    if card.template.is_equipment() {
        return match target {
            Target::Unit(holder) => equip(state, uid, holder),
            Target::Hero(_) => Err(PreconditionError::NothingToEquip.into()),
        };
    }
    EffectResolver::check_condition(state, &card, Side::Ally, Some(target))?;
    resolve(state, uid, Some(target));
    Ok(())
}

fn confirm_graveyard(state: &mut BattleState, uid: CardUid) -> Result<(), ActionError> {
    ensure_player_action(state)?;
    let Selection::AwaitingGraveyard { card } = state.selection else {
        return Err(ActionError::NoGraveyardSelection);
    };
    if !state.graveyards[Side::Ally].contains(uid) {
        return Err(ActionError::NotInGraveyard(uid));
    }
    if state.board.is_full(Side::Ally) {
        state.selection = Selection::Idle;
        return Err(PreconditionError::NoRoomToRevive.into());
    }
    let Some(revive) = state.piles.take(card) else {
        state.selection = Selection::Idle;
        return Err(ActionError::CardNotFound(card));
    };

    state.selection = Selection::Idle;
    state.emit(BattleEvent::CardPlayed { side: Side::Ally, card: revive.name().to_string() });
    if revive.template.kind == CardKind::Evolution {
        state.turn.evolutions += 1;
    }
    state.piles.discard(revive);
    EffectResolver::revive_card(state, Side::Ally, uid);
    Ok(())
}

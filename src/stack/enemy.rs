//! Enemy turn as a pull-based step sequence.
//!
//! When the enemy turn begins, an [`EnemyTurn`] plans two steps per actor:
//! enemy units left to right, then the enemy hero. Each actor plays one card
//! from its private move deck, then attacks. The presentation layer pulls
//! one step at a time, so it can animate between steps.
//!
//! The plan is fixed at turn start. A step whose actor has died since then
//! is still consumed but does nothing.
//!
//! ## Targeting
//!
//! Attacks and hostile moves aim at the first player taunt unit, else the
//! front player unit, else the player hero. Supportive moves target the
//! acting unit, or the front enemy unit when the hero acts.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::turn::TurnController;
use crate::cards::{CardTemplate, TargetRequirement};
use crate::core::{BattleState, GameRng, MoveOrder, Side, TemplateId, UnitId};
use crate::effects::{EffectKind, EffectResolver};
use crate::rules::{self, AttackMode, Target};
use crate::triggers::BattleEvent;

/// Who acts in an enemy step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyActor {
    Unit(UnitId),
    Hero,
}

/// A private, endlessly cycling list of enemy moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDeck {
    moves: Vec<TemplateId>,
    cursor: usize,
}

impl MoveDeck {
    #[must_use]
    pub fn new(moves: Vec<TemplateId>) -> Self {
        Self { moves, cursor: 0 }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn moves(&self) -> &[TemplateId] {
        &self.moves
    }

    /// The next move to play.
    pub fn next_move(&mut self, order: MoveOrder, rng: &mut GameRng) -> Option<TemplateId> {
        match order {
            MoveOrder::Sequential => {
                if self.moves.is_empty() {
                    return None;
                }
                let id = self.moves[self.cursor];
                self.cursor = (self.cursor + 1) % self.moves.len();
                Some(id)
            }
            MoveOrder::Random => {
                let index = rng.gen_index(self.moves.len())?;
                self.moves.get(index).copied()
            }
        }
    }
}

/// What an actor does in one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    PlayCard,
    Attack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyStep {
    pub actor: EnemyActor,
    pub kind: StepKind,
}

/// Result of pulling one enemy step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// More steps remain in this enemy turn.
    Continue,
    /// The enemy turn is over (or the battle ended).
    Complete,
}

/// Remaining steps of the current enemy turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTurn {
    steps: VecDeque<EnemyStep>,
}

impl EnemyTurn {
    /// Plan the turn from the current board.
    #[must_use]
    pub fn plan(state: &BattleState) -> Self {
        let actors = state
            .board
            .units(Side::Enemy)
            .filter(|u| u.is_alive())
            .map(|u| EnemyActor::Unit(u.id))
            .chain(std::iter::once(EnemyActor::Hero));

        let steps = actors
            .flat_map(|actor| {
                [
                    EnemyStep { actor, kind: StepKind::PlayCard },
                    EnemyStep { actor, kind: StepKind::Attack },
                ]
            })
            .collect();
        Self { steps }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&EnemyStep> {
        self.steps.front()
    }

    pub fn pop(&mut self) -> Option<EnemyStep> {
        self.steps.pop_front()
    }
}

/// Run exactly one pending enemy step.
///
/// The last step closes the enemy turn and starts the player's turn.
pub fn advance(state: &mut BattleState) -> StepStatus {
    let step = state.enemy_turn.as_mut().and_then(EnemyTurn::pop);
    if let Some(step) = step {
        run_step(state, step);
    }
    if state.is_over() {
        return StepStatus::Complete;
    }
    if state.enemy_turn.as_ref().and_then(EnemyTurn::peek).is_none() {
        TurnController::end_enemy_turn(state);
        StepStatus::Complete
    } else {
        StepStatus::Continue
    }
}

/// Execute one step.
pub fn run_step(state: &mut BattleState, step: EnemyStep) {
    if !actor_alive(state, step.actor) {
        log::debug!("enemy step {:?} skipped, actor is gone", step);
        return;
    }
    match step.kind {
        StepKind::PlayCard => play_move(state, step.actor),
        StepKind::Attack => attack(state, step.actor),
    }
}

fn actor_alive(state: &BattleState, actor: EnemyActor) -> bool {
    match actor {
        EnemyActor::Unit(id) => state.unit(id).is_some_and(|u| u.is_alive()),
        EnemyActor::Hero => !state.heroes[Side::Enemy].is_defeated(),
    }
}

fn actor_name(state: &BattleState, actor: EnemyActor) -> String {
    match actor {
        EnemyActor::Unit(id) => state.unit_name(id),
        EnemyActor::Hero => state.heroes[Side::Enemy].name.clone(),
    }
}

fn play_move(state: &mut BattleState, actor: EnemyActor) {
    let order = state.config.move_order;
    let next = match state.enemy_decks.get_mut(&actor) {
        Some(deck) => deck.next_move(order, &mut state.rng),
        None => None,
    };
    let Some(template) = next else {
        log::debug!("{} has no move to play", actor_name(state, actor));
        return;
    };
    let card = match state.catalog.instantiate(template, &mut state.ids) {
        Ok(card) => card,
        Err(err) => {
            log::warn!("enemy move skipped: {err}");
            return;
        }
    };

    state.emit(BattleEvent::EnemyMove {
        actor: actor_name(state, actor),
        card: card.name().to_string(),
    });

    if card.template.is_creature() {
        if let Err(card) = EffectResolver::summon(state, Side::Enemy, card, false) {
            log::debug!("no room for {}", card.name());
        }
        return;
    }
    if card.template.is_equipment() {
        let holder = match actor {
            EnemyActor::Unit(id) => Some(id),
            EnemyActor::Hero => state.board.front(Side::Enemy).map(|u| u.id),
        };
        let Some(id) = holder else {
            log::debug!("{} is lost, no enemy unit can hold it", card.name());
            return;
        };
        if let Err(card) = EffectResolver::equip(state, card, id) {
            log::debug!("{} is lost, its holder is gone", card.name());
        }
        return;
    }
    if let Some(kind) = card.template.effect {
        let target = move_target(state, actor, &card.template, kind);
        EffectResolver::trigger(state, kind, &card, Side::Enemy, target);
    }
}

fn move_target(
    state: &BattleState,
    actor: EnemyActor,
    template: &CardTemplate,
    kind: EffectKind,
) -> Option<Target> {
    let acting = match actor {
        EnemyActor::Unit(id) => Target::Unit(id),
        EnemyActor::Hero => Target::Hero(Side::Enemy),
    };
    match template.target {
        TargetRequirement::None if kind == EffectKind::AttackBuff => Some(acting),
        TargetRequirement::None => None,
        TargetRequirement::Enemy | TargetRequirement::Any => {
            match rules::default_target(state, Side::Enemy) {
                Target::Hero(side) if kind != EffectKind::DamageTarget => {
                    log::debug!("no unit for {kind} against the {side} side");
                    None
                }
                target => Some(target),
            }
        }
        TargetRequirement::Ally => match actor {
            EnemyActor::Unit(id) => Some(Target::Unit(id)),
            EnemyActor::Hero => state.board.front(Side::Enemy).map(|u| Target::Unit(u.id)),
        },
    }
}

fn attack(state: &mut BattleState, actor: EnemyActor) {
    if !state.turn.attacks_allowed {
        log::debug!("{} holds back on the opening turn", actor_name(state, actor));
        return;
    }
    let target = rules::default_target(state, Side::Enemy);
    match actor {
        EnemyActor::Unit(id) => {
            if let Err(err) = rules::resolve_attack(state, id, target, AttackMode::Standard) {
                log::debug!("enemy attack skipped: {err}");
            }
        }
        EnemyActor::Hero => {
            let damage = state.heroes[Side::Enemy].effective_attack();
            if damage <= 0 {
                return;
            }
            let attacker = state.heroes[Side::Enemy].name.clone();
            let target_name = match target {
                Target::Unit(id) => state.unit_name(id),
                Target::Hero(side) => state.heroes[side].name.clone(),
            };
            state.emit(BattleEvent::Attacked { attacker, target: target_name, damage });
            match target {
                Target::Unit(id) => {
                    rules::apply_damage(state, id, damage, None);
                }
                Target::Hero(side) => rules::damage_hero(state, side, damage),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{CardCatalog, EquipmentSpec, RuntimeCard, UnitInstance};
    use crate::core::{BattleConfig, Hero, Outcome, SessionContext};
    use crate::rules::stats;
    use crate::stack::Phase;

    fn catalog() -> CardCatalog {
        CardCatalog::new()
            .with(CardTemplate::spell(TemplateId::new(10), "Fireball", EffectKind::DamageOpposingHero).with_value(3))
            .and_then(|c| c.with(CardTemplate::spell(TemplateId::new(11), "Rage", EffectKind::AttackBuff).with_value(2)))
            .and_then(|c| c.with(CardTemplate::creature(TemplateId::new(12), "Whelp", 1, 1)))
            .and_then(|c| {
                let spec = EquipmentSpec { attack_bonus: 2, ..EquipmentSpec::default() };
                c.with(CardTemplate::equipment(TemplateId::new(13), "Spikes", spec))
            })
            .unwrap()
    }

    fn state() -> BattleState {
        let mut state = BattleState::new(
            BattleConfig::new(7),
            SessionContext::new(20),
            Hero::new("Boss", 30, 30).with_attack(4),
        )
        .with_catalog(catalog());
        state.turn.attacks_allowed = true;
        state
    }

    fn place(state: &mut BattleState, side: Side, slot: usize, template: CardTemplate) -> UnitId {
        let card = RuntimeCard::new(state.ids.card(), Arc::new(template));
        let id = state.ids.unit();
        let mut unit = UnitInstance::from_card(id, side, slot, card);
        unit.can_attack = true;
        state.board.place(unit).unwrap();
        stats::recompute_side(&mut state.board, side);
        id
    }

    #[test]
    fn test_sequential_move_deck_cycles() {
        let mut rng = GameRng::new(1);
        let mut deck = MoveDeck::new(vec![TemplateId::new(1), TemplateId::new(2)]);
        let picks: Vec<_> = (0..3).filter_map(|_| deck.next_move(MoveOrder::Sequential, &mut rng)).collect();
        assert_eq!(picks, vec![TemplateId::new(1), TemplateId::new(2), TemplateId::new(1)]);
    }

    #[test]
    fn test_empty_move_deck() {
        let mut rng = GameRng::new(1);
        let mut deck = MoveDeck::new(Vec::new());
        assert_eq!(deck.next_move(MoveOrder::Sequential, &mut rng), None);
        assert_eq!(deck.next_move(MoveOrder::Random, &mut rng), None);
    }

    #[test]
    fn test_plan_orders_units_then_hero() {
        let mut state = state();
        let b = place(&mut state, Side::Enemy, 3, CardTemplate::creature(TemplateId::new(1), "B", 1, 1));
        let a = place(&mut state, Side::Enemy, 1, CardTemplate::creature(TemplateId::new(1), "A", 1, 1));

        let mut turn = EnemyTurn::plan(&state);
        assert_eq!(turn.remaining(), 6);
        assert_eq!(turn.peek(), Some(&EnemyStep { actor: EnemyActor::Unit(a), kind: StepKind::PlayCard }));
        let actors: Vec<_> = std::iter::from_fn(|| turn.pop()).map(|s| s.actor).collect();
        assert_eq!(
            actors,
            vec![
                EnemyActor::Unit(a),
                EnemyActor::Unit(a),
                EnemyActor::Unit(b),
                EnemyActor::Unit(b),
                EnemyActor::Hero,
                EnemyActor::Hero,
            ]
        );
    }

    #[test]
    fn test_hero_move_and_attack() {
        let mut state = state();
        state
            .enemy_decks
            .insert(EnemyActor::Hero, MoveDeck::new(vec![TemplateId::new(11)]));

        run_step(&mut state, EnemyStep { actor: EnemyActor::Hero, kind: StepKind::PlayCard });
        assert_eq!(state.heroes[Side::Enemy].effective_attack(), 6);

        run_step(&mut state, EnemyStep { actor: EnemyActor::Hero, kind: StepKind::Attack });
        assert_eq!(state.heroes[Side::Ally].health, 14);
    }

    #[test]
    fn test_unit_attack_prefers_taunt() {
        let mut state = state();
        let attacker = place(&mut state, Side::Enemy, 0, CardTemplate::creature(TemplateId::new(1), "Orc", 2, 2));
        place(&mut state, Side::Ally, 0, CardTemplate::creature(TemplateId::new(2), "Imp", 1, 5));
        let guard = place(&mut state, Side::Ally, 2, CardTemplate::creature(TemplateId::new(3), "Wall", 0, 5).taunt());

        run_step(&mut state, EnemyStep { actor: EnemyActor::Unit(attacker), kind: StepKind::Attack });
        assert_eq!(state.unit(guard).unwrap().current_health, 3);
    }

    #[test]
    fn test_dead_actor_step_is_noop() {
        let mut state = state();
        let ghost = UnitId::new(77);
        let before = state.events.len();
        run_step(&mut state, EnemyStep { actor: EnemyActor::Unit(ghost), kind: StepKind::Attack });
        assert_eq!(state.events.len(), before);
    }

    #[test]
    fn test_creature_move_summons() {
        let mut state = state();
        state
            .enemy_decks
            .insert(EnemyActor::Hero, MoveDeck::new(vec![TemplateId::new(12)]));
        run_step(&mut state, EnemyStep { actor: EnemyActor::Hero, kind: StepKind::PlayCard });
        assert_eq!(state.board.count(Side::Enemy), 1);
    }

    #[test]
    fn test_equipment_move_goes_to_front_unit() {
        let mut state = state();
        let orc = place(&mut state, Side::Enemy, 2, CardTemplate::creature(TemplateId::new(1), "Orc", 2, 2));
        state
            .enemy_decks
            .insert(EnemyActor::Hero, MoveDeck::new(vec![TemplateId::new(13)]));

        run_step(&mut state, EnemyStep { actor: EnemyActor::Hero, kind: StepKind::PlayCard });
        let orc = state.unit(orc).unwrap();
        assert_eq!(orc.equipment.len(), 1);
        assert!(orc.current_attack > 2);
    }

    #[test]
    fn test_equipment_move_without_holder_is_lost() {
        let mut state = state();
        state
            .enemy_decks
            .insert(EnemyActor::Hero, MoveDeck::new(vec![TemplateId::new(13)]));

        run_step(&mut state, EnemyStep { actor: EnemyActor::Hero, kind: StepKind::PlayCard });
        assert!(matches!(state.events.last(), Some(BattleEvent::EnemyMove { .. })));
        assert_eq!(state.board.count(Side::Enemy), 0);
        assert!(state.piles.discard.is_empty());
    }

    #[test]
    fn test_advance_completes_turn() {
        let mut state = state();
        state.turn.active = Side::Enemy;
        state.turn.phase = Phase::EnemyTurnRunning;
        state.enemy_turn = Some(EnemyTurn::plan(&state));

        assert_eq!(advance(&mut state), StepStatus::Continue);
        assert_eq!(advance(&mut state), StepStatus::Complete);
        assert_eq!(state.turn.active, Side::Ally);
        assert_eq!(state.heroes[Side::Ally].health, 16);
    }

    #[test]
    fn test_lethal_step_ends_battle() {
        let mut state = state();
        state.heroes[Side::Ally].health = 3;
        state
            .enemy_decks
            .insert(EnemyActor::Hero, MoveDeck::new(vec![TemplateId::new(10)]));
        state.enemy_turn = Some(EnemyTurn::plan(&state));

        assert_eq!(advance(&mut state), StepStatus::Complete);
        assert_eq!(state.outcome, Some(Outcome::Defeat));
        assert!(state.enemy_turn.is_none());
    }
}

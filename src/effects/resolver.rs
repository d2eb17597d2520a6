//! Effect resolution - checking and executing effects on battle state.
//!
//! `EffectResolver` is the kind→handler table: one exhaustive `match` for
//! preconditions and one for execution. Handlers read their magnitude from
//! the source card's `value` and delegate to the combat and stat rules.
//!
//! ## Two-phase contract
//!
//! 1. `check_condition` inspects state only. A failure means the card does
//!    nothing useful here and must stay where it is.
//! 2. `execute` applies the effect. It never fails; targets that vanished in
//!    the meantime make it a no-op.

use super::effect::{EffectKind, Scope};
use super::linear;
use crate::cards::{Evolution, Family, RuntimeCard, UnitInstance};
use crate::core::{BattleState, CardUid, PreconditionError, Side, UnitId};
use crate::rules::{self, stats, AttackMode, Target};
use crate::stack::{EnemyActor, MoveDeck};
use crate::triggers::BattleEvent;
use crate::zones::DrawOutcome;

/// Checks and executes effects.
pub struct EffectResolver;

impl EffectResolver {
    /// Check the card's own effect.
    pub fn check_condition(
        state: &BattleState,
        card: &RuntimeCard,
        owner: Side,
        target: Option<Target>,
    ) -> Result<(), PreconditionError> {
        match card.template.effect {
            Some(kind) => Self::check_kind(state, kind, owner, target),
            None => Err(PreconditionError::NoEffect(card.name().to_string())),
        }
    }

    /// Execute the card's own effect.
    pub fn execute(state: &mut BattleState, card: &RuntimeCard, owner: Side, target: Option<Target>) {
        if let Some(kind) = card.template.effect {
            Self::execute_kind(state, kind, card, owner, target);
        }
    }

    /// Run a triggered effect (on-death, on-kill, on-equip, enemy move).
    ///
    /// Triggers whose preconditions fail are skipped.
    pub fn trigger(
        state: &mut BattleState,
        kind: EffectKind,
        card: &RuntimeCard,
        owner: Side,
        target: Option<Target>,
    ) -> bool {
        if state.is_over() {
            return false;
        }
        if let Err(reason) = Self::check_kind(state, kind, owner, target) {
            log::debug!("{} trigger from {} skipped: {reason}", kind, card.name());
            return false;
        }
        Self::execute_kind(state, kind, card, owner, target);
        true
    }

    /// Precondition check for one effect kind.
    pub fn check_kind(
        state: &BattleState,
        kind: EffectKind,
        owner: Side,
        target: Option<Target>,
    ) -> Result<(), PreconditionError> {
        match kind {
            EffectKind::DamageTarget => match target {
                Some(Target::Hero(_)) => Ok(()),
                _ => target_unit(state, target).map(|_| ()),
            },

            EffectKind::DamageOpposingHero
            | EffectKind::DamageAllUnits { .. }
            | EffectKind::DrawCards
            | EffectKind::SearchEquipment
            | EffectKind::SearchFamily
            | EffectKind::AttackBuff
            | EffectKind::OverloadOnKill
            | EffectKind::Transpose
            | EffectKind::Orthogonalize => Ok(()),

            EffectKind::HealUnit => {
                let unit = target_unit(state, target)?;
                if unit.is_damaged() {
                    Ok(())
                } else {
                    Err(PreconditionError::FullHealth(unit.name.clone()))
                }
            }

            EffectKind::HealHero => {
                let hero = &state.heroes[owner];
                if hero.health < hero.max_health {
                    Ok(())
                } else {
                    Err(PreconditionError::HeroFullHealth(owner))
                }
            }

            EffectKind::ReviveUnit => {
                if state.graveyards[owner].is_empty() {
                    Err(PreconditionError::EmptyGraveyard)
                } else if state.board.is_full(owner) {
                    Err(PreconditionError::NoRoomToRevive)
                } else {
                    Ok(())
                }
            }

            EffectKind::UnitBuff { .. } | EffectKind::GrantOverload => {
                target_unit(state, target).map(|_| ())
            }

            EffectKind::FieldEvolve => {
                let unit = target_unit(state, target)?;
                if unit.equipment.is_empty() {
                    Err(PreconditionError::NoEquipment(unit.name.clone()))
                } else if unit.is_evolved() {
                    Err(PreconditionError::AlreadyEvolved(unit.name.clone()))
                } else {
                    Ok(())
                }
            }

            EffectKind::DoubleOverload => {
                let unit = target_unit(state, target)?;
                if unit.overload > 0 {
                    Ok(())
                } else {
                    Err(PreconditionError::NoOverload(unit.name.clone()))
                }
            }

            EffectKind::LimitOperation => {
                let unit = target_unit(state, target)?;
                if !unit.is_overload_commander() {
                    Err(PreconditionError::NotOverloadCommander(unit.name.clone()))
                } else if unit.limit_operation {
                    Err(PreconditionError::LimitOperationApplied(unit.name.clone()))
                } else {
                    Ok(())
                }
            }

            EffectKind::VentOverload => {
                let any = state.board.units(owner).any(|u| u.is_alive() && u.overload > 0);
                if any {
                    Ok(())
                } else {
                    Err(PreconditionError::NoOverloadedAllies)
                }
            }

            EffectKind::SwapAdjacent => {
                let unit = target_unit(state, target)?;
                if linear::swap_partner(state, unit).is_some() {
                    Ok(())
                } else {
                    Err(PreconditionError::NoAdjacentUnit(unit.name.clone()))
                }
            }

            EffectKind::ScalarDouble => {
                if linear::scalar_candidates(state, owner).is_empty() {
                    Err(PreconditionError::NoQualifyingUnits)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Execute one effect kind.
    pub fn execute_kind(
        state: &mut BattleState,
        kind: EffectKind,
        card: &RuntimeCard,
        owner: Side,
        target: Option<Target>,
    ) {
        let value = card.template.value;
        match kind {
            EffectKind::DamageTarget => match target {
                Some(Target::Unit(id)) => {
                    let Some(side) = state.unit(id).map(|u| u.side) else {
                        return;
                    };
                    if !nullified(state, owner, side, card) {
                        rules::apply_damage(state, id, value, None);
                    }
                }
                Some(Target::Hero(side)) => {
                    if !nullified(state, owner, side, card) {
                        rules::damage_hero(state, side, value);
                    }
                }
                None => {}
            },

            EffectKind::DamageOpposingHero => {
                let side = owner.opponent();
                if !nullified(state, owner, side, card) {
                    rules::damage_hero(state, side, value);
                }
            }

            EffectKind::DamageAllUnits { scope } => {
                let side = match scope {
                    Scope::Own => owner,
                    Scope::Opposing => owner.opponent(),
                };
                if !nullified(state, owner, side, card) {
                    rules::damage_all(state, side, value, None);
                }
            }

            EffectKind::HealUnit => {
                if let Some(id) = unit_id(target) {
                    rules::heal_unit(state, id, value);
                }
            }

            EffectKind::HealHero => {
                rules::heal_hero(state, owner, value);
            }

            EffectKind::DrawCards => draw(state, owner, value),

            EffectKind::ReviveUnit => {
                Self::revive_recent(state, owner, value.max(1) as usize);
            }

            EffectKind::SearchEquipment => {
                search(state, owner, |c| c.template.is_equipment());
            }

            EffectKind::SearchFamily => {
                let family = unit_id(target)
                    .and_then(|id| state.unit(id))
                    .map_or(card.template.family, UnitInstance::family);
                if family != Family::None {
                    let source = card.uid;
                    search(state, owner, |c| c.template.family == family && c.uid != source);
                }
            }

            EffectKind::UnitBuff { grant_flying, free_attack } => {
                let Some(id) = unit_id(target) else {
                    return;
                };
                if grant_flying {
                    if let Some(unit) = state.unit_mut(id).filter(|u| !u.flying) {
                        unit.flying = true;
                        let name = unit.name.clone();
                        state.emit(BattleEvent::FlyingGranted { unit: name });
                    }
                }
                if free_attack {
                    if let Some(side) = state.unit(id).map(|u| u.side) {
                        let aim = rules::default_target(state, side);
                        if let Err(err) = rules::resolve_attack(state, id, aim, AttackMode::Free) {
                            log::debug!("free attack skipped: {err}");
                        }
                    }
                }
            }

            EffectKind::FieldEvolve => {
                let Some(id) = unit_id(target) else {
                    return;
                };
                let turns = state.config.evolve_turns;
                let rearm = state.turn.attacks_allowed;
                let active = state.turn.active;
                let Some(unit) = state.unit_mut(id) else {
                    return;
                };
                unit.evolution = Some(Evolution::Timed(turns));
                if rearm && unit.side == active {
                    unit.can_attack = true;
                }
                let name = unit.name.clone();
                stats::recompute_unit(&mut state.board, id);
                state.emit(BattleEvent::Evolved { unit: name });
                if value > 0 {
                    draw(state, owner, value);
                }
            }

            EffectKind::AttackBuff => match target {
                Some(Target::Unit(id)) => {
                    let Some(unit) = state.unit_mut(id) else {
                        return;
                    };
                    unit.temporary_attack_modifier += value;
                    let name = unit.name.clone();
                    stats::recompute_unit(&mut state.board, id);
                    state.emit(BattleEvent::AttackModified { unit: name, amount: value });
                }
                Some(Target::Hero(side)) => {
                    let hero = &mut state.heroes[side];
                    hero.temporary_attack += value;
                    let name = hero.name.clone();
                    state.emit(BattleEvent::AttackModified { unit: name, amount: value });
                }
                None => {}
            },

            EffectKind::GrantOverload => {
                if let Some(id) = unit_id(target) {
                    rules::modify_overload(state, id, value);
                }
            }

            EffectKind::DoubleOverload => {
                let Some(id) = unit_id(target) else {
                    return;
                };
                let Some(current) = state.unit(id).map(|u| u.overload) else {
                    return;
                };
                let doubled = current * 2;
                rules::set_overload(state, id, doubled);
                if let Some(unit) = state.unit_mut(id) {
                    unit.pending_self_damage += doubled;
                    let name = unit.name.clone();
                    state.emit(BattleEvent::SelfDamageQueued { unit: name, amount: doubled });
                }
            }

            EffectKind::LimitOperation => {
                let Some(id) = unit_id(target) else {
                    return;
                };
                let Some(unit) = state.unit_mut(id) else {
                    return;
                };
                unit.limit_operation = true;
                let name = unit.name.clone();
                stats::recompute_unit(&mut state.board, id);
                state.emit(BattleEvent::LimitOperation { unit: name });
            }

            EffectKind::OverloadOnKill => {
                let Some(killer) = unit_id(target) else {
                    return;
                };
                let Some(side) = state.unit(killer).map(|u| u.side) else {
                    return;
                };
                let amount = value.max(1);
                rules::modify_overload(state, killer, amount);
                let commander = state
                    .board
                    .units(side)
                    .find(|u| u.is_alive() && u.is_overload_commander() && u.id != killer)
                    .map(|u| u.id);
                if let Some(commander) = commander {
                    rules::modify_overload(state, commander, amount);
                }
            }

            EffectKind::VentOverload => {
                let vented: Vec<UnitId> = state
                    .board
                    .units(owner)
                    .filter(|u| u.is_alive() && u.overload > 0)
                    .map(|u| u.id)
                    .collect();
                for id in vented {
                    rules::modify_overload(state, id, -1);
                }
                let side = owner.opponent();
                if !nullified(state, owner, side, card) {
                    rules::damage_all(state, side, value, None);
                }
            }

            EffectKind::SwapAdjacent => {
                if let Some(id) = unit_id(target) {
                    linear::swap_adjacent(state, id);
                }
            }
            EffectKind::ScalarDouble => linear::scalar_double(state, owner),
            EffectKind::Transpose => linear::transpose(state, owner),
            EffectKind::Orthogonalize => linear::orthogonalize(state, owner),
        }
    }

    /// Put a creature card onto the first empty slot of `side`.
    ///
    /// Returns the card back when the row is full.
    pub fn summon(
        state: &mut BattleState,
        side: Side,
        card: RuntimeCard,
        revived: bool,
    ) -> Result<UnitId, RuntimeCard> {
        let Some(slot) = state.board.first_empty(side) else {
            return Err(card);
        };
        let id = state.ids.unit();
        let mut unit = UnitInstance::from_card(id, side, slot, card);
        unit.can_attack = state.turn.attacks_allowed && state.turn.active == side;
        let name = unit.name.clone();
        let moves = unit.card.template.moves.clone();
        state.board.place(unit).map_err(|unit| unit.card)?;
        stats::recompute_side(&mut state.board, side);

        if side == Side::Enemy && !moves.is_empty() {
            state.enemy_decks.insert(EnemyActor::Unit(id), MoveDeck::new(moves));
        }
        state.emit(if revived {
            BattleEvent::UnitRevived { side, slot, unit: name }
        } else {
            BattleEvent::UnitSummoned { side, slot, unit: name }
        });
        Ok(id)
    }

    /// Revive a specific graveyard card.
    pub fn revive_card(state: &mut BattleState, side: Side, uid: CardUid) -> Option<UnitId> {
        if state.board.is_full(side) {
            return None;
        }
        let card = state.graveyards[side].take(uid)?;
        match Self::summon(state, side, card, true) {
            Ok(id) => Some(id),
            Err(card) => {
                state.graveyards[side].bury(card);
                None
            }
        }
    }

    /// Revive up to `count` of the most recently buried cards.
    pub fn revive_recent(state: &mut BattleState, side: Side, count: usize) -> usize {
        let mut revived = 0;
        while revived < count && !state.board.is_full(side) {
            let Some(card) = state.graveyards[side].take_most_recent() else {
                break;
            };
            if let Err(card) = Self::summon(state, side, card, true) {
                state.graveyards[side].bury(card);
                break;
            }
            revived += 1;
        }
        revived
    }

    /// Attach an equipment card to a unit and run the unit's on-equip effect.
    pub fn equip(state: &mut BattleState, card: RuntimeCard, id: UnitId) -> Result<(), RuntimeCard> {
        let Some(unit) = state.unit_mut(id).filter(|u| u.is_alive()) else {
            return Err(card);
        };
        let equipment = card.name().to_string();
        unit.equipment.push(card);
        let name = unit.name.clone();
        let side = unit.side;
        let on_equip = unit.card.template.on_equip.map(|kind| (kind, unit.card.clone()));

        stats::recompute_unit(&mut state.board, id);
        state.emit(BattleEvent::Equipped { unit: name, equipment });

        if let Some((kind, source)) = on_equip {
            Self::trigger(state, kind, &source, side, Some(Target::Unit(id)));
        }
        Ok(())
    }
}

fn unit_id(target: Option<Target>) -> Option<UnitId> {
    match target {
        Some(Target::Unit(id)) => Some(id),
        _ => None,
    }
}

fn target_unit(state: &BattleState, target: Option<Target>) -> Result<&UnitInstance, PreconditionError> {
    unit_id(target)
        .and_then(|id| state.unit(id))
        .filter(|u| u.is_alive())
        .ok_or(PreconditionError::MissingTarget)
}

/// Whether an effect from `owner` against `side` is nullified by immunity.
fn nullified(state: &mut BattleState, owner: Side, side: Side, card: &RuntimeCard) -> bool {
    if !state.is_immune(owner, side) {
        return false;
    }
    state.emit(BattleEvent::EffectNullified { side, card: card.name().to_string() });
    true
}

fn draw(state: &mut BattleState, owner: Side, value: i32) {
    if owner == Side::Ally {
        state.draw_cards(value.max(0) as usize);
    } else {
        log::debug!("enemy draw of {value} ignored");
    }
}

fn search(state: &mut BattleState, owner: Side, predicate: impl Fn(&RuntimeCard) -> bool) {
    if owner != Side::Ally {
        return;
    }
    match state.piles.search(predicate) {
        Some(DrawOutcome::ToHand(card)) => {
            state.emit(BattleEvent::CardSearched { card: card.name().to_string() });
        }
        Some(DrawOutcome::Overflowed(card)) => {
            state.emit(BattleEvent::HandOverflow { card: card.name().to_string() });
        }
        Some(DrawOutcome::Exhausted) | None => log::debug!("search found nothing"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{CardTemplate, EquipmentSpec, TargetRequirement};
    use crate::core::{BattleConfig, Hero, SessionContext, TemplateId};

    fn state() -> BattleState {
        let mut state =
            BattleState::new(BattleConfig::new(9), SessionContext::new(20), Hero::new("Boss", 20, 20));
        state.turn.attacks_allowed = true;
        state
    }

    fn card(state: &mut BattleState, template: CardTemplate) -> RuntimeCard {
        RuntimeCard::new(state.ids.card(), Arc::new(template))
    }

    fn summon(state: &mut BattleState, side: Side, template: CardTemplate) -> UnitId {
        let card = card(state, template);
        EffectResolver::summon(state, side, card, false).unwrap()
    }

    fn spell(state: &mut BattleState, effect: EffectKind, value: i32) -> RuntimeCard {
        let template = CardTemplate::spell(TemplateId::new(50), "Spell", effect).with_value(value);
        card(state, template)
    }

    fn grunt(health: i32) -> CardTemplate {
        CardTemplate::creature(TemplateId::new(1), "Grunt", 1, health)
    }

    // === Preconditions ===

    #[test]
    fn test_heal_full_health_fails() {
        let mut state = state();
        let id = summon(&mut state, Side::Ally, grunt(3));
        let heal = spell(&mut state, EffectKind::HealUnit, 2);

        let err = EffectResolver::check_condition(&state, &heal, Side::Ally, Some(Target::Unit(id)));
        assert_eq!(err, Err(PreconditionError::FullHealth("Grunt".into())));
    }

    #[test]
    fn test_revive_needs_graveyard() {
        let mut state = state();
        let revive = spell(&mut state, EffectKind::ReviveUnit, 1);
        let err = EffectResolver::check_condition(&state, &revive, Side::Ally, None);
        assert_eq!(err, Err(PreconditionError::EmptyGraveyard));
    }

    #[test]
    fn test_evolve_needs_equipment() {
        let mut state = state();
        let id = summon(&mut state, Side::Ally, grunt(3));
        let evolve = CardTemplate::evolution(TemplateId::new(60), "Evolve", EffectKind::FieldEvolve);
        let evolve = card(&mut state, evolve);

        let err = EffectResolver::check_condition(&state, &evolve, Side::Ally, Some(Target::Unit(id)));
        assert_eq!(err, Err(PreconditionError::NoEquipment("Grunt".into())));
    }

    #[test]
    fn test_missing_target() {
        let mut state = state();
        let bolt = spell(&mut state, EffectKind::DamageTarget, 2);
        let err = EffectResolver::check_condition(&state, &bolt, Side::Ally, None);
        assert_eq!(err, Err(PreconditionError::MissingTarget));
    }

    // === Execution ===

    #[test]
    fn test_damage_target_and_hero() {
        let mut state = state();
        let id = summon(&mut state, Side::Enemy, grunt(5));
        let bolt = spell(&mut state, EffectKind::DamageTarget, 2);

        EffectResolver::execute(&mut state, &bolt, Side::Ally, Some(Target::Unit(id)));
        assert_eq!(state.unit(id).unwrap().current_health, 3);

        EffectResolver::execute(&mut state, &bolt, Side::Ally, Some(Target::Hero(Side::Enemy)));
        assert_eq!(state.heroes[Side::Enemy].health, 18);
    }

    #[test]
    fn test_immunity_nullifies_hostile_effects() {
        let mut state = state();
        let id = summon(&mut state, Side::Ally, grunt(5));
        state.immunity[Side::Ally] = true;
        let bolt = spell(&mut state, EffectKind::DamageTarget, 2);
        let blast = spell(&mut state, EffectKind::DamageAllUnits { scope: Scope::Opposing }, 2);

        EffectResolver::execute(&mut state, &bolt, Side::Enemy, Some(Target::Unit(id)));
        EffectResolver::execute(&mut state, &blast, Side::Enemy, None);
        assert_eq!(state.unit(id).unwrap().current_health, 5);
        assert!(matches!(state.events.last(), Some(BattleEvent::EffectNullified { .. })));

        // Own effects still land.
        let own = spell(&mut state, EffectKind::DamageAllUnits { scope: Scope::Own }, 1);
        EffectResolver::execute(&mut state, &own, Side::Ally, None);
        assert_eq!(state.unit(id).unwrap().current_health, 4);
    }

    #[test]
    fn test_double_overload_queues_self_damage() {
        let mut state = state();
        let id = summon(&mut state, Side::Ally, grunt(9));
        state.unit_mut(id).unwrap().overload = 2;
        let double = spell(&mut state, EffectKind::DoubleOverload, 0);

        EffectResolver::execute(&mut state, &double, Side::Ally, Some(Target::Unit(id)));
        let unit = state.unit(id).unwrap();
        assert_eq!(unit.overload, 4);
        assert_eq!(unit.pending_self_damage, 4);
        assert_eq!(unit.current_health, 9);
    }

    #[test]
    fn test_field_evolve_rearms_and_draws() {
        let mut state = state();
        let id = summon(&mut state, Side::Ally, grunt(2));
        state.unit_mut(id).unwrap().can_attack = false;
        let gear = card(&mut state, CardTemplate::equipment(TemplateId::new(70), "Blade", EquipmentSpec::default()));
        EffectResolver::equip(&mut state, gear, id).unwrap();

        let evolve = CardTemplate::evolution(TemplateId::new(60), "Evolve", EffectKind::FieldEvolve);
        let evolve = card(&mut state, evolve);
        EffectResolver::execute(&mut state, &evolve, Side::Ally, Some(Target::Unit(id)));

        let unit = state.unit(id).unwrap();
        assert_eq!(unit.evolution, Some(Evolution::Timed(3)));
        assert!(unit.can_attack);
        assert_eq!(unit.max_health, 2 + 2);
    }

    #[test]
    fn test_overload_on_kill_feeds_commander() {
        let mut state = state();
        let commander = CardTemplate::creature(TemplateId::new(2), "Steam", 3, 5)
            .with_family(Family::Robot)
            .commander();
        let commander = summon(&mut state, Side::Ally, commander);
        let reaper = CardTemplate::creature(TemplateId::new(3), "Reaper", 2, 1)
            .with_on_kill(EffectKind::OverloadOnKill)
            .with_value(1);
        let reaper = summon(&mut state, Side::Ally, reaper);
        let victim = summon(&mut state, Side::Enemy, grunt(2));

        rules::resolve_attack(&mut state, reaper, Target::Unit(victim), AttackMode::Standard).unwrap();
        assert_eq!(state.unit(reaper).unwrap().overload, 1);
        assert_eq!(state.unit(commander).unwrap().overload, 1);
        assert_eq!(state.unit(commander).unwrap().current_attack, 5);
    }

    #[test]
    fn test_on_death_search_equipment() {
        let mut state = state();
        let sword = card(&mut state, CardTemplate::equipment(TemplateId::new(70), "Sword", EquipmentSpec::default()));
        let filler = spell(&mut state, EffectKind::DrawCards, 1);
        state.piles.draw_pile.push_back(filler);
        state.piles.draw_pile.push_back(sword.clone());

        let martyr = grunt(1).with_on_death(EffectKind::SearchEquipment);
        let id = summon(&mut state, Side::Ally, martyr);
        rules::apply_damage(&mut state, id, 5, None);

        assert!(state.piles.in_hand(sword.uid));
        assert_eq!(state.piles.draw_pile.len(), 1);
    }

    #[test]
    fn test_revive_most_recent() {
        let mut state = state();
        let first = summon(&mut state, Side::Ally, CardTemplate::creature(TemplateId::new(4), "First", 1, 1));
        let second = summon(&mut state, Side::Ally, CardTemplate::creature(TemplateId::new(5), "Second", 1, 1));
        rules::apply_damage(&mut state, first, 1, None);
        rules::apply_damage(&mut state, second, 1, None);

        assert_eq!(EffectResolver::revive_recent(&mut state, Side::Ally, 1), 1);
        assert_eq!(state.board.front(Side::Ally).unwrap().name, "Second");
        assert_eq!(state.graveyards[Side::Ally].len(), 1);
        assert_eq!(state.graveyards[Side::Ally].most_recent().unwrap().name(), "First");
    }

    #[test]
    fn test_revive_recent_stops_when_graveyard_empties() {
        let mut state = state();
        let only = summon(&mut state, Side::Ally, CardTemplate::creature(TemplateId::new(4), "Lone", 1, 1));
        rules::apply_damage(&mut state, only, 1, None);

        assert_eq!(EffectResolver::revive_recent(&mut state, Side::Ally, 3), 1);
        assert!(state.graveyards[Side::Ally].is_empty());
        assert_eq!(state.board.count(Side::Ally), 1);
    }

    #[test]
    fn test_free_attack_hits_taunt() {
        let mut state = state();
        let hero = summon(&mut state, Side::Ally, CardTemplate::creature(TemplateId::new(6), "Monk", 3, 3));
        state.unit_mut(hero).unwrap().can_attack = false;
        summon(&mut state, Side::Enemy, grunt(9));
        let guard = summon(&mut state, Side::Enemy, grunt(9).taunt());

        let buff = CardTemplate::spell(
            TemplateId::new(80),
            "Flurry",
            EffectKind::UnitBuff { grant_flying: true, free_attack: true },
        )
        .with_target(TargetRequirement::Ally);
        let buff = card(&mut state, buff);
        EffectResolver::execute(&mut state, &buff, Side::Ally, Some(Target::Unit(hero)));

        assert!(state.unit(hero).unwrap().flying);
        assert_eq!(state.unit(guard).unwrap().current_health, 6);
        assert!(!state.unit(hero).unwrap().can_attack);
    }

    #[test]
    fn test_enemy_summon_registers_moves() {
        let mut state = state();
        let caster = grunt(2).with_move(TemplateId::new(99));
        let id = summon(&mut state, Side::Enemy, caster);
        assert!(state.enemy_decks.contains_key(&EnemyActor::Unit(id)));
    }
}

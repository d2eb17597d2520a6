//! Combat integration tests.
//!
//! These tests drive damage, death and the commander cascade through the
//! public rules API on a hand-built battle state.

use std::sync::Arc;

use ccg_battle::cards::{CardTemplate, EquipmentSpec, Role, RuntimeCard};
use ccg_battle::core::{BattleConfig, BattleState, Hero, Outcome, SessionContext, Side, TemplateId, UnitId};
use ccg_battle::effects::{EffectKind, EffectResolver};
use ccg_battle::rules::{self, AttackMode, DamageReport, Target};
use ccg_battle::triggers::BattleEvent;

fn state() -> BattleState {
    BattleState::new(
        BattleConfig::new(5),
        SessionContext::new(30),
        Hero::new("Sentinel", 20, 20).with_attack(3),
    )
}

fn card(state: &mut BattleState, template: CardTemplate) -> RuntimeCard {
    RuntimeCard::new(state.ids.card(), Arc::new(template))
}

fn summon(state: &mut BattleState, side: Side, template: CardTemplate) -> UnitId {
    let card = card(state, template);
    EffectResolver::summon(state, side, card, false).unwrap()
}

fn creature(name: &str, attack: i32, health: i32) -> CardTemplate {
    CardTemplate::creature(TemplateId::new(1), name, attack, health)
}

fn gear(state: &mut BattleState, spec: EquipmentSpec) -> RuntimeCard {
    card(state, CardTemplate::equipment(TemplateId::new(40), "Gear", spec))
}

// === Death ===

/// A 2-health unit takes 3 damage: it dies, its card is buried, its
/// equipment is discarded and its neighbor loses the aura bonus.
#[test]
fn test_lethal_damage_buries_and_releases() {
    let mut state = state();
    let neighbor = summon(&mut state, Side::Ally, creature("Squire", 1, 4));
    let victim = summon(&mut state, Side::Ally, creature("Medic", 1, 1).with_role(Role::HealthAura));
    let sword = gear(&mut state, EquipmentSpec::default());
    let sword_uid = sword.uid;
    EffectResolver::equip(&mut state, sword, victim).unwrap();

    assert_eq!(state.unit(victim).unwrap().current_health, 2);
    assert_eq!(state.unit(neighbor).unwrap().max_health, 5);
    let victim_uid = state.unit(victim).unwrap().card.uid;

    let report = rules::apply_damage(&mut state, victim, 3, None);

    assert_eq!(report, DamageReport::Killed);
    assert!(state.unit(victim).is_none());
    assert!(state.board.at(Side::Ally, 1).is_none());
    assert!(state.graveyards[Side::Ally].contains(victim_uid));
    assert!(state.piles.in_discard(sword_uid));

    let neighbor = state.unit(neighbor).unwrap();
    assert_eq!(neighbor.max_health, 4);
    assert_eq!(neighbor.current_health, 4);
}

#[test]
fn test_on_death_trigger_runs_once() {
    let mut state = state();
    let template = creature("Martyr", 1, 1)
        .with_on_death(EffectKind::DamageOpposingHero)
        .with_value(4);
    let martyr = summon(&mut state, Side::Ally, template);

    rules::apply_damage(&mut state, martyr, 5, None);
    rules::apply_damage(&mut state, martyr, 5, None);

    assert_eq!(state.heroes[Side::Enemy].health, 16);
    assert_eq!(state.graveyards[Side::Ally].len(), 1);
}

// === Damage floor ===

#[test]
fn test_health_never_negative() {
    let mut state = state();
    let id = summon(&mut state, Side::Enemy, creature("Rat", 1, 2));
    rules::apply_damage(&mut state, id, 50, None);

    assert!(state
        .events
        .iter()
        .any(|e| *e == BattleEvent::UnitDamaged { unit: "Rat".into(), amount: 50, health: 0 }));

    rules::damage_hero(&mut state, Side::Ally, 100);
    assert_eq!(state.heroes[Side::Ally].health, 0);
    assert_eq!(state.outcome, Some(Outcome::Defeat));
}

#[test]
fn test_zero_damage_is_ignored() {
    let mut state = state();
    let id = summon(&mut state, Side::Enemy, creature("Rat", 1, 2));
    assert_eq!(rules::apply_damage(&mut state, id, 0, None), DamageReport::Ignored);
    assert_eq!(state.unit(id).unwrap().hits_this_rotation, 0);
}

// === Shields ===

#[test]
fn test_shield_substitutes_for_death() {
    let mut state = state();
    let id = summon(&mut state, Side::Ally, creature("Guard", 2, 3));
    let shield = gear(&mut state, EquipmentSpec { battle_shield: true, ..EquipmentSpec::default() });
    let shield_uid = shield.uid;
    EffectResolver::equip(&mut state, shield, id).unwrap();
    assert_eq!(state.unit(id).unwrap().max_health, 3);

    assert_eq!(rules::apply_damage(&mut state, id, 5, None), DamageReport::Absorbed);
    let guard = state.unit(id).unwrap();
    assert_eq!(guard.current_health, 3);
    assert!(guard.equipment.is_empty());
    assert!(state.piles.in_discard(shield_uid));

    assert_eq!(rules::apply_damage(&mut state, id, 5, None), DamageReport::Killed);
}

// === Commander cascade ===

#[test]
fn test_commander_cascade_stays_on_its_side() {
    let mut state = state();
    let commander = summon(&mut state, Side::Ally, creature("Marshal", 2, 2).commander());
    let follower = summon(&mut state, Side::Ally, creature("Cadet", 1, 3).requires_commander());
    let loner = summon(&mut state, Side::Ally, creature("Ranger", 1, 3));
    summon(&mut state, Side::Enemy, creature("Warlord", 2, 9).commander());
    let enemy_follower = summon(&mut state, Side::Enemy, creature("Thrall", 1, 3).requires_commander());

    rules::apply_damage(&mut state, commander, 2, None);

    assert!(state.unit(follower).is_none());
    assert!(state.unit(loner).is_some());
    assert!(state.unit(enemy_follower).is_some());
    assert_eq!(state.graveyards[Side::Ally].len(), 2);
    assert!(state
        .events
        .iter()
        .any(|e| *e == BattleEvent::CommanderFell { side: Side::Ally, casualties: 1 }));
}

#[test]
fn test_enforce_commander_without_deaths() {
    let mut state = state();
    summon(&mut state, Side::Enemy, creature("Thrall", 1, 3).requires_commander());
    assert_eq!(rules::enforce_commander(&mut state, Side::Ally), 0);
    assert_eq!(rules::enforce_commander(&mut state, Side::Enemy), 1);
    assert_eq!(state.board.count(Side::Enemy), 0);
}

// === Attacks ===

#[test]
fn test_attack_kills_and_fires_on_kill() {
    let mut state = state();
    state.turn.attacks_allowed = true;
    let template = creature("Brawler", 4, 4)
        .with_on_kill(EffectKind::AttackBuff)
        .with_value(2);
    let brawler = summon(&mut state, Side::Ally, template);
    state.unit_mut(brawler).unwrap().can_attack = true;
    let prey = summon(&mut state, Side::Enemy, creature("Rat", 1, 3));

    let report = rules::resolve_attack(&mut state, brawler, Target::Unit(prey), AttackMode::Standard);

    assert_eq!(report, Ok(DamageReport::Killed));
    let brawler = state.unit(brawler).unwrap();
    assert_eq!(brawler.current_attack, 6);
    assert!(!brawler.can_attack);
}

//! Combat resolution: attacks, damage, healing and death.
//!
//! ## Damage
//!
//! `apply_damage` is the only way a unit loses health. A lethal hit on a unit
//! carrying a battle shield breaks the shield instead. Otherwise health drops
//! (never below 0) and a unit at 0 runs death resolution.
//!
//! ## Death resolution
//!
//! In order: bury the card, release equipment, run the dying unit's on-death
//! effect, run the killer's on-kill effect, clear the slot, recompute the
//! survivors, then destroy dependents if the side just lost its last
//! commander. The dependent sweep is a single pass; dependents dying in it
//! never start another sweep.
//!
//! ## AOE
//!
//! Sweeps iterate a snapshot of unit ids, so deaths mid-sweep cannot skip or
//! repeat anyone.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::stats;
use crate::cards::UnitInstance;
use crate::core::{ActionError, BattleState, Outcome, Side, UnitId};
use crate::effects::EffectResolver;
use crate::triggers::BattleEvent;
use crate::zones::SLOT_COUNT;

/// Something that can be attacked, damaged or healed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Unit(UnitId),
    Hero(Side),
}

/// Whether an attack spends the attacker's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackMode {
    Standard,
    /// Granted by effects; ignores and keeps `can_attack`.
    Free,
}

/// What a single damage application did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageReport {
    /// Target missing, already dead, or zero damage.
    Ignored,
    /// A battle shield took the hit.
    Absorbed,
    Survived,
    Killed,
}

/// Damage a unit deals with its attack.
#[must_use]
pub fn attack_damage(unit: &UnitInstance) -> i32 {
    let amplified = unit.card.template.traits.amplified_by_transformation
        && unit.permanent_attack_modifier > 0;
    if amplified {
        unit.current_attack * 2
    } else {
        unit.current_attack
    }
}

/// Attack a unit or hero.
///
/// A standard attack by a unit that cannot attack is refused without any
/// state change.
pub fn resolve_attack(
    state: &mut BattleState,
    attacker: UnitId,
    target: Target,
    mode: AttackMode,
) -> Result<DamageReport, ActionError> {
    let Some(unit) = state.unit(attacker).filter(|u| u.is_alive()) else {
        return Err(ActionError::AttackerExhausted(attacker.to_string()));
    };
    if mode == AttackMode::Standard && !unit.can_attack {
        log::debug!("{} tried to attack without an action", unit.name);
        return Err(ActionError::AttackerExhausted(unit.name.clone()));
    }

    let damage = attack_damage(unit);
    let attacker_name = unit.name.clone();
    let target_name = target_name(state, target);

    if mode == AttackMode::Standard {
        if let Some(unit) = state.unit_mut(attacker) {
            unit.can_attack = false;
        }
    }

    state.emit(BattleEvent::Attacked {
        attacker: attacker_name,
        target: target_name,
        damage,
    });

    Ok(match target {
        Target::Unit(id) => apply_damage(state, id, damage, Some(attacker)),
        Target::Hero(side) => {
            damage_hero(state, side, damage);
            DamageReport::Survived
        }
    })
}

/// Pick what an attacker on `attacking_side` hits by default: the first
/// opposing taunt unit, else the front opposing unit, else the opposing hero.
#[must_use]
pub fn default_target(state: &BattleState, attacking_side: Side) -> Target {
    let defenders = attacking_side.opponent();
    state
        .board
        .first_taunt(defenders)
        .or_else(|| state.board.front(defenders))
        .map_or(Target::Hero(defenders), |u| Target::Unit(u.id))
}

fn target_name(state: &BattleState, target: Target) -> String {
    match target {
        Target::Unit(id) => state.unit_name(id),
        Target::Hero(side) => state.heroes[side].name.clone(),
    }
}

/// Deal damage to a unit.
pub fn apply_damage(
    state: &mut BattleState,
    target: UnitId,
    amount: i32,
    source: Option<UnitId>,
) -> DamageReport {
    if amount <= 0 {
        return DamageReport::Ignored;
    }
    let Some(unit) = state.unit_mut(target).filter(|u| u.is_alive()) else {
        return DamageReport::Ignored;
    };

    unit.hits_this_rotation += 1;
    let grounded = unit.flying && unit.hits_this_rotation >= 2;
    if grounded {
        unit.flying = false;
    }
    let name = unit.name.clone();
    let lethal = amount >= unit.current_health;
    let shield = if lethal { unit.shield_index() } else { None };

    if grounded {
        state.emit(BattleEvent::FlyingLost { unit: name.clone() });
    }

    if let Some(index) = shield {
        let Some(unit) = state.unit_mut(target) else {
            return DamageReport::Ignored;
        };
        let broken = unit.equipment.remove(index);
        let side = unit.side;
        stats::recompute_unit(&mut state.board, target);
        state.emit(BattleEvent::ShieldBroken {
            unit: name,
            shield: broken.name().to_string(),
        });
        if side == Side::Ally {
            state.piles.discard(broken);
        }
        return DamageReport::Absorbed;
    }

    let Some(unit) = state.unit_mut(target) else {
        return DamageReport::Ignored;
    };
    unit.current_health = (unit.current_health - amount).max(0);
    let health = unit.current_health;
    state.emit(BattleEvent::UnitDamaged { unit: name, amount, health });

    if health == 0 {
        resolve_death(state, target, source);
        DamageReport::Killed
    } else {
        DamageReport::Survived
    }
}

/// Damage every unit on `side`.
pub fn damage_all(state: &mut BattleState, side: Side, amount: i32, source: Option<UnitId>) {
    for id in state.board.unit_ids(side) {
        apply_damage(state, id, amount, source);
    }
}

/// Damage a hero, ending the battle when it reaches 0.
pub fn damage_hero(state: &mut BattleState, side: Side, amount: i32) {
    if amount <= 0 || state.is_over() {
        return;
    }
    let hero = &mut state.heroes[side];
    hero.health = (hero.health - amount).max(0);
    let health = hero.health;
    state.emit(BattleEvent::HeroDamaged { side, amount, health });

    if health == 0 {
        state.finish(match side {
            Side::Enemy => Outcome::Victory,
            Side::Ally => Outcome::Defeat,
        });
    }
}

/// Heal a unit up to its max health. Returns the amount restored.
pub fn heal_unit(state: &mut BattleState, target: UnitId, amount: i32) -> i32 {
    let Some(unit) = state.unit_mut(target).filter(|u| u.is_alive()) else {
        return 0;
    };
    let before = unit.current_health;
    unit.current_health = (before + amount.max(0)).min(unit.max_health);
    let healed = unit.current_health - before;
    if healed > 0 {
        let event = BattleEvent::UnitHealed {
            unit: unit.name.clone(),
            amount: healed,
            health: unit.current_health,
        };
        state.emit(event);
    }
    healed
}

/// Heal a hero up to its max health. Returns the amount restored.
pub fn heal_hero(state: &mut BattleState, side: Side, amount: i32) -> i32 {
    let hero = &mut state.heroes[side];
    let before = hero.health;
    hero.health = (before + amount.max(0)).min(hero.max_health);
    let healed = hero.health - before;
    if healed > 0 {
        let health = hero.health;
        state.emit(BattleEvent::HeroHealed { side, amount: healed, health });
    }
    healed
}

/// Run death resolution for a unit whose health reached 0.
pub fn resolve_death(state: &mut BattleState, id: UnitId, killer: Option<UnitId>) {
    destroy(state, id, killer, true);
}

fn destroy(state: &mut BattleState, id: UnitId, killer: Option<UnitId>, cascade: bool) {
    let Some(unit) = state.unit_mut(id) else {
        return;
    };
    unit.current_health = 0;
    unit.can_attack = false;
    let side = unit.side;
    let card = unit.card.clone();
    let was_commander = unit.is_commander();
    let released: SmallVec<[_; 2]> = unit.equipment.drain(..).collect();
    let name = unit.name.clone();

    state.graveyards[side].bury(card.clone());
    for piece in released {
        match side {
            Side::Ally => state.piles.discard(piece),
            Side::Enemy => log::debug!("enemy equipment {} is destroyed", piece.name()),
        }
    }
    state.emit(BattleEvent::UnitDied { side, unit: name });

    if let Some(kind) = card.template.on_death {
        EffectResolver::trigger(state, kind, &card, side, None);
    }

    let killer_trigger = killer
        .and_then(|k| state.unit(k))
        .filter(|k| k.is_alive())
        .and_then(|k| k.card.template.on_kill.map(|kind| (kind, k.card.clone(), k.side, k.id)));
    if let Some((kind, killer_card, killer_side, killer_id)) = killer_trigger {
        EffectResolver::trigger(state, kind, &killer_card, killer_side, Some(Target::Unit(killer_id)));
    }

    state.board.remove(id);
    stats::recompute_side(&mut state.board, side);

    if cascade && was_commander && !state.board.has_commander(side) {
        let casualties = destroy_dependents(state, side);
        if casualties > 0 {
            state.emit(BattleEvent::CommanderFell { side, casualties });
        }
    }
}

fn destroy_dependents(state: &mut BattleState, side: Side) -> usize {
    let dependents: SmallVec<[UnitId; SLOT_COUNT]> = state
        .board
        .units(side)
        .filter(|u| u.is_alive() && u.requires_commander())
        .map(|u| u.id)
        .collect();
    for &id in &dependents {
        destroy(state, id, None, false);
    }
    dependents.len()
}

/// Destroy units that require a commander when their side has none.
/// Returns how many were destroyed.
pub fn enforce_commander(state: &mut BattleState, side: Side) -> usize {
    if state.board.has_commander(side) {
        return 0;
    }
    let casualties = destroy_dependents(state, side);
    if casualties > 0 {
        state.emit(BattleEvent::CommanderFell { side, casualties });
    }
    casualties
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{CardTemplate, EquipmentSpec, RuntimeCard};
    use crate::core::{BattleConfig, Hero, SessionContext, TemplateId};

    fn state() -> BattleState {
        BattleState::new(
            BattleConfig::new(1),
            SessionContext::new(20),
            Hero::new("Boss", 10, 10).with_attack(5),
        )
    }

    fn summon(state: &mut BattleState, side: Side, slot: usize, template: CardTemplate) -> UnitId {
        let card = RuntimeCard::new(state.ids.card(), Arc::new(template));
        let id = state.ids.unit();
        let mut unit = UnitInstance::from_card(id, side, slot, card);
        unit.can_attack = true;
        state.board.place(unit).unwrap();
        stats::recompute_side(&mut state.board, side);
        id
    }

    fn equip(state: &mut BattleState, id: UnitId, spec: EquipmentSpec) {
        let template = CardTemplate::equipment(TemplateId::new(90), "Gear", spec);
        let card = RuntimeCard::new(state.ids.card(), Arc::new(template));
        state.unit_mut(id).unwrap().equipment.push(card);
        stats::recompute_unit(&mut state.board, id);
    }

    #[test]
    fn test_attack_consumes_action() {
        let mut state = state();
        let a = summon(&mut state, Side::Ally, 0, CardTemplate::creature(TemplateId::new(1), "Imp", 2, 2));
        let t = summon(&mut state, Side::Enemy, 0, CardTemplate::creature(TemplateId::new(2), "Rat", 1, 5));

        let report = resolve_attack(&mut state, a, Target::Unit(t), AttackMode::Standard).unwrap();
        assert_eq!(report, DamageReport::Survived);
        assert_eq!(state.unit(t).unwrap().current_health, 3);
        assert!(!state.unit(a).unwrap().can_attack);

        let again = resolve_attack(&mut state, a, Target::Unit(t), AttackMode::Standard);
        assert!(matches!(again, Err(ActionError::AttackerExhausted(_))));
        assert_eq!(state.unit(t).unwrap().current_health, 3);
    }

    #[test]
    fn test_free_attack_keeps_action() {
        let mut state = state();
        let a = summon(&mut state, Side::Ally, 0, CardTemplate::creature(TemplateId::new(1), "Imp", 2, 2));
        state.unit_mut(a).unwrap().can_attack = false;

        resolve_attack(&mut state, a, Target::Hero(Side::Enemy), AttackMode::Free).unwrap();
        assert_eq!(state.heroes[Side::Enemy].health, 8);
        assert!(!state.unit(a).unwrap().can_attack);
    }

    #[test]
    fn test_amplified_attack_doubles() {
        let mut state = state();
        let template = CardTemplate::creature(TemplateId::new(1), "Shifter", 2, 2)
            .amplified_by_transformation();
        let a = summon(&mut state, Side::Ally, 0, template);
        assert_eq!(attack_damage(state.unit(a).unwrap()), 2);

        state.unit_mut(a).unwrap().permanent_attack_modifier = 1;
        stats::recompute_unit(&mut state.board, a);
        assert_eq!(attack_damage(state.unit(a).unwrap()), 6);
    }

    #[test]
    fn test_damage_floor() {
        let mut state = state();
        let t = summon(&mut state, Side::Enemy, 0, CardTemplate::creature(TemplateId::new(1), "Rat", 1, 2));
        let report = apply_damage(&mut state, t, 50, None);

        assert_eq!(report, DamageReport::Killed);
        assert!(!state.board.contains(t));
        assert_eq!(state.graveyards[Side::Enemy].len(), 1);
    }

    #[test]
    fn test_shield_absorbs_lethal_hit_once() {
        let mut state = state();
        let t = summon(&mut state, Side::Ally, 0, CardTemplate::creature(TemplateId::new(1), "Knight", 1, 3));
        equip(&mut state, t, EquipmentSpec { battle_shield: true, ..EquipmentSpec::default() });

        assert_eq!(apply_damage(&mut state, t, 3, None), DamageReport::Absorbed);
        let unit = state.unit(t).unwrap();
        assert_eq!(unit.current_health, 3);
        assert!(unit.equipment.is_empty());

        assert_eq!(apply_damage(&mut state, t, 3, None), DamageReport::Killed);
    }

    #[test]
    fn test_shield_ignores_non_lethal_hits() {
        let mut state = state();
        let t = summon(&mut state, Side::Ally, 0, CardTemplate::creature(TemplateId::new(1), "Knight", 1, 3));
        equip(&mut state, t, EquipmentSpec { battle_shield: true, ..EquipmentSpec::default() });

        assert_eq!(apply_damage(&mut state, t, 2, None), DamageReport::Survived);
        assert_eq!(state.unit(t).unwrap().equipment.len(), 1);
    }

    #[test]
    fn test_flying_lost_after_two_hits() {
        let mut state = state();
        let t = summon(&mut state, Side::Ally, 0, CardTemplate::creature(TemplateId::new(1), "Hawk", 1, 9).flying());

        apply_damage(&mut state, t, 1, None);
        assert!(state.unit(t).unwrap().flying);
        apply_damage(&mut state, t, 1, None);
        assert!(!state.unit(t).unwrap().flying);
    }

    #[test]
    fn test_hero_death_ends_battle_once() {
        let mut state = state();
        damage_hero(&mut state, Side::Enemy, 7);
        damage_hero(&mut state, Side::Enemy, 7);
        damage_hero(&mut state, Side::Enemy, 7);

        assert_eq!(state.heroes[Side::Enemy].health, 0);
        assert_eq!(state.outcome, Some(Outcome::Victory));
        assert_eq!(state.events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut state = state();
        let t = summon(&mut state, Side::Ally, 0, CardTemplate::creature(TemplateId::new(1), "Imp", 1, 5));
        apply_damage(&mut state, t, 3, None);

        assert_eq!(heal_unit(&mut state, t, 10), 3);
        assert_eq!(state.unit(t).unwrap().current_health, 5);
        assert_eq!(heal_unit(&mut state, t, 10), 0);
    }

    #[test]
    fn test_aoe_snapshot_hits_everyone_once() {
        let mut state = state();
        for slot in 0..3 {
            summon(&mut state, Side::Enemy, slot, CardTemplate::creature(TemplateId::new(1), "Rat", 1, 1));
        }
        let survivor = summon(&mut state, Side::Enemy, 3, CardTemplate::creature(TemplateId::new(2), "Ogre", 1, 5));

        damage_all(&mut state, Side::Enemy, 2, None);
        assert_eq!(state.board.count(Side::Enemy), 1);
        assert_eq!(state.unit(survivor).unwrap().current_health, 3);
        assert_eq!(state.graveyards[Side::Enemy].len(), 3);
    }

    #[test]
    fn test_default_target_priority() {
        let mut state = state();
        assert_eq!(default_target(&state, Side::Enemy), Target::Hero(Side::Ally));

        let front = summon(&mut state, Side::Ally, 1, CardTemplate::creature(TemplateId::new(1), "Imp", 1, 1));
        assert_eq!(default_target(&state, Side::Enemy), Target::Unit(front));

        let guard = summon(&mut state, Side::Ally, 4, CardTemplate::creature(TemplateId::new(2), "Guard", 1, 4).taunt());
        assert_eq!(default_target(&state, Side::Enemy), Target::Unit(guard));
    }

    #[test]
    fn test_enforce_commander_without_commander() {
        let mut state = state();
        let loyal = CardTemplate::creature(TemplateId::new(1), "Squire", 1, 1).requires_commander();
        summon(&mut state, Side::Ally, 0, loyal.clone());
        summon(&mut state, Side::Ally, 1, CardTemplate::creature(TemplateId::new(2), "Imp", 1, 1));
        summon(&mut state, Side::Enemy, 0, loyal);

        assert_eq!(enforce_commander(&mut state, Side::Ally), 1);
        assert_eq!(state.board.count(Side::Ally), 1);
        assert_eq!(state.board.count(Side::Enemy), 1);
    }
}

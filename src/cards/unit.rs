//! Unit instances - creatures on the board.
//!
//! A `UnitInstance` is created from a creature [`RuntimeCard`] when it lands
//! on a slot and owns all mutable combat state for that creature.
//!
//! ## Derived vs. owned state
//!
//! `current_attack` and `max_health` are derived: only
//! [`stats::recompute`](crate::rules::stats::recompute) writes them.
//! Everything else (modifiers, overload, equipment, current health) is owned
//! state that rules code mutates directly and then recomputes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::runtime::RuntimeCard;
use super::template::{CardColor, Family, Role};
use crate::core::{Side, UnitId};

/// Attached equipment. Most units carry zero or one piece.
pub type EquipmentList = SmallVec<[RuntimeCard; 2]>;

/// Evolution status of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evolution {
    /// Reverts after the given number of owner turn starts.
    Timed(u32),
    /// Never reverts.
    Permanent,
}

/// A creature on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitInstance {
    pub id: UnitId,
    pub side: Side,
    pub slot: usize,
    /// The card this unit came from. Goes to the graveyard on death.
    pub card: RuntimeCard,
    pub name: String,

    pub base_attack: i32,
    pub base_max_health: i32,
    pub current_attack: i32,
    pub current_health: i32,
    pub max_health: i32,

    pub equipment: EquipmentList,
    pub evolution: Option<Evolution>,
    /// One-time evolution that scales the commander overload bonus.
    pub limit_operation: bool,

    pub flying: bool,
    pub taunt: bool,
    pub can_attack: bool,

    pub overload: i32,
    pub fatigued: bool,
    /// Fatigue earned this turn, applied at the next owner turn start.
    pub fatigue_pending: bool,
    pub pending_self_damage: i32,

    pub permanent_attack_modifier: i32,
    /// Cleared at each owner turn start.
    pub temporary_attack_modifier: i32,

    /// Hits taken since the owner's last turn start.
    pub hits_this_rotation: u32,
}

impl UnitInstance {
    /// Create a unit from a creature card. Derived stats start at base values;
    /// callers run the stat pipeline once the unit is on the board.
    #[must_use]
    pub fn from_card(id: UnitId, side: Side, slot: usize, card: RuntimeCard) -> Self {
        let template = &card.template;
        let base_attack = template.attack;
        let base_max_health = template.health.max(1);
        Self {
            id,
            side,
            slot,
            name: template.name.clone(),
            base_attack,
            base_max_health,
            current_attack: base_attack,
            current_health: base_max_health,
            max_health: base_max_health,
            equipment: SmallVec::new(),
            evolution: None,
            limit_operation: false,
            flying: template.traits.starts_flying,
            taunt: template.traits.taunt,
            can_attack: false,
            overload: 0,
            fatigued: false,
            fatigue_pending: false,
            pending_self_damage: 0,
            permanent_attack_modifier: 0,
            temporary_attack_modifier: 0,
            hits_this_rotation: 0,
            card,
        }
    }

    #[must_use]
    pub fn is_evolved(&self) -> bool {
        self.evolution.is_some()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.current_health < self.max_health
    }

    #[must_use]
    pub fn is_commander(&self) -> bool {
        self.card.template.traits.commander
    }

    #[must_use]
    pub fn requires_commander(&self) -> bool {
        self.card.template.traits.requires_commander
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.card.template.role
    }

    #[must_use]
    pub fn family(&self) -> Family {
        self.card.template.family
    }

    #[must_use]
    pub fn color(&self) -> CardColor {
        self.card.template.color
    }

    /// Commander of the overload family.
    #[must_use]
    pub fn is_overload_commander(&self) -> bool {
        self.is_commander() && self.family() == Family::Robot
    }

    /// Position of the first battle-shield equipment, if any.
    #[must_use]
    pub fn shield_index(&self) -> Option<usize> {
        self.equipment.iter().position(|e| e.template.is_battle_shield())
    }
}

impl std::fmt::Display for UnitInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} atk, {}/{} hp)",
            self.name, self.current_attack, self.current_health, self.max_health
        )
    }
}

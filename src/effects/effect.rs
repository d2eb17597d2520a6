//! Effect kinds.
//!
//! Every card effect is one variant of [`EffectKind`]. Magnitudes are not
//! stored here: handlers read them from the source template's `value`, so one
//! variant serves every card that shares its behavior.

use serde::{Deserialize, Serialize};

/// Which row an area effect sweeps, relative to the effect's owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Own,
    #[default]
    Opposing,
}

/// Closed set of card effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    // === Damage and healing ===
    /// `value` damage to the chosen unit or hero.
    DamageTarget,
    /// `value` damage to the opposing hero.
    DamageOpposingHero,
    /// `value` damage to every unit in one row.
    DamageAllUnits { scope: Scope },
    /// Restore `value` health to the chosen unit.
    HealUnit,
    /// Restore `value` health to the owner's hero.
    HealHero,

    // === Cards ===
    /// Draw `value` cards.
    DrawCards,
    /// Return `max(1, value)` creatures from the graveyard to the board.
    ReviveUnit,
    /// Pull an equipment card from the draw pile into the hand.
    SearchEquipment,
    /// Pull a card of the equipped unit's family from the draw pile.
    SearchFamily,

    // === Unit buffs ===
    UnitBuff { grant_flying: bool, free_attack: bool },
    /// Timed evolution of an equipped unit, then draw `value` cards.
    FieldEvolve,
    /// `value` temporary attack for the acting unit or hero.
    AttackBuff,

    // === Overload ===
    GrantOverload,
    DoubleOverload,
    /// One-time evolution scaling the commander bonus by overload.
    LimitOperation,
    /// Grants overload to the killer and its side's overload commander.
    OverloadOnKill,
    /// Each overloaded ally loses 1 overload, then `value` damage to every
    /// opposing unit.
    VentOverload,

    // === Linear algebra ===
    SwapAdjacent,
    ScalarDouble,
    Transpose,
    Orthogonalize,
}

impl EffectKind {
    /// Whether the effect harms the side it lands on.
    #[must_use]
    pub fn is_hostile(self) -> bool {
        matches!(
            self,
            EffectKind::DamageTarget
                | EffectKind::DamageOpposingHero
                | EffectKind::DamageAllUnits { .. }
                | EffectKind::VentOverload
        )
    }

    /// Whether the effect is resolved through the graveyard picker when a
    /// player plays it.
    #[must_use]
    pub fn picks_from_graveyard(self) -> bool {
        matches!(self, EffectKind::ReviveUnit)
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectKind::DamageAllUnits { scope } => write!(f, "DamageAllUnits({scope:?})"),
            EffectKind::UnitBuff { grant_flying, free_attack } => {
                write!(f, "UnitBuff(flying={grant_flying}, free_attack={free_attack})")
            }
            other => write!(f, "{other:?}"),
        }
    }
}

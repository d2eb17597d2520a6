//! Target selection.
//!
//! The player's pending interaction is a small state machine:
//!
//! - `Idle`: nothing pending
//! - `AwaitingTarget`: a played card waits for a unit (or hero) click
//! - `AwaitingGraveyard`: a revive card waits for a graveyard pick
//! - `SelectedAttacker`: an ally was clicked and waits for its target
//!
//! Which units are clickable is always derived from the current state by the
//! functions here and never stored on units, so leaving a selection has no
//! effect on anything else.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::effect::EffectKind;
use crate::cards::{CardTemplate, TargetRequirement};
use crate::core::{ActionError, BattleState, CardUid, Side, UnitId};
use crate::rules::Target;
use crate::zones::SLOT_COUNT;

/// Pending player interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Idle,
    AwaitingTarget { card: CardUid },
    AwaitingGraveyard { card: CardUid },
    SelectedAttacker { unit: UnitId },
}

impl Selection {
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Selection::Idle
    }

    /// The card this selection is holding, if any.
    #[must_use]
    pub fn pending_card(self) -> Option<CardUid> {
        match self {
            Selection::AwaitingTarget { card } | Selection::AwaitingGraveyard { card } => {
                Some(card)
            }
            Selection::Idle | Selection::SelectedAttacker { .. } => None,
        }
    }
}

/// Units a card with `requirement` played by `owner` may target.
#[must_use]
pub fn selectable_units(
    state: &BattleState,
    requirement: TargetRequirement,
    owner: Side,
) -> SmallVec<[UnitId; 2 * SLOT_COUNT]> {
    Side::BOTH
        .into_iter()
        .filter(|&side| requirement.accepts(owner, side))
        .flat_map(|side| state.board.units(side))
        .filter(|u| u.is_alive())
        .map(|u| u.id)
        .collect()
}

/// Whether a card accepts a hero as its target.
#[must_use]
pub fn accepts_hero(template: &CardTemplate, owner: Side, hero: Side) -> bool {
    template.effect == Some(EffectKind::DamageTarget) && template.target.accepts(owner, hero)
}

/// Check a clicked target against the card's declared category.
pub fn validate_target(
    state: &BattleState,
    template: &CardTemplate,
    owner: Side,
    target: Target,
) -> Result<(), ActionError> {
    let accepted = match target {
        Target::Unit(id) => state
            .unit(id)
            .is_some_and(|u| u.is_alive() && template.target.accepts(owner, u.side)),
        Target::Hero(side) => accepts_hero(template, owner, side),
    };
    if accepted {
        Ok(())
    } else {
        Err(ActionError::TargetCategoryMismatch { expected: template.target })
    }
}

/// Units the player's attacker may hit. With an enemy taunt unit on the
/// field only taunt units qualify and the hero is shielded.
#[must_use]
pub fn attack_targets(state: &BattleState, attacking_side: Side) -> SmallVec<[Target; SLOT_COUNT + 1]> {
    let defenders = attacking_side.opponent();
    let taunting = state.board.first_taunt(defenders).is_some();
    let mut targets: SmallVec<[Target; SLOT_COUNT + 1]> = state
        .board
        .units(defenders)
        .filter(|u| u.is_alive() && (!taunting || u.taunt))
        .map(|u| Target::Unit(u.id))
        .collect();
    if !taunting {
        targets.push(Target::Hero(defenders));
    }
    targets
}

/// Check an attack target against the taunt rule.
pub fn validate_attack(state: &BattleState, attacking_side: Side, target: Target) -> Result<(), ActionError> {
    if attack_targets(state, attacking_side).contains(&target) {
        return Ok(());
    }
    let wrong_side = match target {
        Target::Unit(id) => state.unit(id).map_or(true, |u| u.side == attacking_side),
        Target::Hero(side) => side == attacking_side,
    };
    if wrong_side {
        Err(ActionError::TargetCategoryMismatch { expected: TargetRequirement::Enemy })
    } else {
        Err(ActionError::TauntBlocks)
    }
}

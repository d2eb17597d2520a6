//! Error types returned by battle entry points.
//!
//! Two classes of failure exist, and neither leaves partial state behind:
//!
//! - [`ActionError`]: the request is illegal right now (wrong phase, limits,
//!   gating, bad target). Nothing changes.
//! - [`PreconditionError`]: the card is playable but its effect has nothing
//!   to do (healing a full-health unit, reviving from an empty graveyard).
//!   The card stays in hand.

use thiserror::Error;

use super::ids::{CardUid, TemplateId};
use super::side::Side;
use crate::cards::{CardColor, TargetRequirement};
use crate::stack::Phase;

/// An inbound request that the current battle state does not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("the battle is over")]
    BattleOver,

    #[error("not allowed during {0:?}")]
    WrongPhase(Phase),

    #[error("{0} is not in hand or on the bench")]
    CardNotFound(CardUid),

    #[error("summon limit reached for this turn")]
    SummonLimit,

    #[error("evolution limit reached for this turn")]
    EvolutionLimit,

    #[error("no empty slot on the {0} side")]
    BoardFull(Side),

    #[error("requires a {0:?} unit on the field")]
    ColorGated(CardColor),

    #[error("{0} cannot attack right now")]
    AttackerExhausted(String),

    #[error("no unit in {side} slot {slot}")]
    EmptySlot { side: Side, slot: usize },

    #[error("target must be {expected}")]
    TargetCategoryMismatch { expected: TargetRequirement },

    #[error("a unit with taunt must be attacked first")]
    TauntBlocks,

    #[error("select an attacking ally first")]
    NoAttackerSelected,

    #[error("a graveyard selection is pending")]
    GraveyardSelectionPending,

    #[error("no graveyard selection is pending")]
    NoGraveyardSelection,

    #[error("{0} is not in the graveyard")]
    NotInGraveyard(CardUid),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// A card's effect cannot do anything useful in the current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("{0} is already at full health")]
    FullHealth(String),

    #[error("the {0} hero is already at full health")]
    HeroFullHealth(Side),

    #[error("the graveyard is empty")]
    EmptyGraveyard,

    #[error("no empty slot to revive into")]
    NoRoomToRevive,

    #[error("{0} has no equipment to evolve with")]
    NoEquipment(String),

    #[error("{0} is already evolved")]
    AlreadyEvolved(String),

    #[error("{0} has no overload to double")]
    NoOverload(String),

    #[error("no allied unit carries overload")]
    NoOverloadedAllies,

    #[error("{0} has no adjacent unit")]
    NoAdjacentUnit(String),

    #[error("{0} is not an overload-family commander")]
    NotOverloadCommander(String),

    #[error("limit operation already applied to {0}")]
    LimitOperationApplied(String),

    #[error("no unit qualifies for this effect")]
    NoQualifyingUnits,

    #[error("this effect needs a target")]
    MissingTarget,

    #[error("no unit to equip")]
    NothingToEquip,

    #[error("{0} has no effect")]
    NoEffect(String),
}

/// Failure while building a battle or catalog.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("unknown template {0}")]
    UnknownTemplate(TemplateId),

    #[error("template {0} registered twice")]
    DuplicateTemplate(TemplateId),

    #[error("encounter places {0} units but a row holds at most 5")]
    TooManyEnemies(usize),

    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

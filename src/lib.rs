//! # ccg-battle
//!
//! Rules engine for a turn-based card battle between the player and an
//! AI-controlled encounter, each fighting from a row of five slots.
//!
//! ## Design Principles
//!
//! 1. **One owner of state**: every rule takes `&mut BattleState`. Units are
//!    addressed by id and re-found after each mutation, so no handler holds a
//!    reference across a death.
//!
//! 2. **Derived stats are recomputed, never patched**: base values plus
//!    equipment, evolution, auras and modifiers go through one pipeline.
//!
//! 3. **Events instead of callbacks into the UI**: the engine appends to an
//!    ordered event log and an optional `Presenter` reads it.
//!
//! ## Architecture
//!
//! - **Step-driven enemy turn**: the enemy turn is a queue of steps the
//!   presentation layer pulls one at a time. Nothing waits on timers.
//!
//! - **Persistent Data Structures**: `im-rs` vectors for the event log, draw
//!   pile and graveyards keep state clones cheap.
//!
//! ## Modules
//!
//! - `core`: sides, ids, state, RNG, configuration, session, errors
//! - `zones`: slot board and card piles
//! - `cards`: templates, runtime cards, the catalog and board units
//! - `rules`: stat pipeline, combat and overload
//! - `effects`: effect variants, resolution and targeting
//! - `triggers`: battle events and presentation hooks
//! - `stack`: turn controller and enemy step queue
//! - `battle`: the inbound facade, builder and snapshots

pub mod core;
pub mod zones;
pub mod cards;
pub mod rules;
pub mod effects;
pub mod triggers;
pub mod stack;
pub mod battle;

// Re-export commonly used types
pub use crate::core::{
    ActionError, PreconditionError, SetupError,
    BattleConfig, Encounter, MoveOrder,
    BattleState, Hero, Outcome,
    CardUid, TemplateId, UnitId,
    GameRng, GameRngState,
    Relic, SessionContext,
    Side, SideMap,
};

pub use crate::zones::{SlotBoard, Piles, Graveyard, SLOT_COUNT};

pub use crate::cards::{
    CardCatalog, CardTemplate, CardKind, CardColor, Family, Role,
    TargetRequirement, EquipmentSpec, RuntimeCard, UnitInstance,
};

pub use crate::rules::{AttackMode, DamageReport, Target};

pub use crate::effects::{EffectKind, EffectResolver, Scope, Selection};

pub use crate::triggers::{BattleEvent, EventLog, NullPresenter, Presenter};

pub use crate::stack::{Phase, StepStatus, TurnController};

pub use crate::battle::{Battle, BattleBuilder, BattleSnapshot};

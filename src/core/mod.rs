//! Core battle types: sides, ids, state, RNG, configuration, errors.
//!
//! Everything else in the crate reads and writes a single [`BattleState`].
//! The surrounding run hands in a [`SessionContext`] instead of relying on
//! global singletons.

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod session;
pub mod side;
pub mod state;

pub use config::{BattleConfig, Encounter, MoveOrder};
pub use error::{ActionError, PreconditionError, SetupError};
pub use ids::{CardUid, IdAllocator, TemplateId, UnitId};
pub use rng::{GameRng, GameRngState};
pub use session::{Relic, SessionContext};
pub use side::{Side, SideMap};
pub use state::{BattleState, Hero, Outcome, TurnState};

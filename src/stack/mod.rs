//! Turn and step sequencing.
//!
//! - `TurnController`: phase transitions and turn-start maintenance
//! - `EnemyTurn`: the enemy turn as an ordered queue of steps, pulled one at
//!   a time through [`advance`]
//!
//! Nothing here waits on timers. The presentation layer decides when to pull
//! the next enemy step.

mod enemy;
mod turn;

pub use enemy::{advance, run_step, EnemyActor, EnemyStep, EnemyTurn, MoveDeck, StepKind, StepStatus};
pub use turn::{Phase, TurnController};

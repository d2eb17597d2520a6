//! Outbound notifications: the event log and presentation hooks.
//!
//! ## Key Types
//!
//! - `BattleEvent`: one observable change, renderable as a log line
//! - `EventLog`: ordered event history
//! - `Presenter`: adapter trait for a renderer (optional)

pub mod event;
pub mod presenter;

pub use event::{BattleEvent, EventLog};
pub use presenter::{NullPresenter, Presenter};

//! Presentation hooks.
//!
//! The engine never holds references to visual objects. A presentation
//! adapter implements [`Presenter`] and receives events and signals after
//! each inbound call. Every method has a no-op default, and a battle built
//! without a presenter runs headless.

use super::event::BattleEvent;
use crate::core::BattleState;

/// Receiver for outbound notifications.
pub trait Presenter {
    /// A new event, in log order.
    fn on_event(&mut self, _event: &BattleEvent) {}

    /// State changed and should be re-rendered.
    fn on_state_changed(&mut self, _state: &BattleState) {}

    /// The player won. Fires at most once per battle.
    fn on_victory(&mut self) {}

    /// The player lost. Fires at most once per battle.
    fn on_defeat(&mut self) {}
}

/// Presenter that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

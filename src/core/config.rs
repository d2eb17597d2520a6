//! Battle configuration types.
//!
//! A battle is configured at startup by providing:
//! - `BattleConfig`: rule constants (hand limit, per-turn limits, timers, seed)
//! - `Encounter`: the opposing hero and the enemy units placed on its row
//!
//! Both are plain serde data so a meta-game can author them as JSON.

use serde::{Deserialize, Serialize};

use super::ids::TemplateId;
use super::side::Side;

/// Order in which an enemy draws from its private move deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOrder {
    /// Cycle through the deck front to back.
    #[default]
    Sequential,
    /// Pick uniformly at random with the battle RNG.
    Random,
}

/// Rule constants for a battle.
///
/// ## Example
///
/// ```
/// use ccg_battle::core::{BattleConfig, Side};
///
/// let config = BattleConfig::new(7)
///     .with_hand_limit(8)
///     .with_opener(Side::Ally);
///
/// assert_eq!(config.hand_limit, 8);
/// assert_eq!(config.opening_hand, 4);
/// assert_eq!(config.opener, Some(Side::Ally));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Seed for the coin flip, shuffles and random enemy moves.
    pub seed: u64,

    /// Maximum hand size. Cards drawn past it go straight to discard.
    pub hand_limit: usize,

    /// Cards drawn before the first turn.
    pub opening_hand: usize,

    /// Cards drawn at the start of each player turn (before relic bonuses).
    pub draws_per_turn: usize,

    /// Creature summons allowed per turn.
    pub summons_per_turn: u32,

    /// Evolution cards allowed per turn.
    pub evolutions_per_turn: u32,

    /// Owner turns a field evolution lasts.
    pub evolve_turns: u32,

    /// How enemies pick from their move decks.
    pub move_order: MoveOrder,

    /// Force the opening side instead of flipping a coin.
    pub opener: Option<Side>,
}

impl BattleConfig {
    /// Create a configuration with default rules and the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Set the hand limit.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_opening_hand(mut self, cards: usize) -> Self {
        self.opening_hand = cards;
        self
    }

    /// Set the number of evolution turns.
    #[must_use]
    pub fn with_evolve_turns(mut self, turns: u32) -> Self {
        self.evolve_turns = turns;
        self
    }

    /// Set the enemy move order.
    #[must_use]
    pub fn with_move_order(mut self, order: MoveOrder) -> Self {
        self.move_order = order;
        self
    }

    /// Skip the coin flip and let `side` open.
    #[must_use]
    pub fn with_opener(mut self, side: Side) -> Self {
        self.opener = Some(side);
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            hand_limit: 6,
            opening_hand: 4,
            draws_per_turn: 1,
            summons_per_turn: 1,
            evolutions_per_turn: 1,
            evolve_turns: 3,
            move_order: MoveOrder::Sequential,
            opener: None,
        }
    }
}

/// The opposing hero and its board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// Display name of the enemy hero.
    pub name: String,

    /// Starting (and maximum) health of the enemy hero.
    pub health: i32,

    /// Base attack of the enemy hero. Zero means the hero never attacks.
    pub attack: i32,

    /// Private move deck of the enemy hero.
    pub moves: Vec<TemplateId>,

    /// Enemy units, placed left to right from slot 0.
    pub units: Vec<TemplateId>,
}

impl Encounter {
    /// Create an encounter with a hero and no units or moves.
    pub fn new(name: impl Into<String>, health: i32, attack: i32) -> Self {
        Self {
            name: name.into(),
            health,
            attack,
            moves: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Add a card to the hero's move deck.
    #[must_use]
    pub fn with_move(mut self, template: TemplateId) -> Self {
        self.moves.push(template);
        self
    }

    /// Add an enemy unit.
    #[must_use]
    pub fn with_unit(mut self, template: TemplateId) -> Self {
        self.units.push(template);
        self
    }
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new("Boss", 30, 5)
    }
}

//! Meta-game context handed to a battle.
//!
//! The surrounding run (map, shop, events) owns the player's deck, carried
//! health and relic collection. A battle receives a `SessionContext` at
//! construction and hands it back, with health updated, when it ends.

use serde::{Deserialize, Serialize};

use super::ids::TemplateId;

/// A passive run-wide bonus that affects battles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relic {
    /// Heal every damaged ally unit by `amount` when the player ends a turn.
    EndTurnHeal { name: String, amount: i32 },
    /// Draw `cards` extra cards at the start of each player turn.
    ExtraDraw { name: String, cards: usize },
}

impl Relic {
    /// Display name of the relic.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Relic::EndTurnHeal { name, .. } | Relic::ExtraDraw { name, .. } => name,
        }
    }
}

/// Player-side state that outlives a single battle.
///
/// ```
/// use ccg_battle::core::{Relic, SessionContext, TemplateId};
///
/// let session = SessionContext::new(80)
///     .with_deck([TemplateId::new(1), TemplateId::new(2)])
///     .with_relic(Relic::ExtraDraw { name: "Satchel".into(), cards: 1 });
///
/// assert_eq!(session.extra_draws(), 1);
/// assert_eq!(session.end_turn_heal(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Current player health, carried between battles.
    pub player_health: i32,

    /// Maximum player health.
    pub player_max_health: i32,

    /// The player's deck as template ids.
    pub deck: Vec<TemplateId>,

    /// Relics collected so far.
    pub relics: Vec<Relic>,
}

impl SessionContext {
    /// Create a session at full health with an empty deck.
    #[must_use]
    pub fn new(max_health: i32) -> Self {
        Self {
            player_health: max_health,
            player_max_health: max_health,
            deck: Vec::new(),
            relics: Vec::new(),
        }
    }

    /// Replace the deck.
    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = TemplateId>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }

    /// Add a relic.
    #[must_use]
    pub fn with_relic(mut self, relic: Relic) -> Self {
        self.relics.push(relic);
        self
    }

    /// Set the carried health.
    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.player_health = health.clamp(0, self.player_max_health);
        self
    }

    /// Total extra cards drawn per player turn.
    #[must_use]
    pub fn extra_draws(&self) -> usize {
        self.relics
            .iter()
            .map(|relic| match relic {
                Relic::ExtraDraw { cards, .. } => *cards,
                Relic::EndTurnHeal { .. } => 0,
            })
            .sum()
    }

    /// Total healing applied to damaged units at player turn end.
    #[must_use]
    pub fn end_turn_heal(&self) -> i32 {
        self.relics
            .iter()
            .map(|relic| match relic {
                Relic::EndTurnHeal { amount, .. } => *amount,
                Relic::ExtraDraw { .. } => 0,
            })
            .sum()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(80)
    }
}

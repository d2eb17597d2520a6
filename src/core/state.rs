//! Battle state.
//!
//! ## BattleState
//!
//! Everything one battle needs, owned in one place:
//! - Board, piles and graveyards
//! - Both heroes' health pools
//! - Turn bookkeeping and the pending selection
//! - Enemy move decks and the in-progress enemy turn
//! - RNG, id allocator and the ordered event log
//!
//! Rules modules take `&mut BattleState` and never hold references into it
//! across calls. Units are re-found by [`UnitId`] after every mutation that
//! might have killed or moved them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::config::BattleConfig;
use super::ids::{IdAllocator, UnitId};
use super::rng::GameRng;
use super::session::SessionContext;
use super::side::{Side, SideMap};
use crate::cards::{CardCatalog, CardColor, UnitInstance};
use crate::effects::Selection;
use crate::stack::{EnemyActor, EnemyTurn, MoveDeck, Phase};
use crate::triggers::{BattleEvent, EventLog};
use crate::zones::{DrawOutcome, Graveyard, Piles, SlotBoard};

/// A side's health pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    /// Base attack when the hero acts in the enemy turn.
    pub attack: i32,
    /// Attack bonus that lasts until the hero's next turn start.
    pub temporary_attack: i32,
}

impl Hero {
    /// A hero at `health` out of `max_health`.
    pub fn new(name: impl Into<String>, health: i32, max_health: i32) -> Self {
        Self {
            name: name.into(),
            health: health.clamp(0, max_health),
            max_health,
            attack: 0,
            temporary_attack: 0,
        }
    }

    #[must_use]
    pub fn with_attack(mut self, attack: i32) -> Self {
        self.attack = attack;
        self
    }

    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Attack including the temporary bonus.
    #[must_use]
    pub fn effective_attack(&self) -> i32 {
        (self.attack + self.temporary_attack).max(0)
    }
}

/// How a battle ended, from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Per-turn bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Turn number, starting at 1 and advanced at every turn start of either side.
    pub number: u32,
    /// Whose turn it is.
    pub active: Side,
    pub phase: Phase,
    /// False on the opening turn of the battle.
    pub attacks_allowed: bool,
    pub summons: u32,
    pub evolutions: u32,
}

impl TurnState {
    #[must_use]
    pub fn new(active: Side) -> Self {
        Self {
            number: 0,
            active,
            phase: Phase::PlayerTurnStart,
            attacks_allowed: false,
            summons: 0,
            evolutions: 0,
        }
    }
}

/// Complete state of one battle.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub config: BattleConfig,
    pub session: SessionContext,
    /// Templates for cards created mid-battle (enemy moves, revived units).
    pub catalog: CardCatalog,

    // === Cards ===
    pub board: SlotBoard,
    pub piles: Piles,
    pub graveyards: SideMap<Graveyard>,

    // === Sides ===
    pub heroes: SideMap<Hero>,
    /// Hostile effects against an immune side are nullified.
    pub immunity: SideMap<bool>,

    // === Sequencing ===
    pub turn: TurnState,
    pub selection: Selection,
    pub enemy_decks: FxHashMap<EnemyActor, MoveDeck>,
    pub enemy_turn: Option<EnemyTurn>,
    pub outcome: Option<Outcome>,

    // === Infrastructure ===
    pub rng: GameRng,
    pub ids: IdAllocator,
    pub events: EventLog,
}

impl BattleState {
    /// Empty battle with both heroes set and no cards.
    #[must_use]
    pub fn new(config: BattleConfig, session: SessionContext, enemy: Hero) -> Self {
        let rng = GameRng::new(config.seed);
        let player = Hero::new("Player", session.player_health, session.player_max_health);
        let piles = Piles::new(config.hand_limit);
        Self {
            board: SlotBoard::new(),
            piles,
            graveyards: SideMap::default(),
            heroes: SideMap::new(|side| match side {
                Side::Ally => player.clone(),
                Side::Enemy => enemy.clone(),
            }),
            immunity: SideMap::with_value(false),
            turn: TurnState::new(Side::Ally),
            selection: Selection::Idle,
            enemy_decks: FxHashMap::default(),
            enemy_turn: None,
            outcome: None,
            rng,
            ids: IdAllocator::new(),
            events: EventLog::new(),
            config,
            session,
            catalog: CardCatalog::new(),
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: CardCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Append an event to the log.
    pub fn emit(&mut self, event: BattleEvent) {
        log::debug!("{event}");
        self.events.push(event);
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// End the battle. Only the first call has any effect.
    pub fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.turn.phase = Phase::Finished;
        self.enemy_turn = None;
        self.selection = Selection::Idle;
        self.emit(match outcome {
            Outcome::Victory => BattleEvent::Victory,
            Outcome::Defeat => BattleEvent::Defeat,
        });
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitInstance> {
        self.board.unit(id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitInstance> {
        self.board.unit_mut(id)
    }

    #[must_use]
    pub fn unit_name(&self, id: UnitId) -> String {
        self.unit(id).map_or_else(|| id.to_string(), |u| u.name.clone())
    }

    /// Whether an effect from `owner` aimed at `side` is nullified.
    #[must_use]
    pub fn is_immune(&self, owner: Side, side: Side) -> bool {
        owner != side && self.immunity[side]
    }

    /// Draw `count` cards into the player's hand.
    pub fn draw_cards(&mut self, count: usize) {
        for _ in 0..count {
            match self.piles.draw(&mut self.rng) {
                DrawOutcome::ToHand(card) => {
                    self.emit(BattleEvent::CardDrawn { card: card.name().to_string() })
                }
                DrawOutcome::Overflowed(card) => {
                    self.emit(BattleEvent::HandOverflow { card: card.name().to_string() })
                }
                DrawOutcome::Exhausted => {
                    self.emit(BattleEvent::DeckExhausted);
                    break;
                }
            }
        }
    }

    /// Colors present among non-fatigued allies of `side`.
    #[must_use]
    pub fn has_color(&self, side: Side, color: CardColor) -> bool {
        self.board
            .units(side)
            .any(|u| u.is_alive() && !u.fatigued && u.color() == color)
    }
}

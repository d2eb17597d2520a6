//! Battle events.
//!
//! Every observable change appends one [`BattleEvent`] to the battle's
//! [`EventLog`]. The log is the engine's outbound notification stream: a
//! presentation layer replays new entries to animate, and each entry renders
//! as a human-readable line through `Display`.
//!
//! Events carry names rather than references so they stay valid after the
//! units they describe have died.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::TargetRequirement;
use crate::core::Side;

/// Something that happened in a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    // === Flow ===
    BattleStarted { opener: Side },
    TurnStarted { side: Side, turn: u32 },
    TurnEnded { side: Side },
    Victory,
    Defeat,
    /// An inbound request was refused. State is unchanged.
    Rejected { reason: String },

    // === Cards ===
    CardDrawn { card: String },
    HandOverflow { card: String },
    DeckExhausted,
    CardPlayed { side: Side, card: String },
    CardSearched { card: String },
    TargetRequested { card: String, requirement: TargetRequirement },
    GraveyardSelectionRequested { card: String },
    SelectionCancelled { card: String },
    AttackerSelected { unit: String },
    EnemyMove { actor: String, card: String },
    EffectNullified { side: Side, card: String },

    // === Units ===
    UnitSummoned { side: Side, slot: usize, unit: String },
    UnitRevived { side: Side, slot: usize, unit: String },
    Equipped { unit: String, equipment: String },
    Attacked { attacker: String, target: String, damage: i32 },
    UnitDamaged { unit: String, amount: i32, health: i32 },
    UnitHealed { unit: String, amount: i32, health: i32 },
    ShieldBroken { unit: String, shield: String },
    FlyingGranted { unit: String },
    FlyingLost { unit: String },
    UnitDied { side: Side, unit: String },
    CommanderFell { side: Side, casualties: usize },
    AttackModified { unit: String, amount: i32 },
    Evolved { unit: String },
    EvolutionExpired { unit: String },
    LimitOperation { unit: String },
    OverloadChanged { unit: String, overload: i32 },
    SelfDamageQueued { unit: String, amount: i32 },
    Fatigued { unit: String },
    UnitsSwapped { left: String, right: String },
    StatsTransposed { unit: String, attack: i32, health: i32 },

    // === Heroes and sides ===
    HeroDamaged { side: Side, amount: i32, health: i32 },
    HeroHealed { side: Side, amount: i32, health: i32 },
    RankComputed { rank: usize, threshold: i32 },
    ImmunityGranted { side: Side },
    ImmunityExpired { side: Side },
}

impl BattleEvent {
    /// Terminal events end the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattleEvent::Victory | BattleEvent::Defeat)
    }
}

impl std::fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BattleEvent::*;
        match self {
            BattleStarted { opener } => write!(f, "Battle started, {opener} side opens"),
            TurnStarted { side, turn } => write!(f, "Turn {turn}: {side} side"),
            TurnEnded { side } => write!(f, "The {side} side ends its turn"),
            Victory => write!(f, "Victory!"),
            Defeat => write!(f, "Defeat..."),
            Rejected { reason } => write!(f, "Cannot do that: {reason}"),
            CardDrawn { card } => write!(f, "Drew {card}"),
            HandOverflow { card } => write!(f, "Hand is full, {card} is discarded"),
            DeckExhausted => write!(f, "No cards left to draw"),
            CardPlayed { side, card } => write!(f, "The {side} side plays {card}"),
            CardSearched { card } => write!(f, "Searched {card} from the deck"),
            TargetRequested { card, requirement } => {
                write!(f, "{card}: choose {requirement}")
            }
            GraveyardSelectionRequested { card } => {
                write!(f, "{card}: choose a card from the graveyard")
            }
            SelectionCancelled { card } => write!(f, "{card} was cancelled"),
            AttackerSelected { unit } => write!(f, "{unit} is ready to attack"),
            EnemyMove { actor, card } => write!(f, "{actor} uses {card}"),
            EffectNullified { side, card } => {
                write!(f, "The {side} side is immune, {card} has no effect")
            }
            UnitSummoned { side, slot, unit } => {
                write!(f, "{unit} is summoned to {side} slot {slot}")
            }
            UnitRevived { side, slot, unit } => {
                write!(f, "{unit} returns to {side} slot {slot}")
            }
            Equipped { unit, equipment } => write!(f, "{unit} equips {equipment}"),
            Attacked { attacker, target, damage } => {
                write!(f, "{attacker} attacks {target} for {damage}")
            }
            UnitDamaged { unit, amount, health } => {
                write!(f, "{unit} takes {amount} damage ({health} left)")
            }
            UnitHealed { unit, amount, health } => {
                write!(f, "{unit} heals {amount} ({health} now)")
            }
            ShieldBroken { unit, shield } => write!(f, "{shield} breaks, {unit} survives"),
            FlyingGranted { unit } => write!(f, "{unit} takes flight"),
            FlyingLost { unit } => write!(f, "{unit} is grounded"),
            UnitDied { side, unit } => write!(f, "{unit} ({side}) dies"),
            CommanderFell { side, casualties } => {
                write!(f, "The {side} commander fell, {casualties} dependent units perish")
            }
            AttackModified { unit, amount } => write!(f, "{unit} gains {amount} attack this turn"),
            Evolved { unit } => write!(f, "{unit} evolves"),
            EvolutionExpired { unit } => write!(f, "{unit}'s evolution wears off"),
            LimitOperation { unit } => write!(f, "{unit} enters limit operation"),
            OverloadChanged { unit, overload } => write!(f, "{unit} overload is now {overload}"),
            SelfDamageQueued { unit, amount } => {
                write!(f, "{unit} will take {amount} damage next turn")
            }
            Fatigued { unit } => write!(f, "{unit} is fatigued"),
            UnitsSwapped { left, right } => write!(f, "{left} and {right} swap places"),
            StatsTransposed { unit, attack, health } => {
                write!(f, "{unit} is transposed to {attack}/{health}")
            }
            HeroDamaged { side, amount, health } => {
                write!(f, "The {side} hero takes {amount} damage ({health} left)")
            }
            HeroHealed { side, amount, health } => {
                write!(f, "The {side} hero heals {amount} ({health} now)")
            }
            RankComputed { rank, threshold } => write!(f, "Rank {rank} against threshold {threshold}"),
            ImmunityGranted { side } => write!(f, "The {side} side becomes immune to effects"),
            ImmunityExpired { side } => write!(f, "The {side} side is no longer immune"),
        }
    }
}

/// Ordered, append-only event history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vector<BattleEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push_back(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    /// Events appended at or after `cursor`.
    pub fn since(&self, cursor: usize) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter().skip(cursor)
    }

    #[must_use]
    pub fn last(&self) -> Option<&BattleEvent> {
        self.events.back()
    }

    /// Rendered lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_ordered() {
        let mut log = EventLog::new();
        log.push(BattleEvent::BattleStarted { opener: Side::Ally });
        log.push(BattleEvent::CardDrawn { card: "Bolt".into() });
        log.push(BattleEvent::Victory);

        assert_eq!(log.len(), 3);
        assert!(log.last().unwrap().is_terminal());
        let tail: Vec<_> = log.since(1).cloned().collect();
        assert_eq!(tail[0], BattleEvent::CardDrawn { card: "Bolt".into() });
    }

    #[test]
    fn test_display_lines() {
        let event = BattleEvent::UnitDamaged { unit: "Imp".into(), amount: 3, health: 0 };
        assert_eq!(event.to_string(), "Imp takes 3 damage (0 left)");

        let event = BattleEvent::TargetRequested {
            card: "Heal".into(),
            requirement: TargetRequirement::Ally,
        };
        assert_eq!(event.to_string(), "Heal: choose an allied unit");
    }

    #[test]
    fn test_event_serialization() {
        let event = BattleEvent::UnitDied { side: Side::Enemy, unit: "Golem".into() };
        let json = serde_json::to_string(&event).unwrap();
        let back: BattleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}

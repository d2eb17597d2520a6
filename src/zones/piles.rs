//! Card piles: bench, draw pile, hand, discard and graveyard.
//!
//! These are simple ordered collections. Rules code moves [`RuntimeCard`]s
//! between them; nothing here knows about effects or turns.
//!
//! ## Layout
//!
//! - **Bench**: creature cards waiting to be summoned (always playable)
//! - **Draw pile**: shuffled non-creature cards, top at the front
//! - **Hand**: capped at the configured hand limit; overflow goes to discard
//! - **Discard**: resolved spells and released equipment
//! - **Graveyard**: dead creatures, most recent first

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::RuntimeCard;
use crate::core::{CardUid, GameRng, TemplateId};

/// Where a playable card was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PileKind {
    Hand,
    Bench,
}

/// Result of moving a card toward the hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The card is now in hand.
    ToHand(RuntimeCard),
    /// The hand was full; the card went to discard.
    Overflowed(RuntimeCard),
    /// Draw pile and discard are both empty.
    Exhausted,
}

/// The player's non-board cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piles {
    pub bench: Vec<RuntimeCard>,
    pub draw_pile: Vector<RuntimeCard>,
    pub hand: Vec<RuntimeCard>,
    pub discard: Vec<RuntimeCard>,
    hand_limit: usize,
}

impl Piles {
    /// Empty piles with the given hand limit.
    #[must_use]
    pub fn new(hand_limit: usize) -> Self {
        Self {
            bench: Vec::new(),
            draw_pile: Vector::new(),
            hand: Vec::new(),
            discard: Vec::new(),
            hand_limit,
        }
    }

    /// Split a starting deck: creatures go to the bench, everything else
    /// (including creatures flagged to start in the deck) is shuffled into the
    /// draw pile.
    #[must_use]
    pub fn partition(deck: Vec<RuntimeCard>, hand_limit: usize, rng: &mut GameRng) -> Self {
        let mut piles = Self::new(hand_limit);
        let (bench, mut rest): (Vec<_>, Vec<_>) = deck.into_iter().partition(|card| {
            card.template.is_creature() && !card.template.traits.starts_in_deck
        });
        rng.shuffle(&mut rest);
        piles.bench = bench;
        piles.draw_pile = rest.into_iter().collect();
        piles
    }

    #[must_use]
    pub fn hand_limit(&self) -> usize {
        self.hand_limit
    }

    /// Draw the top card, reshuffling the discard when the pile is empty.
    pub fn draw(&mut self, rng: &mut GameRng) -> DrawOutcome {
        if self.draw_pile.is_empty() {
            self.reshuffle(rng);
        }
        match self.draw_pile.pop_front() {
            Some(card) => self.add_to_hand(card),
            None => DrawOutcome::Exhausted,
        }
    }

    fn reshuffle(&mut self, rng: &mut GameRng) {
        if self.discard.is_empty() {
            return;
        }
        let mut cards = std::mem::take(&mut self.discard);
        rng.shuffle(&mut cards);
        log::debug!("reshuffled {} discarded cards into the draw pile", cards.len());
        self.draw_pile = cards.into_iter().collect();
    }

    /// Put a card into hand, or into discard if the hand is full.
    pub fn add_to_hand(&mut self, card: RuntimeCard) -> DrawOutcome {
        if self.hand.len() >= self.hand_limit {
            self.discard.push(card.clone());
            DrawOutcome::Overflowed(card)
        } else {
            self.hand.push(card.clone());
            DrawOutcome::ToHand(card)
        }
    }

    /// Find a card the player may play.
    #[must_use]
    pub fn find_playable(&self, uid: CardUid) -> Option<(PileKind, &RuntimeCard)> {
        if let Some(card) = self.hand.iter().find(|c| c.uid == uid) {
            return Some((PileKind::Hand, card));
        }
        self.bench
            .iter()
            .find(|c| c.uid == uid)
            .map(|card| (PileKind::Bench, card))
    }

    /// Remove a card from hand or bench.
    pub fn take(&mut self, uid: CardUid) -> Option<RuntimeCard> {
        if let Some(pos) = self.hand.iter().position(|c| c.uid == uid) {
            return Some(self.hand.remove(pos));
        }
        let pos = self.bench.iter().position(|c| c.uid == uid)?;
        Some(self.bench.remove(pos))
    }

    pub fn discard(&mut self, card: RuntimeCard) {
        self.discard.push(card);
    }

    /// Move the first draw-pile card matching `predicate` toward the hand.
    pub fn search(&mut self, predicate: impl Fn(&RuntimeCard) -> bool) -> Option<DrawOutcome> {
        let index = self.draw_pile.iter().position(|c| predicate(c))?;
        let card = self.draw_pile.remove(index);
        Some(self.add_to_hand(card))
    }

    #[must_use]
    pub fn in_hand(&self, uid: CardUid) -> bool {
        self.hand.iter().any(|c| c.uid == uid)
    }

    #[must_use]
    pub fn in_discard(&self, uid: CardUid) -> bool {
        self.discard.iter().any(|c| c.uid == uid)
    }

    /// Template ids of the bench, draw pile, hand and discard, in that order.
    ///
    /// Units on the board and graveyard cards are not included.
    #[must_use]
    pub fn contents(&self) -> Vec<TemplateId> {
        self.bench
            .iter()
            .chain(self.draw_pile.iter())
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .map(RuntimeCard::template_id)
            .collect()
    }
}

/// Dead creatures of one side, most recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graveyard {
    cards: Vector<RuntimeCard>,
}

impl Graveyard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly dead creature on top.
    pub fn bury(&mut self, card: RuntimeCard) {
        self.cards.push_front(card);
    }

    /// Remove a specific card.
    pub fn take(&mut self, uid: CardUid) -> Option<RuntimeCard> {
        let pos = self.cards.iter().position(|c| c.uid == uid)?;
        Some(self.cards.remove(pos))
    }

    /// Remove the most recently buried card.
    pub fn take_most_recent(&mut self) -> Option<RuntimeCard> {
        self.cards.pop_front()
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<&RuntimeCard> {
        self.cards.front()
    }

    #[must_use]
    pub fn contains(&self, uid: CardUid) -> bool {
        self.cards.iter().any(|c| c.uid == uid)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuntimeCard> {
        self.cards.iter()
    }
}

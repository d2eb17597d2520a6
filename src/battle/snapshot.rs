//! Plain-data battle snapshots.
//!
//! A snapshot is what crosses the persistence boundary: template ids and
//! numbers only, no shared templates or event history. The meta-game stores
//! it however it likes; `to_bytes`/`from_bytes` give a compact bincode form.

use serde::{Deserialize, Serialize};

use crate::cards::{RuntimeCard, UnitInstance};
use crate::core::{BattleState, GameRng, GameRngState, Outcome, SetupError, Side, SideMap, TemplateId};
use crate::stack::Phase;

/// One unit on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub side: Side,
    pub slot: usize,
    pub template: TemplateId,
    pub name: String,
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,
    pub equipment: Vec<TemplateId>,
    pub evolved: bool,
    pub overload: i32,
    pub flying: bool,
    pub taunt: bool,
}

impl From<&UnitInstance> for UnitSnapshot {
    fn from(unit: &UnitInstance) -> Self {
        Self {
            side: unit.side,
            slot: unit.slot,
            template: unit.card.template_id(),
            name: unit.name.clone(),
            attack: unit.current_attack,
            health: unit.current_health,
            max_health: unit.max_health,
            equipment: unit.equipment.iter().map(RuntimeCard::template_id).collect(),
            evolved: unit.is_evolved(),
            overload: unit.overload,
            flying: unit.flying,
            taunt: unit.taunt,
        }
    }
}

/// Serializable summary of a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub turn: u32,
    pub active: Side,
    pub phase: Phase,
    pub outcome: Option<Outcome>,
    /// Health of each hero.
    pub heroes: SideMap<i32>,
    /// Player cards held in the piles: bench, draw pile, hand and discard.
    ///
    /// Cards on the board (with their equipment) are listed in `units`, and
    /// dead creatures in `graveyards`.
    pub deck: Vec<TemplateId>,
    pub hand: Vec<TemplateId>,
    pub units: Vec<UnitSnapshot>,
    pub graveyards: SideMap<Vec<TemplateId>>,
    pub rng: GameRngState,
}

impl BattleSnapshot {
    #[must_use]
    pub fn capture(state: &BattleState) -> Self {
        Self {
            turn: state.turn.number,
            active: state.turn.active,
            phase: state.turn.phase,
            outcome: state.outcome,
            heroes: SideMap::new(|side| state.heroes[side].health),
            deck: state.piles.contents(),
            hand: state.piles.hand.iter().map(RuntimeCard::template_id).collect(),
            units: Side::BOTH
                .into_iter()
                .flat_map(|side| state.board.units(side))
                .map(UnitSnapshot::from)
                .collect(),
            graveyards: SideMap::new(|side| {
                state.graveyards[side].iter().map(RuntimeCard::template_id).collect()
            }),
            rng: state.rng.state(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SetupError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SetupError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// An RNG positioned where this snapshot was taken.
    #[must_use]
    pub fn resume_rng(&self) -> GameRng {
        GameRng::from_state(&self.rng)
    }

    /// Units of one side in slot order.
    pub fn units_of(&self, side: Side) -> impl Iterator<Item = &UnitSnapshot> {
        self.units.iter().filter(move |u| u.side == side)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{CardTemplate, EquipmentSpec};
    use crate::core::{BattleConfig, CardUid, Hero, SessionContext, UnitId};

    fn state() -> BattleState {
        let mut state =
            BattleState::new(BattleConfig::new(8), SessionContext::new(25), Hero::new("Imp", 9, 12));
        let template = CardTemplate::creature(TemplateId::new(3), "Sentry", 2, 4).taunt();
        let card = RuntimeCard::new(CardUid::new(0), Arc::new(template));
        state
            .board
            .place(UnitInstance::from_card(UnitId::new(0), Side::Enemy, 2, card))
            .unwrap();
        state
    }

    #[test]
    fn test_capture_reads_board_and_heroes() {
        let snapshot = BattleSnapshot::capture(&state());

        assert_eq!(snapshot.heroes[Side::Ally], 25);
        assert_eq!(snapshot.heroes[Side::Enemy], 9);
        let sentry: Vec<_> = snapshot.units_of(Side::Enemy).collect();
        assert_eq!(sentry.len(), 1);
        assert_eq!(sentry[0].slot, 2);
        assert!(sentry[0].taunt);
        assert_eq!(snapshot.units_of(Side::Ally).count(), 0);
    }

    #[test]
    fn test_deck_lists_piles_only() {
        let mut state = state();
        let make = |uid: u32, template: CardTemplate| RuntimeCard::new(CardUid::new(uid), Arc::new(template));
        let squire = make(10, CardTemplate::creature(TemplateId::new(1), "Squire", 1, 2));
        let sword = make(11, CardTemplate::equipment(TemplateId::new(2), "Sword", EquipmentSpec::default()));
        let mut unit = UnitInstance::from_card(UnitId::new(1), Side::Ally, 0, squire);
        unit.equipment.push(sword);
        state.board.place(unit).unwrap();
        state.piles.hand.push(make(12, CardTemplate::creature(TemplateId::new(4), "Page", 1, 1)));
        state.graveyards[Side::Ally].bury(make(13, CardTemplate::creature(TemplateId::new(5), "Fallen", 1, 1)));

        let snapshot = BattleSnapshot::capture(&state);
        assert_eq!(snapshot.deck, vec![TemplateId::new(4)]);
        assert_eq!(snapshot.hand, vec![TemplateId::new(4)]);
        let squire: Vec<_> = snapshot.units_of(Side::Ally).collect();
        assert_eq!(squire[0].template, TemplateId::new(1));
        assert_eq!(squire[0].equipment, vec![TemplateId::new(2)]);
        assert_eq!(snapshot.graveyards[Side::Ally], vec![TemplateId::new(5)]);
    }

    #[test]
    fn test_bytes_round_trip() {
        let snapshot = BattleSnapshot::capture(&state());
        let bytes = snapshot.to_bytes().unwrap();
        assert_eq!(BattleSnapshot::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_resume_rng_continues_stream() {
        let mut state = state();
        state.rng.coin_flip();
        let snapshot = BattleSnapshot::capture(&state);

        let mut resumed = snapshot.resume_rng();
        assert_eq!(resumed.gen_index(1000), state.rng.gen_index(1000));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = BattleSnapshot::from_bytes(&[0xff; 3]);
        assert!(matches!(result, Err(SetupError::Encoding(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = BattleSnapshot::capture(&state());
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: BattleSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}

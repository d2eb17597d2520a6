//! The slot board: two rows of five positions.
//!
//! Each side owns a row of [`SLOT_COUNT`] slots. A slot is empty or holds
//! exactly one [`UnitInstance`]. Adjacency is position ±1 within a row and
//! drives aura bonuses and swap effects.
//!
//! Units are addressed either by `(Side, slot)` (what the presentation layer
//! clicks) or by [`UnitId`] (what rules code holds on to across mutations).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Role, UnitInstance};
use crate::core::{Side, SideMap, UnitId};

/// Slots per side.
pub const SLOT_COUNT: usize = 5;

type Row = [Option<UnitInstance>; SLOT_COUNT];

/// Two fixed rows of unit slots.
///
/// ## Usage
///
/// ```
/// use ccg_battle::zones::SlotBoard;
/// use ccg_battle::core::Side;
///
/// let board = SlotBoard::new();
/// assert_eq!(board.first_empty(Side::Ally), Some(0));
/// assert_eq!(board.neighbor_slots(0).as_slice(), &[1]);
/// assert_eq!(board.neighbor_slots(2).as_slice(), &[1, 3]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBoard {
    rows: SideMap<Row>,
}

impl SlotBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit at a position.
    #[must_use]
    pub fn at(&self, side: Side, slot: usize) -> Option<&UnitInstance> {
        self.rows[side].get(slot).and_then(Option::as_ref)
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitInstance> {
        self.rows
            .iter()
            .flat_map(|(_, row)| row.iter().flatten())
            .find(|u| u.id == id)
    }

    /// Look up a unit by id for mutation.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitInstance> {
        self.rows
            .iter_mut()
            .flat_map(|(_, row)| row.iter_mut().flatten())
            .find(|u| u.id == id)
    }

    /// Whether a unit is still on the board.
    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.unit(id).is_some()
    }

    /// First empty slot on a side, scanning left to right.
    #[must_use]
    pub fn first_empty(&self, side: Side) -> Option<usize> {
        self.rows[side].iter().position(Option::is_none)
    }

    #[must_use]
    pub fn is_full(&self, side: Side) -> bool {
        self.first_empty(side).is_none()
    }

    /// Number of occupied slots on a side.
    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        self.rows[side].iter().flatten().count()
    }

    /// Place a unit into its own `slot`. Returns the unit back if the slot is
    /// taken or out of range.
    pub fn place(&mut self, unit: UnitInstance) -> Result<(), UnitInstance> {
        let (side, slot) = (unit.side, unit.slot);
        match self.rows[side].get_mut(slot) {
            Some(cell) if cell.is_none() => {
                *cell = Some(unit);
                Ok(())
            }
            _ => Err(unit),
        }
    }

    /// Remove a unit from the board.
    pub fn remove(&mut self, id: UnitId) -> Option<UnitInstance> {
        let (side, slot) = self.locate(id)?;
        self.rows[side][slot].take()
    }

    /// Side and slot of a unit.
    #[must_use]
    pub fn locate(&self, id: UnitId) -> Option<(Side, usize)> {
        self.unit(id).map(|u| (u.side, u.slot))
    }

    /// Units on a side, left to right.
    pub fn units(&self, side: Side) -> impl Iterator<Item = &UnitInstance> {
        self.rows[side].iter().flatten()
    }

    /// Mutable units on a side, left to right.
    pub fn units_mut(&mut self, side: Side) -> impl Iterator<Item = &mut UnitInstance> {
        self.rows[side].iter_mut().flatten()
    }

    /// Snapshot of unit ids on a side. Iterate this, not the live row, when
    /// the loop body may kill or move units.
    #[must_use]
    pub fn unit_ids(&self, side: Side) -> SmallVec<[UnitId; SLOT_COUNT]> {
        self.units(side).map(|u| u.id).collect()
    }

    /// Slot indices adjacent to `slot`.
    #[must_use]
    pub fn neighbor_slots(&self, slot: usize) -> SmallVec<[usize; 2]> {
        let mut out = SmallVec::new();
        if slot > 0 {
            out.push(slot - 1);
        }
        if slot + 1 < SLOT_COUNT {
            out.push(slot + 1);
        }
        out
    }

    /// Units adjacent to a position.
    pub fn neighbors(&self, side: Side, slot: usize) -> impl Iterator<Item = &UnitInstance> {
        self.neighbor_slots(slot)
            .into_iter()
            .filter_map(move |s| self.at(side, s))
    }

    /// Count of living neighbors carrying the health aura role.
    #[must_use]
    pub fn aura_neighbors(&self, side: Side, slot: usize) -> i32 {
        self.neighbors(side, slot)
            .filter(|u| u.is_alive() && u.role() == Role::HealthAura)
            .count() as i32
    }

    /// Swap the contents of two slots on one side, updating slot indices.
    pub fn swap(&mut self, side: Side, a: usize, b: usize) {
        if a >= SLOT_COUNT || b >= SLOT_COUNT || a == b {
            return;
        }
        self.rows[side].swap(a, b);
        for slot in [a, b] {
            if let Some(unit) = self.rows[side][slot].as_mut() {
                unit.slot = slot;
            }
        }
    }

    /// Whether a living commander stands on a side.
    #[must_use]
    pub fn has_commander(&self, side: Side) -> bool {
        self.units(side).any(|u| u.is_alive() && u.is_commander())
    }

    /// First living commander on a side.
    #[must_use]
    pub fn commander(&self, side: Side) -> Option<&UnitInstance> {
        self.units(side).find(|u| u.is_alive() && u.is_commander())
    }

    /// Left-most unit with taunt.
    #[must_use]
    pub fn first_taunt(&self, side: Side) -> Option<&UnitInstance> {
        self.units(side).find(|u| u.is_alive() && u.taunt)
    }

    /// Left-most living unit.
    #[must_use]
    pub fn front(&self, side: Side) -> Option<&UnitInstance> {
        self.units(side).find(|u| u.is_alive())
    }
}

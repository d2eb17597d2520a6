//! Battle sides and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two sides: the player's (`Ally`) and the
//! AI opponent's (`Enemy`). Targeting categories, graveyards, heroes and
//! board rows are all keyed by side.
//!
//! ## SideMap
//!
//! Fixed two-entry storage indexed by `Side`, used wherever both sides carry
//! the same kind of data.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two participants in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human player.
    Ally,
    /// The AI-controlled opponent.
    Enemy,
}

impl Side {
    /// Both sides, player first.
    pub const BOTH: [Side; 2] = [Side::Ally, Side::Enemy];

    /// The other side.
    ///
    /// ```
    /// use ccg_battle::core::Side;
    ///
    /// assert_eq!(Side::Ally.opponent(), Side::Enemy);
    /// assert_eq!(Side::Enemy.opponent(), Side::Ally);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }

    /// Dense index (0 for ally, 1 for enemy).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Ally => 0,
            Side::Enemy => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Ally => write!(f, "ally"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use ccg_battle::core::{Side, SideMap};
///
/// let mut health: SideMap<i32> = SideMap::new(|side| match side {
///     Side::Ally => 80,
///     Side::Enemy => 30,
/// });
///
/// health[Side::Enemy] -= 5;
/// assert_eq!(health[Side::Ally], 80);
/// assert_eq!(health[Side::Enemy], 25);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Ally), factory(Side::Enemy)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::BOTH.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}

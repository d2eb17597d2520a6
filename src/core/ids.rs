//! Identifier newtypes.
//!
//! - `TemplateId`: an authored card definition in the catalog
//! - `CardUid`: one physical copy of a card during a battle
//! - `UnitId`: one creature on the board
//!
//! Card and unit ids are allocated from per-battle counters, so two copies of
//! the same template never share a `CardUid`.

use serde::{Deserialize, Serialize};

/// Identifier of an immutable card template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

impl TemplateId {
    /// Create a new template ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Template({})", self.0)
    }
}

/// Unique identity of a runtime card copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardUid(pub u32);

impl CardUid {
    /// Create a new card uid.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card#{}", self.0)
    }
}

/// Identity of a unit on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a new unit ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit#{}", self.0)
    }
}

/// Monotonic allocator for card and unit identities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_card: u32,
    next_unit: u32,
}

impl IdAllocator {
    /// Create an allocator starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh card uid.
    pub fn card(&mut self) -> CardUid {
        let id = CardUid(self.next_card);
        self.next_card += 1;
        id
    }

    /// Allocate a fresh unit id.
    pub fn unit(&mut self) -> UnitId {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.card(), CardUid(0));
        assert_eq!(ids.card(), CardUid(1));
        assert_eq!(ids.unit(), UnitId(0));
        assert_eq!(ids.card(), CardUid(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CardUid::new(4)), "Card#4");
        assert_eq!(format!("{}", UnitId::new(2)), "Unit#2");
        assert_eq!(format!("{}", TemplateId::new(9)), "Template(9)");
    }
}

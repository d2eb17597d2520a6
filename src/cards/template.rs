//! Card templates - immutable authored card data.
//!
//! A `CardTemplate` describes one kind of card: its stats, which effect it
//! resolves, what it must target, and the boolean traits a creature carries
//! onto the board. Runtime state (damage, modifiers, slot) lives on
//! [`UnitInstance`](super::UnitInstance) instead.
//!
//! Special behaviors are keyed off explicit [`Role`] and [`Traits`] fields,
//! never off names or stat pairs.

use serde::{Deserialize, Serialize};

use crate::core::{Side, TemplateId};
use crate::effects::EffectKind;

/// What happens when the card is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Summoned onto a slot as a unit.
    Creature,
    /// Resolves its effect and is discarded (or attached, for equipment).
    Spell,
    /// Like a spell, but limited per turn.
    Evolution,
}

/// Card color. Colored non-creature cards need a matching ally on the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardColor {
    #[default]
    Colorless,
    Red,
    Blue,
    Green,
}

/// Card family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    #[default]
    None,
    MartialArtist,
    /// The overload family. Commanders of this family gain attack from overload.
    Robot,
    LinearAlgebra,
}

/// Passive board role of a creature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Plain,
    /// Grants +1 max health to each adjacent ally.
    HealthAura,
    /// Adds +1 to every positive overload gain on its side.
    OverloadBooster,
    /// Always qualifies for scalar doubling.
    IdentityMatrix,
    /// Counts toward orthogonalization rank.
    StandardBasis,
}

/// Target category a card declares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRequirement {
    /// Resolves immediately.
    #[default]
    None,
    /// A unit on the caster's side.
    Ally,
    /// A unit on the opposing side.
    Enemy,
    /// Any unit.
    Any,
}

impl TargetRequirement {
    /// Whether a target on `target_side` satisfies this category for a card
    /// played by `owner`.
    ///
    /// ```
    /// use ccg_battle::cards::TargetRequirement;
    /// use ccg_battle::core::Side;
    ///
    /// assert!(TargetRequirement::Ally.accepts(Side::Ally, Side::Ally));
    /// assert!(!TargetRequirement::Ally.accepts(Side::Ally, Side::Enemy));
    /// assert!(TargetRequirement::Any.accepts(Side::Ally, Side::Enemy));
    /// ```
    #[must_use]
    pub fn accepts(self, owner: Side, target_side: Side) -> bool {
        match self {
            TargetRequirement::None => false,
            TargetRequirement::Ally => owner == target_side,
            TargetRequirement::Enemy => owner != target_side,
            TargetRequirement::Any => true,
        }
    }

    /// Whether the card waits for a target click.
    #[must_use]
    pub fn needs_target(self) -> bool {
        self != TargetRequirement::None
    }
}

impl std::fmt::Display for TargetRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRequirement::None => write!(f, "no target"),
            TargetRequirement::Ally => write!(f, "an allied unit"),
            TargetRequirement::Enemy => write!(f, "an enemy unit"),
            TargetRequirement::Any => write!(f, "any unit"),
        }
    }
}

/// Equipment data. A template with this set attaches to a unit instead of
/// going to discard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquipmentSpec {
    /// Extra attack on top of the per-equipment flat bonus.
    pub attack_bonus: i32,
    /// Extra max health on top of the per-equipment flat bonus.
    pub health_bonus: i32,
    /// Absorbs one lethal hit, then breaks.
    pub battle_shield: bool,
}

/// Boolean creature traits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Traits {
    pub taunt: bool,
    pub starts_flying: bool,
    pub commander: bool,
    /// Destroyed when its side has no commander.
    pub requires_commander: bool,
    /// Shuffled into the draw pile instead of waiting on the bench.
    pub starts_in_deck: bool,
    /// Deals double attack damage once it carries a positive permanent modifier.
    pub amplified_by_transformation: bool,
}

/// Immutable card definition.
///
/// ## Example
///
/// ```
/// use ccg_battle::cards::{CardTemplate, Family};
/// use ccg_battle::core::TemplateId;
///
/// let steam = CardTemplate::creature(TemplateId::new(1), "Steam Commander", 3, 5)
///     .with_family(Family::Robot)
///     .commander();
///
/// assert!(steam.is_creature());
/// assert!(steam.traits.commander);
/// assert_eq!(steam.health, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub id: TemplateId,
    pub name: String,
    pub kind: CardKind,
    pub color: CardColor,
    pub family: Family,
    pub role: Role,
    pub attack: i32,
    /// Base max health, at least 1 for creatures.
    pub health: i32,
    pub cost: i32,
    /// Effect magnitude (damage, healing, cards, overload).
    pub value: i32,
    pub effect: Option<EffectKind>,
    pub target: TargetRequirement,
    pub equipment: Option<EquipmentSpec>,
    pub on_death: Option<EffectKind>,
    /// Runs when this unit receives equipment.
    pub on_equip: Option<EffectKind>,
    pub on_kill: Option<EffectKind>,
    pub traits: Traits,
    /// Private move deck used when this creature fights for the enemy.
    pub moves: Vec<TemplateId>,
}

impl CardTemplate {
    fn blank(id: TemplateId, name: String, kind: CardKind) -> Self {
        Self {
            id,
            name,
            kind,
            color: CardColor::Colorless,
            family: Family::None,
            role: Role::Plain,
            attack: 0,
            health: 0,
            cost: 0,
            value: 0,
            effect: None,
            target: TargetRequirement::None,
            equipment: None,
            on_death: None,
            on_equip: None,
            on_kill: None,
            traits: Traits::default(),
            moves: Vec::new(),
        }
    }

    /// A creature card.
    #[must_use]
    pub fn creature(id: TemplateId, name: impl Into<String>, attack: i32, health: i32) -> Self {
        let mut template = Self::blank(id, name.into(), CardKind::Creature);
        template.attack = attack.max(0);
        template.health = health.max(1);
        template
    }

    /// A spell resolving `effect`.
    #[must_use]
    pub fn spell(id: TemplateId, name: impl Into<String>, effect: EffectKind) -> Self {
        let mut template = Self::blank(id, name.into(), CardKind::Spell);
        template.effect = Some(effect);
        template
    }

    /// An evolution card resolving `effect` on an allied unit.
    #[must_use]
    pub fn evolution(id: TemplateId, name: impl Into<String>, effect: EffectKind) -> Self {
        let mut template = Self::blank(id, name.into(), CardKind::Evolution);
        template.effect = Some(effect);
        template.target = TargetRequirement::Ally;
        template
    }

    /// Equipment targeting an allied unit.
    #[must_use]
    pub fn equipment(id: TemplateId, name: impl Into<String>, spec: EquipmentSpec) -> Self {
        let mut template = Self::blank(id, name.into(), CardKind::Spell);
        template.equipment = Some(spec);
        template.target = TargetRequirement::Ally;
        template
    }

    #[must_use]
    pub fn with_color(mut self, color: CardColor) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetRequirement) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_on_death(mut self, effect: EffectKind) -> Self {
        self.on_death = Some(effect);
        self
    }

    #[must_use]
    pub fn with_on_equip(mut self, effect: EffectKind) -> Self {
        self.on_equip = Some(effect);
        self
    }

    #[must_use]
    pub fn with_on_kill(mut self, effect: EffectKind) -> Self {
        self.on_kill = Some(effect);
        self
    }

    #[must_use]
    pub fn with_move(mut self, template: TemplateId) -> Self {
        self.moves.push(template);
        self
    }

    #[must_use]
    pub fn taunt(mut self) -> Self {
        self.traits.taunt = true;
        self
    }

    #[must_use]
    pub fn flying(mut self) -> Self {
        self.traits.starts_flying = true;
        self
    }

    #[must_use]
    pub fn commander(mut self) -> Self {
        self.traits.commander = true;
        self
    }

    #[must_use]
    pub fn requires_commander(mut self) -> Self {
        self.traits.requires_commander = true;
        self
    }

    #[must_use]
    pub fn in_deck(mut self) -> Self {
        self.traits.starts_in_deck = true;
        self
    }

    #[must_use]
    pub fn amplified_by_transformation(mut self) -> Self {
        self.traits.amplified_by_transformation = true;
        self
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.kind == CardKind::Creature
    }

    #[must_use]
    pub fn is_equipment(&self) -> bool {
        self.equipment.is_some()
    }

    #[must_use]
    pub fn is_battle_shield(&self) -> bool {
        self.equipment.is_some_and(|spec| spec.battle_shield)
    }

    /// Whether playing this card needs a matching ally color on the field.
    #[must_use]
    pub fn is_color_gated(&self) -> bool {
        !self.is_creature() && self.color != CardColor::Colorless
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creature_health_floor() {
        let template = CardTemplate::creature(TemplateId::new(1), "Wisp", 1, 0);
        assert_eq!(template.health, 1);
    }

    #[test]
    fn test_equipment_defaults_to_ally_target() {
        let shield = CardTemplate::equipment(
            TemplateId::new(2),
            "Aegis",
            EquipmentSpec { battle_shield: true, ..EquipmentSpec::default() },
        );

        assert!(shield.is_equipment());
        assert!(shield.is_battle_shield());
        assert_eq!(shield.target, TargetRequirement::Ally);
    }

    #[test]
    fn test_color_gating() {
        let red_spell = CardTemplate::spell(TemplateId::new(3), "Blaze", EffectKind::DamageTarget)
            .with_color(CardColor::Red);
        let red_unit = CardTemplate::creature(TemplateId::new(4), "Imp", 1, 1)
            .with_color(CardColor::Red);

        assert!(red_spell.is_color_gated());
        assert!(!red_unit.is_color_gated());
    }

    #[test]
    fn test_target_requirement_accepts() {
        assert!(TargetRequirement::Enemy.accepts(Side::Ally, Side::Enemy));
        assert!(TargetRequirement::Enemy.accepts(Side::Enemy, Side::Ally));
        assert!(!TargetRequirement::None.accepts(Side::Ally, Side::Ally));
    }

    #[test]
    fn test_template_serialization() {
        let template = CardTemplate::creature(TemplateId::new(5), "Sentinel", 0, 2)
            .with_role(Role::HealthAura)
            .taunt();

        let json = serde_json::to_string(&template).unwrap();
        let back: CardTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(template, back);
    }
}

//! Card system: templates, runtime copies, the catalog and board units.
//!
//! ## Key Types
//!
//! - `CardTemplate`: immutable authored card data
//! - `RuntimeCard`: one copy of a template with a unique id
//! - `CardCatalog`: template lookup, loaded once per session
//! - `UnitInstance`: a creature on the board with mutable combat state

pub mod catalog;
pub mod runtime;
pub mod template;
pub mod unit;

pub use catalog::CardCatalog;
pub use runtime::RuntimeCard;
pub use template::{
    CardColor, CardKind, CardTemplate, EquipmentSpec, Family, Role, TargetRequirement, Traits,
};
pub use unit::{EquipmentList, Evolution, UnitInstance};

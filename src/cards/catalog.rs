//! Card catalog for template lookup.
//!
//! The `CardCatalog` is read-only configuration supplied by the meta-game.
//! It is consulted when a battle is built (to turn deck lists and encounter
//! lists into runtime cards) and never mutated afterwards.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::runtime::RuntimeCard;
use super::template::CardTemplate;
use crate::core::{IdAllocator, SetupError, TemplateId};

/// Registry of card templates.
///
/// ## Example
///
/// ```
/// use ccg_battle::cards::{CardCatalog, CardTemplate};
/// use ccg_battle::core::TemplateId;
///
/// let mut catalog = CardCatalog::new();
/// catalog
///     .register(CardTemplate::creature(TemplateId::new(1), "Imp", 1, 1))
///     .unwrap();
///
/// assert_eq!(catalog.get(TemplateId::new(1)).unwrap().name, "Imp");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    templates: FxHashMap<TemplateId, Arc<CardTemplate>>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let templates: Vec<CardTemplate> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for template in templates {
            catalog.register(template)?;
        }
        Ok(catalog)
    }

    /// Register a template. Duplicate ids are rejected.
    pub fn register(&mut self, template: CardTemplate) -> Result<(), SetupError> {
        if self.templates.contains_key(&template.id) {
            return Err(SetupError::DuplicateTemplate(template.id));
        }
        self.templates.insert(template.id, Arc::new(template));
        Ok(())
    }

    /// Builder-style registration for tests and fixtures.
    pub fn with(mut self, template: CardTemplate) -> Result<Self, SetupError> {
        self.register(template)?;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, id: TemplateId) -> Option<&Arc<CardTemplate>> {
        self.templates.get(&id)
    }

    /// Find a template by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<CardTemplate>> {
        self.templates.values().find(|t| t.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterate over all templates in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardTemplate>> {
        let mut all: Vec<_> = self.templates.values().collect();
        all.sort_by_key(|t| t.id);
        all.into_iter()
    }

    /// Create a fresh runtime copy of a template.
    pub fn instantiate(
        &self,
        id: TemplateId,
        ids: &mut IdAllocator,
    ) -> Result<RuntimeCard, SetupError> {
        let template = self.get(id).ok_or(SetupError::UnknownTemplate(id))?;
        Ok(RuntimeCard::new(ids.card(), Arc::clone(template)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    fn sample() -> CardCatalog {
        CardCatalog::new()
            .with(CardTemplate::creature(TemplateId::new(1), "Imp", 1, 1))
            .and_then(|c| c.with(CardTemplate::creature(TemplateId::new(2), "Golem", 3, 5)))
            .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let catalog = sample();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(TemplateId::new(2)).unwrap().attack, 3);
        assert!(catalog.get(TemplateId::new(9)).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut catalog = sample();
        let err = catalog
            .register(CardTemplate::creature(TemplateId::new(1), "Other", 1, 1))
            .unwrap_err();
        assert!(matches!(err, SetupError::DuplicateTemplate(id) if id == TemplateId::new(1)));
    }

    #[test]
    fn test_find_by_name() {
        let catalog = sample();
        assert_eq!(catalog.find_by_name("Golem").unwrap().id, TemplateId::new(2));
        assert!(catalog.find_by_name("Dragon").is_none());
    }

    #[test]
    fn test_instantiate_allocates_unique_uids() {
        let catalog = sample();
        let mut ids = IdAllocator::new();
        let a = catalog.instantiate(TemplateId::new(1), &mut ids).unwrap();
        let b = catalog.instantiate(TemplateId::new(1), &mut ids).unwrap();
        assert_ne!(a.uid, b.uid);

        let missing = catalog.instantiate(TemplateId::new(42), &mut ids);
        assert!(matches!(missing, Err(SetupError::UnknownTemplate(_))));
    }

    #[test]
    fn test_from_json() {
        let templates = vec![
            CardTemplate::creature(TemplateId::new(1), "Imp", 1, 1),
            CardTemplate::creature(TemplateId::new(2), "Golem", 3, 5),
        ];
        let json = serde_json::to_string(&templates).unwrap();

        let catalog = CardCatalog::from_json(&json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(TemplateId::new(1)).unwrap().kind, CardKind::Creature);

        assert!(matches!(CardCatalog::from_json("not json"), Err(SetupError::Json(_))));
    }
}

//! Runtime card copies.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::template::CardTemplate;
use crate::core::{CardUid, TemplateId};

/// One physical copy of a card: a unique id paired with its template.
///
/// Two copies of the same template compare unequal because their uids differ.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuntimeCard {
    pub uid: CardUid,
    pub template: Arc<CardTemplate>,
}

impl RuntimeCard {
    #[must_use]
    pub fn new(uid: CardUid, template: Arc<CardTemplate>) -> Self {
        Self { uid, template }
    }

    #[must_use]
    pub fn template_id(&self) -> TemplateId {
        self.template.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.template.name
    }
}

impl PartialEq for RuntimeCard {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for RuntimeCard {}

impl std::fmt::Display for RuntimeCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.template.name, self.uid)
    }
}

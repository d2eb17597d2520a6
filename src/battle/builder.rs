//! Battle construction.

use super::engine::Battle;
use crate::cards::{CardCatalog, RuntimeCard};
use crate::core::{
    BattleConfig, BattleState, Encounter, Hero, SessionContext, SetupError, Side, TemplateId,
};
use crate::effects::EffectResolver;
use crate::stack::{EnemyActor, MoveDeck, TurnController};
use crate::triggers::Presenter;
use crate::zones::{Piles, SLOT_COUNT};

/// Builder for creating a [`Battle`].
///
/// ```
/// use ccg_battle::battle::BattleBuilder;
/// use ccg_battle::cards::{CardCatalog, CardTemplate};
/// use ccg_battle::core::{BattleConfig, Encounter, SessionContext, Side, TemplateId};
///
/// let catalog = CardCatalog::new()
///     .with(CardTemplate::creature(TemplateId::new(1), "Squire", 1, 2))
///     .unwrap();
///
/// let battle = BattleBuilder::new(catalog)
///     .session(SessionContext::new(40).with_deck([TemplateId::new(1)]))
///     .encounter(Encounter::new("Bandit", 15, 2))
///     .config(BattleConfig::new(9).with_opener(Side::Ally))
///     .build()
///     .unwrap();
///
/// assert_eq!(battle.state().piles.bench.len(), 1);
/// assert!(battle.phase().is_player_action());
/// ```
pub struct BattleBuilder {
    catalog: CardCatalog,
    session: SessionContext,
    encounter: Encounter,
    config: BattleConfig,
    presenter: Option<Box<dyn Presenter>>,
}

impl BattleBuilder {
    pub fn new(catalog: CardCatalog) -> Self {
        Self {
            catalog,
            session: SessionContext::default(),
            encounter: Encounter::default(),
            config: BattleConfig::default(),
            presenter: None,
        }
    }

    pub fn session(mut self, session: SessionContext) -> Self {
        self.session = session;
        self
    }

    pub fn encounter(mut self, encounter: Encounter) -> Self {
        self.encounter = encounter;
        self
    }

    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    /// Lay out both sides, flip for the opener and start the first turn.
    pub fn build(self) -> Result<Battle, SetupError> {
        self.validate()?;
        let Self { catalog, session, encounter, config, presenter } = self;

        let hero = Hero::new(encounter.name.clone(), encounter.health, encounter.health)
            .with_attack(encounter.attack);
        let mut state =
            BattleState::new(config, session, hero).with_catalog(catalog);

        // Player deck
        let deck_ids = state.session.deck.clone();
        let deck = instantiate_all(&mut state, &deck_ids)?;
        let hand_limit = state.config.hand_limit;
        state.piles = Piles::partition(deck, hand_limit, &mut state.rng);

        // Enemy row and hero moves
        if !encounter.moves.is_empty() {
            state.enemy_decks.insert(EnemyActor::Hero, MoveDeck::new(encounter.moves.clone()));
        }
        for card in instantiate_all(&mut state, &encounter.units)? {
            EffectResolver::summon(&mut state, Side::Enemy, card, false)
                .map_err(|_| SetupError::TooManyEnemies(encounter.units.len()))?;
        }

        let opener = TurnController::start_battle(&mut state);
        log::debug!("battle against {} started, {opener} opens", encounter.name);
        Ok(Battle::from_state(state, presenter))
    }

    /// Every template the battle can ever create must exist up front.
    fn validate(&self) -> Result<(), SetupError> {
        let encounter = &self.encounter;
        if encounter.units.len() > SLOT_COUNT {
            return Err(SetupError::TooManyEnemies(encounter.units.len()));
        }
        let unit_moves = encounter
            .units
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .flat_map(|template| template.moves.iter());
        let referenced = self
            .session
            .deck
            .iter()
            .chain(&encounter.units)
            .chain(&encounter.moves)
            .chain(unit_moves);

        for &id in referenced {
            if self.catalog.get(id).is_none() {
                return Err(SetupError::UnknownTemplate(id));
            }
        }
        Ok(())
    }
}

fn instantiate_all(
    state: &mut BattleState,
    templates: &[TemplateId],
) -> Result<Vec<RuntimeCard>, SetupError> {
    templates
        .iter()
        .map(|&id| state.catalog.instantiate(id, &mut state.ids))
        .collect()
}

use std::sync::Arc;

use models::CardDefinition;

use crate::CardInstanceId;

/// A card as it lives in a run deck, outside of any combat.
#[derive(Clone, Debug)]
pub struct DeckCard {
    pub card: Arc<CardDefinition>,
    pub upgraded: bool,
}

impl DeckCard {
    pub fn new(card: Arc<CardDefinition>) -> Self {
        Self {
            card,
            upgraded: false,
        }
    }

    pub fn upgraded(card: Arc<CardDefinition>) -> Self {
        Self {
            card,
            upgraded: true,
        }
    }

    pub fn definition(&self) -> &CardDefinition {
        resolve_definition(&self.card, self.upgraded)
    }
}

#[derive(Clone, Debug)]
pub struct CardInstance {
    pub id: CardInstanceId,
    pub base: Arc<CardDefinition>,
    pub upgraded: bool,
}

impl CardInstance {
    /// The definition currently in effect, i.e. the upgraded variant once upgraded.
    pub fn definition(&self) -> &CardDefinition {
        resolve_definition(&self.base, self.upgraded)
    }

    /// Catalog id of the card. Upgrades share the id of their base card.
    pub fn card_id(&self) -> &str {
        &self.base.id
    }

    pub fn can_upgrade(&self) -> bool {
        !self.upgraded && self.base.upgraded.is_some()
    }

    pub fn upgrade(&mut self) -> bool {
        if !self.can_upgrade() {
            return false;
        }
        self.upgraded = true;
        true
    }
}

impl std::fmt::Display for CardInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.definition(), self.id)
    }
}

fn resolve_definition(base: &Arc<CardDefinition>, upgraded: bool) -> &CardDefinition {
    match (&base.upgraded, upgraded) {
        (Some(upgrade), true) => upgrade,
        _ => base,
    }
}

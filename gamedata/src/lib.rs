//! Bundled card, enemy and potion catalogs.
//!
//! The JSON resources are embedded at compile time and parsed once on first access. Lists keep
//! catalog order so that seeded draws from them are reproducible.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use models::{
    CardDefinition, CardType, EncounterKind, EnemyTemplate, EnemyTier, PotionDefinition, Rarity,
};

const CARDS_JSON: &str = include_str!("../res/cards.json");
const ENEMIES_JSON: &str = include_str!("../res/enemies.json");
const POTIONS_JSON: &str = include_str!("../res/potions.json");

lazy_static! {
    pub static ref CARDS: Vec<Arc<CardDefinition>> = parser::parse_card_catalog(CARDS_JSON)
        .expect("bundled card catalog is valid")
        .into_iter()
        .map(Arc::new)
        .collect();
    pub static ref ENEMIES: Vec<Arc<EnemyTemplate>> = parser::parse_enemy_catalog(ENEMIES_JSON)
        .expect("bundled enemy catalog is valid")
        .into_iter()
        .map(Arc::new)
        .collect();
    pub static ref POTIONS: Vec<Arc<PotionDefinition>> =
        parser::parse_potion_catalog(POTIONS_JSON)
            .expect("bundled potion catalog is valid")
            .into_iter()
            .map(Arc::new)
            .collect();
    static ref CARD_BY_ID: HashMap<&'static str, Arc<CardDefinition>> =
        CARDS.iter().map(|c| (c.id.as_str(), c.clone())).collect();
    static ref ENEMY_BY_ID: HashMap<&'static str, Arc<EnemyTemplate>> =
        ENEMIES.iter().map(|e| (e.id.as_str(), e.clone())).collect();
    static ref POTION_BY_ID: HashMap<&'static str, Arc<PotionDefinition>> =
        POTIONS.iter().map(|p| (p.id.as_str(), p.clone())).collect();
}

pub fn card(id: &str) -> Option<Arc<CardDefinition>> {
    CARD_BY_ID.get(id).cloned()
}

pub fn enemy(id: &str) -> Option<Arc<EnemyTemplate>> {
    ENEMY_BY_ID.get(id).cloned()
}

pub fn potion(id: &str) -> Option<Arc<PotionDefinition>> {
    POTION_BY_ID.get(id).cloned()
}

/// The Wound status card, falling back to the built-in definition.
pub fn wound() -> Arc<CardDefinition> {
    card("wound").unwrap_or_else(|| Arc::new(CardDefinition::wound()))
}

/// Five Strikes, four Defends and a Bash.
pub fn starter_deck() -> Vec<Arc<CardDefinition>> {
    [("strike", 5), ("defend", 4), ("bash", 1)]
        .into_iter()
        .flat_map(|(id, count)| std::iter::repeat(card(id)).take(count))
        .flatten()
        .collect()
}

/// Cards that may be offered as a combat reward at `rarity`.
pub fn reward_pool(rarity: Rarity) -> Vec<Arc<CardDefinition>> {
    CARDS
        .iter()
        .filter(|c| c.rarity == rarity)
        .filter(|c| !matches!(c.rarity, Rarity::Basic | Rarity::Curse | Rarity::Special))
        .filter(|c| !matches!(c.card_type, CardType::Status | CardType::Curse))
        .cloned()
        .collect()
}

/// Enemies of `kind` available up to `act`, optionally restricted to one tier.
pub fn enemies_for(act: u32, kind: EncounterKind, tier: Option<EnemyTier>) -> Vec<Arc<EnemyTemplate>> {
    ENEMIES
        .iter()
        .filter(|e| e.kind == kind && e.act <= act)
        .filter(|e| tier.is_none() || e.tier == tier)
        .cloned()
        .collect()
}

/// Bosses of exactly `act`.
pub fn bosses_for(act: u32) -> Vec<Arc<EnemyTemplate>> {
    ENEMIES
        .iter()
        .filter(|e| e.kind == EncounterKind::Boss && e.act == act)
        .cloned()
        .collect()
}

use anyhow::Context;
use models::PassiveEffect;
use serde::Deserialize;

use crate::{DeckCard, Health, PlayerState};

fn one() -> u32 {
    1
}

fn default_energy() -> u32 {
    3
}

#[derive(Clone, Debug, Deserialize)]
pub struct CardEntry {
    pub id: String,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default)]
    pub upgraded: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlayerTemplate {
    pub hp: u32,
    #[serde(default, alias = "maxHp")]
    pub max_hp: Option<u32>,
    #[serde(default = "default_energy")]
    pub energy: u32,
    /// An empty list means the starter deck.
    #[serde(default)]
    pub cards: Vec<CardEntry>,
    #[serde(default)]
    pub potions: Vec<String>,
    #[serde(default)]
    pub passives: Vec<PassiveEffect>,
}

impl PlayerTemplate {
    pub fn create_player(&self) -> anyhow::Result<PlayerState> {
        let max_hp = self.max_hp.unwrap_or(self.hp);
        if self.hp == 0 {
            anyhow::bail!("player hp must be positive");
        }
        if self.hp > max_hp {
            anyhow::bail!("player hp {} exceeds max hp {max_hp}", self.hp);
        }
        let mut player = PlayerState::new(Health::new(self.hp, max_hp), self.energy);
        for id in &self.potions {
            let potion = gamedata::potion(id).with_context(|| format!("unknown potion {id}"))?;
            if !player.give_potion(potion) {
                anyhow::bail!("too many potions ({})", self.potions.len());
            }
        }
        Ok(player)
    }

    pub fn deck(&self) -> anyhow::Result<Vec<DeckCard>> {
        if self.cards.is_empty() {
            return Ok(gamedata::starter_deck()
                .into_iter()
                .map(DeckCard::new)
                .collect());
        }
        let mut deck = Vec::new();
        for entry in &self.cards {
            let card =
                gamedata::card(&entry.id).with_context(|| format!("unknown card {}", entry.id))?;
            if entry.upgraded && card.upgraded.is_none() {
                anyhow::bail!("card {} has no upgrade", entry.id);
            }
            for _ in 0..entry.count {
                deck.push(DeckCard {
                    card: card.clone(),
                    upgraded: entry.upgraded,
                });
            }
        }
        Ok(deck)
    }
}

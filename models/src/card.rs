use std::sync::Arc;

use heck::ToSnakeCase;

use crate::{Damage, Effect, Special};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Attack,
    Skill,
    Power,
    Status,
    Curse,
}

impl TryFrom<&str> for CardType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "attack" => Ok(CardType::Attack),
            "skill" => Ok(CardType::Skill),
            "power" => Ok(CardType::Power),
            "status" => Ok(CardType::Status),
            "curse" => Ok(CardType::Curse),
            ty => anyhow::bail!("invalid card type {ty}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Basic,
    Common,
    Uncommon,
    Rare,
    Special,
    Curse,
}

impl TryFrom<&str> for Rarity {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "basic" => Ok(Rarity::Basic),
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            "special" => Ok(Rarity::Special),
            "curse" => Ok(Rarity::Curse),
            rarity => anyhow::bail!("invalid rarity {rarity}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cost {
    Fixed(u32),
    /// Spends all remaining energy.
    X,
    Unplayable,
}

impl Cost {
    pub fn from_sentinel(value: i64) -> anyhow::Result<Self> {
        match value {
            -2 => Ok(Cost::Unplayable),
            -1 => Ok(Cost::X),
            n if n >= 0 => Ok(Cost::Fixed(n as u32)),
            n => anyhow::bail!("invalid cost {n}"),
        }
    }

    /// Energy this cost would consume given `energy` available, or `None` when it cannot be
    /// paid.
    pub fn payable(&self, energy: u32) -> Option<u32> {
        match self {
            Cost::Fixed(n) if *n <= energy => Some(*n),
            Cost::Fixed(_) | Cost::Unplayable => None,
            Cost::X => Some(energy),
        }
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cost::Fixed(n) => write!(f, "{n}"),
            Cost::X => write!(f, "X"),
            Cost::Unplayable => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targeting {
    SingleEnemy,
    AllEnemies,
    RandomEnemy,
    SelfOnly,
}

impl TryFrom<&str> for Targeting {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "single" | "single_enemy" | "enemy" => Ok(Targeting::SingleEnemy),
            "all" | "all_enemies" => Ok(Targeting::AllEnemies),
            "random" | "random_enemy" => Ok(Targeting::RandomEnemy),
            "self" | "self_only" | "none" => Ok(Targeting::SelfOnly),
            targeting => anyhow::bail!("invalid targeting {targeting}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardFlags {
    pub exhausts: bool,
    pub innate: bool,
    pub retained: bool,
    pub unplayable: bool,
    pub ethereal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardDefinition {
    pub id: String,
    pub name: String,
    pub card_type: CardType,
    pub rarity: Rarity,
    pub cost: Cost,
    pub damage: Option<Damage>,
    pub hits: u32,
    pub block: u32,
    pub targeting: Targeting,
    pub effects: Vec<Effect>,
    pub special: Option<Special>,
    pub flags: CardFlags,
    pub strength_multiplier: i32,
    pub draw: u32,
    pub energy_gain: u32,
    pub hp_cost: u32,
    pub upgraded: Option<Arc<CardDefinition>>,
}

impl CardDefinition {
    /// The status card shuffled into the draw pile at higher ascension levels.
    pub fn wound() -> Self {
        Self {
            id: "wound".to_string(),
            name: "Wound".to_string(),
            card_type: CardType::Status,
            rarity: Rarity::Curse,
            cost: Cost::Unplayable,
            damage: None,
            hits: 1,
            block: 0,
            targeting: Targeting::SelfOnly,
            effects: vec![],
            special: None,
            flags: CardFlags {
                unplayable: true,
                ..CardFlags::default()
            },
            strength_multiplier: 1,
            draw: 0,
            energy_gain: 0,
            hp_cost: 0,
            upgraded: None,
        }
    }

    pub fn is_playable(&self) -> bool {
        !self.flags.unplayable && self.cost != Cost::Unplayable
    }

    pub fn is_attack(&self) -> bool {
        self.card_type == CardType::Attack
    }

    pub fn grants_block(&self) -> bool {
        self.block > 0 || matches!(self.special, Some(Special::DoubleBlock))
    }

    /// Damage before modifiers across all hits; X-cost cards assume `energy` is spent.
    pub fn expected_damage(&self, energy: u32) -> u32 {
        let hits = match self.cost {
            Cost::X => self.hits * energy,
            _ => self.hits,
        };
        self.damage.map(|d| d.base() * hits).unwrap_or(0)
    }

    /// Rough value of a card used to pick between reward choices.
    pub fn reward_score(&self) -> u32 {
        self.expected_damage(3) + self.block + self.draw * 3 + self.energy_gain * 4
    }
}

impl std::fmt::Display for CardDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.cost)
    }
}

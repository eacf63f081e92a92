use heck::ToSnakeCase;

use crate::{Damage, Effect, Special};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Attack,
    AttackAndBuff,
    AttackAndDebuff,
    AttackAndDefend,
    Buff,
    Debuff,
    Defend,
    DefendAndBuff,
    StrongDebuff,
    Sleeping,
    Unknown,
}

impl Intent {
    pub fn is_attack(&self) -> bool {
        matches!(
            self,
            Intent::Attack | Intent::AttackAndBuff | Intent::AttackAndDebuff | Intent::AttackAndDefend
        )
    }
}

impl TryFrom<&str> for Intent {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(match value.to_snake_case().as_str() {
            "attack" => Intent::Attack,
            "attack_buff" => Intent::AttackAndBuff,
            "attack_debuff" => Intent::AttackAndDebuff,
            "attack_defend" => Intent::AttackAndDefend,
            "buff" => Intent::Buff,
            "debuff" => Intent::Debuff,
            "defend" => Intent::Defend,
            "defend_buff" => Intent::DefendAndBuff,
            "strong_debuff" => Intent::StrongDebuff,
            "sleeping" | "stun" => Intent::Sleeping,
            "unknown" => Intent::Unknown,
            intent => anyhow::bail!("invalid intent {intent}"),
        })
    }
}

/// A single enemy action. The effect list has the same shape as a card's.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub id: String,
    pub name: String,
    pub intent: Intent,
    pub damage: Option<Damage>,
    pub hits: u32,
    pub block: u32,
    pub effects: Vec<Effect>,
    pub special: Option<Special>,
}

impl Move {
    /// Telegraphed damage before any status math, as a player reads it off the intent.
    pub fn expected_damage(&self) -> u32 {
        self.damage.map(|d| d.base() * self.hits).unwrap_or(0)
    }
}

use heck::ToSnakeCase;

use crate::{Rarity, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotionTarget {
    Enemy,
    AllEnemies,
    Player,
}

impl TryFrom<&str> for PotionTarget {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "enemy" => Ok(PotionTarget::Enemy),
            "all_enemies" => Ok(PotionTarget::AllEnemies),
            "self" | "player" | "none" => Ok(PotionTarget::Player),
            target => anyhow::bail!("invalid potion target {target}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PotionEffect {
    Damage(u32),
    DamageAll(u32),
    Block(u32),
    Energy(u32),
    Heal(u32),
    Buff(StatusKind, i32),
    Debuff(StatusKind, i32),
    Draw(u32),
    DoubleTap(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PotionDefinition {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub target: PotionTarget,
    pub effect: PotionEffect,
}

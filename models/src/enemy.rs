use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

use crate::{AiPattern, HpRange, Move, StatusKind};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EncounterKind {
    #[default]
    Normal,
    Elite,
    Boss,
}

impl TryFrom<&str> for EncounterKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "normal" => Ok(EncounterKind::Normal),
            "elite" => Ok(EncounterKind::Elite),
            "boss" => Ok(EncounterKind::Boss),
            kind => anyhow::bail!("invalid encounter kind {kind}"),
        }
    }
}

impl std::fmt::Display for EncounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncounterKind::Normal => write!(f, "normal"),
            EncounterKind::Elite => write!(f, "elite"),
            EncounterKind::Boss => write!(f, "boss"),
        }
    }
}

/// Difficulty bucket used when rolling normal encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyTier {
    Weak,
    Medium,
    Strong,
}

impl TryFrom<&str> for EnemyTier {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "weak" => Ok(EnemyTier::Weak),
            "medium" => Ok(EnemyTier::Medium),
            "strong" => Ok(EnemyTier::Strong),
            tier => anyhow::bail!("invalid enemy tier {tier}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub kind: EncounterKind,
    pub act: u32,
    pub tier: Option<EnemyTier>,
    pub hp: HpRange,
    pub moveset: Vec<Move>,
    pub ai: AiPattern,
    pub spawn_count: u32,
    pub retain_block: bool,
    pub statuses: Vec<(StatusKind, i32)>,
}

impl EnemyTemplate {
    pub fn find_move(&self, id: &str) -> Option<&Move> {
        self.moveset.iter().find(|m| m.id == id)
    }

    /// Looks up a move by id, falling back to the first move of the moveset.
    pub fn move_or_first(&self, id: &str) -> Option<&Move> {
        self.find_move(id).or_else(|| self.moveset.first())
    }
}

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String")]
pub enum StatusKind {
    Vulnerable,
    Weak,
    Frail,
    Entangled,
    Strength,
    Dexterity,
    Metallicize,
    Artifact,
    Ritual,
    Enrage,
    Thorns,
    PlatedArmor,
    DemonForm,
    Barricade,
    Rage,
    FlameBarrier,
    Brutality,
    Combust,
    Juggernaut,
    Berserk,
    DoubleTap,
    /// Strength removed at the end of the owner's turn (Flex).
    LoseStrength,
    /// Strength given back at the end of the round (Dark Shackles).
    RegainStrength,
    /// Card draw effects do nothing until the end of the turn.
    NoDraw,
    FeelNoPain,
    DarkEmbrace,
    Rupture,
    Corruption,
    Evolve,
    FireBreathing,
}

impl StatusKind {
    /// Statuses that tick down by one at the owner's end of turn.
    pub fn decays(&self) -> bool {
        matches!(
            self,
            StatusKind::Vulnerable | StatusKind::Weak | StatusKind::Frail | StatusKind::Entangled
        )
    }

    /// Whether applying `amount` of this status counts as a debuff (and can be negated by
    /// Artifact).
    pub fn is_debuff(&self, amount: i32) -> bool {
        match self {
            StatusKind::Vulnerable
            | StatusKind::Weak
            | StatusKind::Frail
            | StatusKind::Entangled => true,
            StatusKind::Strength | StatusKind::Dexterity => amount < 0,
            _ => false,
        }
    }
}

impl TryFrom<&str> for StatusKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(match value.to_snake_case().as_str() {
            "vulnerable" => StatusKind::Vulnerable,
            "weak" => StatusKind::Weak,
            "frail" => StatusKind::Frail,
            "entangle" | "entangled" => StatusKind::Entangled,
            "strength" => StatusKind::Strength,
            "dexterity" => StatusKind::Dexterity,
            "metallicize" => StatusKind::Metallicize,
            "artifact" => StatusKind::Artifact,
            "ritual" => StatusKind::Ritual,
            "enrage" => StatusKind::Enrage,
            "thorns" => StatusKind::Thorns,
            "plated_armor" => StatusKind::PlatedArmor,
            "demon_form" => StatusKind::DemonForm,
            "barricade" => StatusKind::Barricade,
            "rage" => StatusKind::Rage,
            "flame_barrier" => StatusKind::FlameBarrier,
            "brutality" => StatusKind::Brutality,
            "combust" => StatusKind::Combust,
            "juggernaut" => StatusKind::Juggernaut,
            "berserk" => StatusKind::Berserk,
            "double_tap" => StatusKind::DoubleTap,
            "lose_strength" => StatusKind::LoseStrength,
            "regain_strength" => StatusKind::RegainStrength,
            "no_draw" => StatusKind::NoDraw,
            "feel_no_pain" => StatusKind::FeelNoPain,
            "dark_embrace" => StatusKind::DarkEmbrace,
            "rupture" => StatusKind::Rupture,
            "corruption" => StatusKind::Corruption,
            "evolve" => StatusKind::Evolve,
            "fire_breathing" => StatusKind::FireBreathing,
            other => anyhow::bail!("unknown status kind {other}"),
        })
    }
}

impl TryFrom<String> for StatusKind {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StatusKind::try_from(value.as_str())
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

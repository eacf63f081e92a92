use heck::ToSnakeCase;
use serde::Serialize;

use crate::TAG_WITH_AMOUNT;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PileKind {
    Draw,
    Hand,
    Discard,
}

impl TryFrom<&str> for PileKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_snake_case().as_str() {
            "draw" | "draw_pile" => Ok(PileKind::Draw),
            "hand" => Ok(PileKind::Hand),
            "discard" | "discard_pile" => Ok(PileKind::Discard),
            pile => anyhow::bail!("invalid pile {pile}"),
        }
    }
}

/// One-off card and move behaviours that do not fit the damage/block/effect shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Special {
    DamageEqualBlock,
    DoubleBlock,
    DoubleStrength,
    HpForEnergy { hp_loss: u32, energy: u32 },
    RetainAllBlock,
    RemoveStrength { amount: i32 },
    TempStrengthDown { amount: i32 },
    FlexStrength { amount: i32 },
    Metallicize { amount: i32 },
    StrengthEachTurn { amount: i32 },
    BlockPerAttack { amount: i32 },
    RetaliateOnHit { amount: i32 },
    HpForDraw,
    HpForAoeDamage { hp_loss: u32, damage: u32 },
    DamageOnBlock { amount: i32 },
    SelfVulnerableForEnergy { energy: i32 },
    DoubleNextAttack { count: i32 },
    Lifesteal,
    AddCopyToDiscard,
    AddCard { card: String, pile: PileKind, count: u32 },
    UpgradeInHand { all: bool },
    EndOfTurnDamage { amount: u32 },
    BonusIfVulnerable { energy: u32, draw: u32 },
    StrengthOnKill { amount: i32 },
    MaxHpOnKill { amount: u32 },
    HealLowestAlly { amount: u32 },
    /// Playable only while every other card in hand is an Attack.
    OnlyAttacksInHand,
    /// Extra base damage for each card named "Strike" in the combat deck.
    BonusPerStrike { per_strike: u32 },
    NoDrawThisTurn,
    StrengthIfAttacking { amount: i32 },
    BlockOnExhaust { amount: i32 },
    DrawOnExhaust { amount: i32 },
    StrengthOnSelfHpLoss { amount: i32 },
    ExhaustRandom,
    /// Skills cost 0 and exhaust for the rest of the combat.
    FreeSkillsExhaust,
    /// Energy gained when this card is exhausted.
    EnergyOnExhaust { amount: u32 },
    /// Exhausts every non-Attack in hand, gaining `block_each` per card.
    ExhaustNonAttacks { block_each: u32 },
    /// Exhausts the hand; base damage is multiplied by the cards exhausted.
    ExhaustHandForDamage,
    /// Base damage is multiplied by the Status and Curse cards in hand.
    DamagePerStatusInHand,
    DamagePerUpgrade,
    DrawOnStatus { amount: i32 },
    DamageOnStatusDraw { amount: i32 },
    HpLossWhenDrawn { amount: u32 },
    EnergyLossWhenDrawn { amount: u32 },
    /// End of turn in hand: lose 1 HP per card in hand.
    HpLossPerCardInHand,
    /// End of turn in hand: the player becomes Weak.
    WeakAtEndOfTurn { amount: i32 },
    /// Costs 1 less for each time the player lost HP this combat.
    CostReducedByHpLoss,
    /// Catalog tag with no handler. Resolves as a no-op.
    Unsupported(String),
}

impl Special {
    pub fn tag(&self) -> &str {
        match self {
            Special::DamageEqualBlock => "damageEqualBlock",
            Special::DoubleBlock => "doubleBlock",
            Special::DoubleStrength => "doubleStrength",
            Special::HpForEnergy { .. } => "hpForEnergy",
            Special::RetainAllBlock => "retainAllBlock",
            Special::RemoveStrength { .. } => "removeStrength",
            Special::TempStrengthDown { .. } => "tempStrengthDown",
            Special::FlexStrength { .. } => "flexStrength",
            Special::Metallicize { .. } => "metallicize",
            Special::StrengthEachTurn { .. } => "strengthEachTurn",
            Special::BlockPerAttack { .. } => "blockPerAttack",
            Special::RetaliateOnHit { .. } => "retaliateOnHit",
            Special::HpForDraw => "hpForDraw",
            Special::HpForAoeDamage { .. } => "hpForAoeDamage",
            Special::DamageOnBlock { .. } => "damageOnBlock",
            Special::SelfVulnerableForEnergy { .. } => "selfVulnForEnergy",
            Special::DoubleNextAttack { .. } => "doubleNextAttack",
            Special::Lifesteal => "lifesteal",
            Special::AddCopyToDiscard => "addCopyToDiscard",
            Special::AddCard { .. } => "addCard",
            Special::UpgradeInHand { .. } => "upgradeInHand",
            Special::EndOfTurnDamage { .. } => "endOfTurnDamage",
            Special::BonusIfVulnerable { .. } => "bonusIfVulnerable",
            Special::StrengthOnKill { .. } => "gainStrengthOnKill",
            Special::MaxHpOnKill { .. } => "killForMaxHp",
            Special::HealLowestAlly { .. } => "healAlly",
            Special::OnlyAttacksInHand => "onlyAttacks",
            Special::BonusPerStrike { .. } => "bonusPerStrike",
            Special::NoDrawThisTurn => "cantDraw",
            Special::StrengthIfAttacking { .. } => "strIfAttacking",
            Special::BlockOnExhaust { .. } => "blockOnExhaust",
            Special::DrawOnExhaust { .. } => "drawOnExhaust",
            Special::StrengthOnSelfHpLoss { .. } => "strengthOnSelfHpLoss",
            Special::ExhaustRandom => "exhaustRandom",
            Special::FreeSkillsExhaust => "freeSkillsExhaust",
            Special::EnergyOnExhaust { .. } => "gainEnergyOnExhaust",
            Special::ExhaustNonAttacks { .. } => "exhaustNonAttacksBlock",
            Special::ExhaustHandForDamage => "exhaustHandDamage",
            Special::DamagePerStatusInHand => "damagePerStatus",
            Special::DamagePerUpgrade => "multiUpgrade",
            Special::DrawOnStatus { .. } => "drawOnStatus",
            Special::DamageOnStatusDraw { .. } => "aoeOnStatus",
            Special::HpLossWhenDrawn { .. } => "painCurse",
            Special::EnergyLossWhenDrawn { .. } => "voidCard",
            Special::HpLossPerCardInHand => "regretCurse",
            Special::WeakAtEndOfTurn { .. } => "doubtCurse",
            Special::CostReducedByHpLoss => "costReduceOnHpLoss",
            Special::Unsupported(tag) => tag,
        }
    }

    /// Splits a catalog tag with a trailing number (`doubleNextAttacks2`) into its base tag and
    /// the number.
    pub fn split_tag(tag: &str) -> (String, Option<i32>) {
        match TAG_WITH_AMOUNT.captures(tag) {
            Some(captures) => (
                captures[1].to_string(),
                captures[2].parse::<i32>().ok(),
            ),
            None => (tag.to_string(), None),
        }
    }
}

impl std::fmt::Display for Special {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

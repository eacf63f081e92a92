//! Parsing shared by cards and enemy moves: damage values, status effects and special tags.

use models::{Damage, Effect, EffectTarget, PileKind, Special, StatusKind};
use serde_json::Value;

use crate::json::{to_u32, JsonValue};

/// `damage` may be a number, a `"min-max"` string or a `{ "min", "max" }` object.
pub fn parse_damage(value: &Value) -> anyhow::Result<Option<Damage>> {
    Ok(match value {
        Value::Null => None,
        Value::Number(_) => {
            let JsonValue(n) = JsonValue::<i64>::extract(value, &[])?;
            Some(Damage::Fixed(to_u32(n, "damage")?))
        }
        Value::String(s) => Some(Damage::try_from(s.as_str())?),
        Value::Object(_) => {
            let JsonValue(min) = JsonValue::<i64>::extract(value, &["min"])?;
            let JsonValue(max) = JsonValue::<i64>::extract(value, &["max"])?;
            Some(Damage::Range {
                min: to_u32(min, "damage.min")?,
                max: to_u32(max, "damage.max")?,
            })
        }
        other => anyhow::bail!("invalid damage {other}"),
    })
}

/// Parses an `effects` list. `default_target` applies to entries without `self` or `target`.
pub fn parse_effects(node: &Value, default_target: EffectTarget) -> anyhow::Result<Vec<Effect>> {
    let JsonValue(entries) = JsonValue::<Vec<Value>>::extract(node, &["effects"])?;
    entries
        .iter()
        .map(|entry| parse_effect(entry, default_target))
        .collect()
}

fn parse_effect(entry: &Value, default_target: EffectTarget) -> anyhow::Result<Effect> {
    let JsonValue(ty) = JsonValue::<String>::extract(entry, &["type"])?;
    let JsonValue(amount) = JsonValue::<i64>::extract(entry, &["amount"])?;
    let amount = i32::try_from(amount)?;
    let (status, amount) = match ty.as_str() {
        "strengthDown" => (StatusKind::Strength, -amount),
        "dexterityDown" => (StatusKind::Dexterity, -amount),
        other => (StatusKind::try_from(other)?, amount),
    };

    let JsonValue(on_self) = JsonValue::<bool>::extract(entry, &["self"])?;
    let JsonValue(target) = JsonValue::<Option<String>>::extract(entry, &["target"])?;
    let target = match (on_self, target.as_deref()) {
        (true, _) | (_, Some("self")) => EffectTarget::Source,
        (_, Some("player" | "enemy" | "opponent")) => EffectTarget::Opponent,
        (_, Some(other)) => anyhow::bail!("invalid effect target {other}"),
        (_, None) => default_target,
    };
    Ok(Effect {
        status,
        amount,
        target,
    })
}

fn field_or(node: &Value, field: &str, default: i64) -> anyhow::Result<i64> {
    JsonValue::<i64>::extract_or(node, &[field], default)
}

/// Maps a catalog `special` tag plus its payload fields on `node` to a [`Special`]. Tags without
/// a handler become [`Special::Unsupported`].
pub fn parse_special(tag: &str, node: &Value) -> anyhow::Result<Special> {
    let (base, suffix) = Special::split_tag(tag);
    let amount = |default: i64| -> anyhow::Result<i64> {
        let JsonValue(explicit) = JsonValue::<Option<i64>>::extract(node, &["amount"])?;
        Ok(explicit.or(suffix.map(i64::from)).unwrap_or(default))
    };
    let as_i32 = |n: i64| i32::try_from(n).map_err(anyhow::Error::from);

    Ok(match base.as_str() {
        "damageEqualBlock" => Special::DamageEqualBlock,
        "doubleBlock" => Special::DoubleBlock,
        "doubleStrength" => Special::DoubleStrength,
        "hpForEnergy" => Special::HpForEnergy {
            hp_loss: to_u32(field_or(node, "hpLoss", 3)?, "hpLoss")?,
            energy: to_u32(field_or(node, "energyGain", 2)?, "energyGain")?,
        },
        "retainAllBlock" => Special::RetainAllBlock,
        "removeStrength" => Special::RemoveStrength {
            amount: as_i32(field_or(node, "strengthReduction", 2)?)?,
        },
        "tempStrengthDown" => Special::TempStrengthDown {
            amount: as_i32(field_or(node, "strengthReduction", 9)?)?,
        },
        "flexStrength" => Special::FlexStrength {
            amount: as_i32(amount(2)?)?,
        },
        "metallicize" => Special::Metallicize {
            amount: as_i32(amount(3)?)?,
        },
        "strengthEachTurn" => Special::StrengthEachTurn {
            amount: as_i32(amount(2)?)?,
        },
        "blockPerAttack" => Special::BlockPerAttack {
            amount: as_i32(field_or(node, "rageBlock", 3)?)?,
        },
        "blockPerAttackEvolved" => Special::BlockPerAttack {
            amount: as_i32(field_or(node, "rageBlock", 5)?)?,
        },
        "retaliateOnHit" => Special::RetaliateOnHit {
            amount: as_i32(field_or(node, "thorns", 4)?)?,
        },
        "hpForDraw" => Special::HpForDraw,
        "hpForAoeDamage" | "combustStack" => Special::HpForAoeDamage {
            hp_loss: to_u32(field_or(node, "hpLoss", 1)?, "hpLoss")?,
            damage: to_u32(amount(5)?, "amount")?,
        },
        "damageOnBlock" => Special::DamageOnBlock {
            amount: as_i32(amount(5)?)?,
        },
        "selfVulnForEnergy" => Special::SelfVulnerableForEnergy {
            energy: as_i32(field_or(node, "energyGain", 1)?)?,
        },
        "doubleNextAttack" | "doubleNextAttacks" => Special::DoubleNextAttack {
            count: as_i32(amount(1)?)?,
        },
        "lifesteal" => Special::Lifesteal,
        "addCopyToDiscard" => Special::AddCopyToDiscard,
        "addWound" => add_card("wound", PileKind::Draw, 1),
        "addWoundsToHand" => add_card(
            "wound",
            PileKind::Hand,
            to_u32(field_or(node, "wounds", 2)?, "wounds")?,
        ),
        "addDaze" | "addDazed" => add_card("dazed", PileKind::Draw, 1),
        "addBurn" => add_card("burn", PileKind::Discard, to_u32(amount(1)?, "amount")?),
        "addBurns" => add_card("burn", PileKind::Discard, to_u32(amount(3)?, "amount")?),
        "addSlimed" => add_card("slimed", PileKind::Discard, to_u32(amount(1)?, "amount")?),
        "addCard" => {
            let JsonValue(card) = JsonValue::<String>::extract(node, &["cardId"])?;
            let JsonValue(pile) = JsonValue::<String>::extract(node, &["pile"])?;
            Special::AddCard {
                card,
                pile: PileKind::try_from(pile.as_str())?,
                count: to_u32(field_or(node, "count", 1)?, "count")?,
            }
        }
        "upgradeInHand" => {
            let JsonValue(all) = JsonValue::<bool>::extract(node, &["upgradeAll"])?;
            Special::UpgradeInHand { all }
        }
        "burnDamage" => Special::EndOfTurnDamage {
            amount: to_u32(field_or(node, "burnDamage", 2)?, "burnDamage")?,
        },
        "decayCurse" | "endOfTurnDamage" => Special::EndOfTurnDamage {
            amount: to_u32(amount(2)?, "amount")?,
        },
        "bonusIfVulnerable" => Special::BonusIfVulnerable { energy: 1, draw: 1 },
        "gainStrengthOnKill" => Special::StrengthOnKill {
            amount: as_i32(field_or(node, "strengthGain", 3)?)?,
        },
        "killForMaxHp" => Special::MaxHpOnKill {
            amount: to_u32(field_or(node, "maxHpGain", 3)?, "maxHpGain")?,
        },
        "healAlly" => Special::HealLowestAlly {
            amount: to_u32(field_or(node, "healAmount", 12)?, "healAmount")?,
        },
        "onlyAttacks" => Special::OnlyAttacksInHand,
        "bonusPerStrike" => Special::BonusPerStrike {
            per_strike: to_u32(amount(2)?, "amount")?,
        },
        "cantDraw" => Special::NoDrawThisTurn,
        "strIfAttacking" => Special::StrengthIfAttacking {
            amount: as_i32(amount(3)?)?,
        },
        "blockOnExhaust" => Special::BlockOnExhaust {
            amount: as_i32(amount(3)?)?,
        },
        "drawOnExhaust" => Special::DrawOnExhaust {
            amount: as_i32(amount(1)?)?,
        },
        "strengthOnSelfHpLoss" => Special::StrengthOnSelfHpLoss {
            amount: as_i32(amount(1)?)?,
        },
        "exhaustRandom" => Special::ExhaustRandom,
        "freeSkillsExhaust" => Special::FreeSkillsExhaust,
        "gainEnergyOnExhaust" => Special::EnergyOnExhaust {
            amount: to_u32(amount(2)?, "amount")?,
        },
        "exhaustNonAttacksBlock" => Special::ExhaustNonAttacks {
            block_each: to_u32(amount(5)?, "amount")?,
        },
        "severSoul" => Special::ExhaustNonAttacks { block_each: 0 },
        "exhaustHandDamage" => Special::ExhaustHandForDamage,
        "damagePerStatus" => Special::DamagePerStatusInHand,
        "multiUpgrade" => Special::DamagePerUpgrade,
        "drawOnStatus" => Special::DrawOnStatus {
            amount: as_i32(amount(1)?)?,
        },
        "aoeOnStatus" => Special::DamageOnStatusDraw {
            amount: as_i32(amount(6)?)?,
        },
        "painCurse" => Special::HpLossWhenDrawn { amount: 1 },
        "voidCard" => Special::EnergyLossWhenDrawn { amount: 1 },
        "regretCurse" => Special::HpLossPerCardInHand,
        "doubtCurse" => Special::WeakAtEndOfTurn { amount: 1 },
        "costReduceOnHpLoss" => Special::CostReducedByHpLoss,
        _ => Special::Unsupported(tag.to_string()),
    })
}

fn add_card(card: &str, pile: PileKind, count: u32) -> Special {
    Special::AddCard {
        card: card.to_string(),
        pile,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_suffix_becomes_amount() -> anyhow::Result<()> {
        let special = parse_special("doubleNextAttacks2", &json!({}))?;
        assert_eq!(special, Special::DoubleNextAttack { count: 2 });
        Ok(())
    }

    #[test]
    fn unknown_tag_is_unsupported() -> anyhow::Result<()> {
        let special = parse_special("exhaustToDraw", &json!({}))?;
        assert_eq!(special, Special::Unsupported("exhaustToDraw".to_string()));
        Ok(())
    }

    #[test]
    fn upgraded_tags_keep_their_suffix() -> anyhow::Result<()> {
        assert_eq!(
            parse_special("bonusPerStrike3", &json!({}))?,
            Special::BonusPerStrike { per_strike: 3 }
        );
        assert_eq!(
            parse_special("gainEnergyOnExhaust3", &json!({}))?,
            Special::EnergyOnExhaust { amount: 3 }
        );
        assert_eq!(
            parse_special("blockPerAttackEvolved", &json!({ "rageBlock": 7 }))?,
            Special::BlockPerAttack { amount: 7 }
        );
        Ok(())
    }

    #[test]
    fn sever_soul_exhausts_without_block() -> anyhow::Result<()> {
        let special = parse_special("severSoul", &json!({ "damage": 16 }))?;
        assert_eq!(special, Special::ExhaustNonAttacks { block_each: 0 });
        let special = parse_special("exhaustNonAttacksBlock", &json!({ "amount": 7 }))?;
        assert_eq!(special, Special::ExhaustNonAttacks { block_each: 7 });
        Ok(())
    }

    #[test]
    fn strength_down_is_negative_strength() -> anyhow::Result<()> {
        let node = json!({ "effects": [{ "type": "strengthDown", "amount": 2 }] });
        let effects = parse_effects(&node, EffectTarget::Opponent)?;
        assert_eq!(effects, vec![Effect::on_opponent(StatusKind::Strength, -2)]);
        Ok(())
    }

    #[test]
    fn damage_accepts_three_shapes() -> anyhow::Result<()> {
        assert_eq!(parse_damage(&json!(6))?, Some(Damage::Fixed(6)));
        assert_eq!(
            parse_damage(&json!("5-7"))?,
            Some(Damage::Range { min: 5, max: 7 })
        );
        assert_eq!(
            parse_damage(&json!({ "min": 2, "max": 4 }))?.map(|d| d.base()),
            Some(3)
        );
        assert_eq!(parse_damage(&Value::Null)?, None);
        Ok(())
    }
}

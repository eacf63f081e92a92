use models::{PotionDefinition, PotionEffect, PotionTarget, Rarity, StatusKind};
use serde_json::Value;

use crate::json::{to_u32, JsonValue};

pub fn parse_potion_catalog(json: &str) -> anyhow::Result<Vec<PotionDefinition>> {
    crate::catalog_entries(json, "potion")?
        .iter()
        .map(parse_potion)
        .collect()
}

pub fn parse_potion(node: &Value) -> anyhow::Result<PotionDefinition> {
    let JsonValue(id) = JsonValue::<String>::extract(node, &["id"])?;
    let JsonValue(name) = JsonValue::<String>::extract(node, &["name"])?;
    let JsonValue(rarity) = JsonValue::<String>::extract(node, &["rarity"])?;
    let JsonValue(target) = JsonValue::<String>::extract(node, &["target"])?;
    let JsonValue(effect) = JsonValue::<String>::extract(node, &["effect", "type"])?;
    let amount = |field: &str| -> anyhow::Result<i64> {
        let JsonValue(n) = JsonValue::<i64>::extract(node, &["effect", field])?;
        Ok(n)
    };
    let status = |field: &str| -> anyhow::Result<StatusKind> {
        let JsonValue(s) = JsonValue::<String>::extract(node, &["effect", field])?;
        StatusKind::try_from(s.as_str())
    };

    let effect = match effect.as_str() {
        "damage" => PotionEffect::Damage(to_u32(amount("amount")?, "amount")?),
        "damageAll" => PotionEffect::DamageAll(to_u32(amount("amount")?, "amount")?),
        "block" => PotionEffect::Block(to_u32(amount("amount")?, "amount")?),
        "energy" => PotionEffect::Energy(to_u32(amount("amount")?, "amount")?),
        "heal" => PotionEffect::Heal(to_u32(amount("amount")?, "amount")?),
        "draw" => PotionEffect::Draw(to_u32(amount("amount")?, "amount")?),
        "buff" => PotionEffect::Buff(status("buff")?, i32::try_from(amount("amount")?)?),
        "debuff" => PotionEffect::Debuff(status("debuff")?, i32::try_from(amount("amount")?)?),
        "doubleTap" => PotionEffect::DoubleTap(i32::try_from(amount("amount")?)?),
        other => anyhow::bail!("potion {id}: invalid effect {other}"),
    };

    Ok(PotionDefinition {
        rarity: Rarity::try_from(rarity.as_str())?,
        target: PotionTarget::try_from(target.as_str())?,
        id,
        name,
        effect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn buff_potion() -> anyhow::Result<()> {
        let potion = parse_potion(&json!({
            "id": "strength_potion", "name": "Strength Potion", "rarity": "common",
            "target": "self", "effect": { "type": "buff", "buff": "strength", "amount": 2 }
        }))?;
        assert_eq!(potion.target, PotionTarget::Player);
        assert_eq!(potion.effect, PotionEffect::Buff(StatusKind::Strength, 2));
        Ok(())
    }

    #[test]
    fn unknown_effect_is_rejected() {
        let result = parse_potion(&json!({
            "id": "fairy", "name": "Fairy", "rarity": "rare",
            "target": "self", "effect": { "type": "revive", "amount": 30 }
        }));
        assert!(result.is_err());
    }
}

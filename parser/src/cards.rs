use std::sync::Arc;

use models::{
    CardDefinition, CardFlags, CardType, Cost, EffectTarget, Rarity, Special, Targeting,
};
use serde_json::Value;

use crate::effects::{parse_damage, parse_effects, parse_special};
use crate::json::{to_u32, JsonValue};

pub fn parse_card_catalog(json: &str) -> anyhow::Result<Vec<CardDefinition>> {
    crate::catalog_entries(json, "card")?
        .iter()
        .map(parse_card)
        .collect()
}

/// Parses one card. An `upgradedVersion` object is overlaid on the base fields to build the
/// upgraded definition.
pub fn parse_card(node: &Value) -> anyhow::Result<CardDefinition> {
    let mut card = parse_card_fields(node)?;
    if let Some(overlay) = node.get("upgradedVersion").and_then(Value::as_object) {
        let mut merged = node.clone();
        if let Some(fields) = merged.as_object_mut() {
            fields.remove("upgradedVersion");
            for (key, value) in overlay {
                fields.insert(key.clone(), value.clone());
            }
        }
        let mut upgraded = parse_card_fields(&merged)
            .map_err(|e| anyhow::anyhow!("upgrade of {}: {e}", card.id))?;
        if !overlay.contains_key("name") {
            upgraded.name = format!("{}+", card.name);
        }
        card.upgraded = Some(Arc::new(upgraded));
    }
    Ok(card)
}

fn parse_cost(value: &Value) -> anyhow::Result<Cost> {
    match value {
        Value::String(s) if s.eq_ignore_ascii_case("x") => Ok(Cost::X),
        Value::Number(_) => {
            let JsonValue(n) = JsonValue::<i64>::extract(value, &[])?;
            Cost::from_sentinel(n)
        }
        other => anyhow::bail!("invalid cost {other}"),
    }
}

fn parse_card_fields(node: &Value) -> anyhow::Result<CardDefinition> {
    let JsonValue(id) = JsonValue::<String>::extract(node, &["id"])?;
    let with_id = |e: anyhow::Error| anyhow::anyhow!("card {id}: {e}");

    let JsonValue(name) = JsonValue::<String>::extract(node, &["name"]).map_err(with_id)?;
    let JsonValue(ty) = JsonValue::<String>::extract(node, &["type"]).map_err(with_id)?;
    let card_type = CardType::try_from(ty.as_str()).map_err(with_id)?;
    let JsonValue(rarity) =
        JsonValue::<Option<String>>::extract(node, &["rarity"]).map_err(with_id)?;
    let rarity = match rarity {
        Some(r) => Rarity::try_from(r.as_str()).map_err(with_id)?,
        None => Rarity::Common,
    };
    let cost = parse_cost(&node["cost"]).map_err(with_id)?;
    let damage = parse_damage(&node["damage"]).map_err(with_id)?;
    let hits = to_u32(JsonValue::<i64>::extract_or(node, &["hits"], 1)?, "hits")?;
    let block = to_u32(JsonValue::<i64>::extract_or(node, &["block"], 0)?, "block")?;
    let effects = parse_effects(node, EffectTarget::Opponent).map_err(with_id)?;

    let JsonValue(tag) = JsonValue::<Option<String>>::extract(node, &["special"])?;
    let special = tag
        .map(|tag| parse_special(&tag, node))
        .transpose()
        .map_err(with_id)?;

    let JsonValue(exhausts) = JsonValue::<bool>::extract(node, &["exhaust"])?;
    let JsonValue(innate) = JsonValue::<bool>::extract(node, &["innate"])?;
    let JsonValue(retained) = JsonValue::<bool>::extract(node, &["retain"])?;
    let JsonValue(unplayable) = JsonValue::<bool>::extract(node, &["unplayable"])?;
    let JsonValue(ethereal) = JsonValue::<bool>::extract(node, &["ethereal"])?;
    let flags = CardFlags {
        exhausts,
        innate,
        retained,
        unplayable: unplayable || cost == Cost::Unplayable,
        ethereal,
    };

    let strength_multiplier = i32::try_from(JsonValue::<i64>::extract_or(
        node,
        &["strengthMultiplier"],
        1,
    )?)?;
    let draw = to_u32(JsonValue::<i64>::extract_or(node, &["draw"], 0)?, "draw")?;
    let energy_gain = to_u32(JsonValue::<i64>::extract_or(node, &["energy"], 0)?, "energy")?;
    let hp_cost = to_u32(JsonValue::<i64>::extract_or(node, &["hpCost"], 0)?, "hpCost")?;

    let JsonValue(explicit_target) = JsonValue::<Option<String>>::extract(node, &["target"])?;
    let JsonValue(target_all) = JsonValue::<bool>::extract(node, &["targetAll"])?;
    let JsonValue(random_target) = JsonValue::<bool>::extract(node, &["randomTarget"])?;
    let targeting = match explicit_target {
        Some(t) => Targeting::try_from(t.as_str()).map_err(with_id)?,
        None if target_all => Targeting::AllEnemies,
        None if random_target => Targeting::RandomEnemy,
        None if card_type == CardType::Attack
            || effects.iter().any(|e| e.target == EffectTarget::Opponent)
            || matches!(
                special,
                Some(
                    Special::RemoveStrength { .. }
                        | Special::TempStrengthDown { .. }
                        | Special::StrengthIfAttacking { .. }
                )
            ) =>
        {
            Targeting::SingleEnemy
        }
        None => Targeting::SelfOnly,
    };

    Ok(CardDefinition {
        id,
        name,
        card_type,
        rarity,
        cost,
        damage,
        hits,
        block,
        targeting,
        effects,
        special,
        flags,
        strength_multiplier,
        draw,
        energy_gain,
        hp_cost,
        upgraded: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Damage, StatusKind};
    use serde_json::json;

    #[test]
    fn upgrade_overlays_base_fields() -> anyhow::Result<()> {
        let card = parse_card(&json!({
            "id": "bash", "name": "Bash", "type": "attack", "rarity": "basic", "cost": 2,
            "damage": 8, "effects": [{ "type": "vulnerable", "amount": 2 }],
            "upgradedVersion": { "damage": 10, "effects": [{ "type": "vulnerable", "amount": 3 }] }
        }))?;
        assert_eq!(card.targeting, Targeting::SingleEnemy);
        let upgraded = card.upgraded.as_deref().ok_or(anyhow::anyhow!("no upgrade"))?;
        assert_eq!(upgraded.name, "Bash+");
        assert_eq!(upgraded.damage, Some(Damage::Fixed(10)));
        assert_eq!(upgraded.cost, Cost::Fixed(2));
        assert_eq!(upgraded.effects[0].status, StatusKind::Vulnerable);
        assert_eq!(upgraded.effects[0].amount, 3);
        Ok(())
    }

    #[test]
    fn cost_sentinels() -> anyhow::Result<()> {
        let wound = parse_card(&json!({
            "id": "wound", "name": "Wound", "type": "status", "rarity": "curse", "cost": -2
        }))?;
        assert_eq!(wound.cost, Cost::Unplayable);
        assert!(!wound.is_playable());

        let whirlwind = parse_card(&json!({
            "id": "whirlwind", "name": "Whirlwind", "type": "attack", "cost": -1,
            "damage": 5, "targetAll": true
        }))?;
        assert_eq!(whirlwind.cost, Cost::X);
        assert_eq!(whirlwind.targeting, Targeting::AllEnemies);
        Ok(())
    }

    #[test]
    fn self_effects_target_nobody() -> anyhow::Result<()> {
        let inflame = parse_card(&json!({
            "id": "inflame", "name": "Inflame", "type": "power", "cost": 1,
            "effects": [{ "type": "strength", "amount": 2, "self": true }]
        }))?;
        assert_eq!(inflame.targeting, Targeting::SelfOnly);
        Ok(())
    }

    #[test]
    fn intent_reading_skills_need_a_target() -> anyhow::Result<()> {
        let spot_weakness = parse_card(&json!({
            "id": "spotWeakness", "name": "Spot Weakness", "type": "skill", "cost": 1,
            "special": "strIfAttacking", "amount": 3
        }))?;
        assert_eq!(spot_weakness.targeting, Targeting::SingleEnemy);
        assert_eq!(
            spot_weakness.special,
            Some(Special::StrengthIfAttacking { amount: 3 })
        );
        Ok(())
    }

    #[test]
    fn missing_type_is_an_error() {
        let result = parse_card(&json!({ "id": "broken", "name": "Broken", "cost": 1 }));
        assert!(result.is_err());
    }
}

use models::{
    AiPattern, EffectTarget, EncounterKind, EnemyTemplate, EnemyTier, HpRange, Intent, Move,
    StatusKind,
};
use serde_json::Value;

use crate::effects::{parse_damage, parse_effects, parse_special};
use crate::json::{to_u32, JsonValue};

pub fn parse_enemy_catalog(json: &str) -> anyhow::Result<Vec<EnemyTemplate>> {
    crate::catalog_entries(json, "enemy")?
        .iter()
        .map(parse_enemy)
        .collect()
}

/// `hp` is either a fixed number or a `{ "min", "max" }` range.
fn parse_hp(value: &Value) -> anyhow::Result<HpRange> {
    match value {
        Value::Number(_) => {
            let JsonValue(hp) = JsonValue::<i64>::extract(value, &[])?;
            Ok(HpRange::fixed(to_u32(hp, "hp")?))
        }
        Value::String(s) => HpRange::try_from(s.as_str()),
        Value::Object(_) => {
            let JsonValue(min) = JsonValue::<i64>::extract(value, &["min"])?;
            let JsonValue(max) = JsonValue::<i64>::extract(value, &["max"])?;
            let (min, max) = (to_u32(min, "hp.min")?, to_u32(max, "hp.max")?);
            if min > max {
                anyhow::bail!("hp range {min}-{max} is inverted");
            }
            Ok(HpRange { min, max })
        }
        other => anyhow::bail!("invalid hp {other}"),
    }
}

fn parse_move(node: &Value) -> anyhow::Result<Move> {
    let JsonValue(id) = JsonValue::<String>::extract(node, &["id"])?;
    let JsonValue(name) = JsonValue::<Option<String>>::extract(node, &["name"])?;
    let JsonValue(intent) = JsonValue::<String>::extract(node, &["intent"])?;
    let JsonValue(tag) = JsonValue::<Option<String>>::extract(node, &["special"])?;
    let special = tag.map(|tag| parse_special(&tag, node)).transpose()?;
    let hits_field = if node.get("times").is_some() { "times" } else { "hits" };

    Ok(Move {
        name: name.unwrap_or_else(|| id.clone()),
        intent: Intent::try_from(intent.as_str())?,
        damage: parse_damage(&node["damage"])?,
        hits: to_u32(JsonValue::<i64>::extract_or(node, &[hits_field], 1)?, "hits")?,
        block: to_u32(JsonValue::<i64>::extract_or(node, &["block"], 0)?, "block")?,
        // Move effects without a target buff the enemy itself.
        effects: parse_effects(node, EffectTarget::Source)?,
        special,
        id,
    })
}

fn parse_statuses(node: &Value) -> anyhow::Result<Vec<(StatusKind, i32)>> {
    let JsonValue(entries) = JsonValue::<Vec<Value>>::extract(node, &["statuses"])?;
    entries
        .iter()
        .map(|entry| {
            let JsonValue(ty) = JsonValue::<String>::extract(entry, &["type"])?;
            let JsonValue(amount) = JsonValue::<i64>::extract(entry, &["amount"])?;
            Ok((StatusKind::try_from(ty.as_str())?, i32::try_from(amount)?))
        })
        .collect()
}

pub fn parse_enemy(node: &Value) -> anyhow::Result<EnemyTemplate> {
    let JsonValue(id) = JsonValue::<String>::extract(node, &["id"])?;
    let with_id = |e: anyhow::Error| anyhow::anyhow!("enemy {id}: {e}");

    let JsonValue(name) = JsonValue::<String>::extract(node, &["name"]).map_err(with_id)?;
    let JsonValue(kind) = JsonValue::<Option<String>>::extract(node, &["kind"])?;
    let kind = kind
        .map(|k| EncounterKind::try_from(k.as_str()))
        .transpose()
        .map_err(with_id)?
        .unwrap_or_default();
    let JsonValue(tier) = JsonValue::<Option<String>>::extract(node, &["tier"])?;
    let tier = tier
        .map(|t| EnemyTier::try_from(t.as_str()))
        .transpose()
        .map_err(with_id)?;
    let act = to_u32(JsonValue::<i64>::extract_or(node, &["act"], 1)?, "act")?;
    let hp = parse_hp(&node["hp"]).map_err(with_id)?;

    let JsonValue(moves) = JsonValue::<Vec<Value>>::extract(node, &["moveset"])?;
    let moveset = moves
        .iter()
        .map(parse_move)
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(with_id)?;
    let Some(first) = moveset.first() else {
        anyhow::bail!("enemy {id} has an empty moveset");
    };

    let ai = match node.get("ai") {
        Some(ai) => serde_json::from_value::<AiPattern>(ai.clone())
            .map_err(|e| anyhow::anyhow!("enemy {id}: invalid ai: {e}"))?,
        None => AiPattern::fixed(first.id.clone()),
    };
    if let Some(unknown) = ai
        .referenced_moves()
        .into_iter()
        .find(|m| !moveset.iter().any(|mv| mv.id == *m))
    {
        anyhow::bail!("enemy {id}: ai references unknown move {unknown}");
    }

    let spawn_count = to_u32(
        JsonValue::<i64>::extract_or(node, &["spawnCount"], 1)?,
        "spawnCount",
    )?
    .max(1);
    let JsonValue(retain_block) = JsonValue::<bool>::extract(node, &["retainBlock"])?;
    let statuses = parse_statuses(node).map_err(with_id)?;

    Ok(EnemyTemplate {
        id,
        name,
        kind,
        act,
        tier,
        hp,
        moveset,
        ai,
        spawn_count,
        retain_block,
        statuses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Damage, Effect};
    use serde_json::json;

    fn cultist() -> Value {
        json!({
            "id": "cultist", "name": "Cultist", "kind": "normal", "tier": "medium", "act": 1,
            "hp": { "min": 48, "max": 54 },
            "moveset": [
                { "id": "incantation", "name": "Incantation", "intent": "buff",
                  "effects": [{ "type": "ritual", "amount": 3 }] },
                { "id": "darkStrike", "name": "Dark Strike", "intent": "attack", "damage": 6 }
            ],
            "ai": { "type": "onTurn", "turn": 0, "move": "incantation",
                    "otherwise": { "type": "fixed", "move": "darkStrike" } }
        })
    }

    #[test]
    fn parses_full_template() -> anyhow::Result<()> {
        let enemy = parse_enemy(&cultist())?;
        assert_eq!(enemy.hp, HpRange { min: 48, max: 54 });
        assert_eq!(enemy.tier, Some(EnemyTier::Medium));
        assert_eq!(enemy.spawn_count, 1);
        assert_eq!(
            enemy.moveset[0].effects,
            vec![Effect::on_source(StatusKind::Ritual, 3)]
        );
        assert_eq!(enemy.moveset[1].damage, Some(Damage::Fixed(6)));
        assert!(matches!(enemy.ai, AiPattern::OnTurn { turn: 0, .. }));
        Ok(())
    }

    #[test]
    fn missing_ai_uses_first_move() -> anyhow::Result<()> {
        let mut node = cultist();
        if let Some(fields) = node.as_object_mut() {
            fields.remove("ai");
        }
        let enemy = parse_enemy(&node)?;
        assert_eq!(enemy.ai, AiPattern::fixed("incantation"));
        Ok(())
    }

    #[test]
    fn unknown_move_reference_is_rejected() {
        let mut node = cultist();
        node["ai"] = json!({ "type": "fixed", "move": "summon" });
        assert!(parse_enemy(&node).is_err());
    }

    #[test]
    fn player_targeted_move_effects() -> anyhow::Result<()> {
        let mut node = cultist();
        node["moveset"][1]["effects"] = json!([{ "type": "weak", "amount": 1, "target": "player" }]);
        let enemy = parse_enemy(&node)?;
        assert_eq!(
            enemy.moveset[1].effects,
            vec![Effect::on_opponent(StatusKind::Weak, 1)]
        );
        Ok(())
    }
}

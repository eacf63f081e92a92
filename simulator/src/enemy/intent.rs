use models::{AiPattern, Move};

use crate::{Combatant, CombatRng, EnemyInstance};

/// Chooses the move `enemy` telegraphs on `turn` (0-based). `allies` is the whole encounter,
/// including `enemy` itself. Randomness comes only from `rng`; the same state and stream always
/// produce the same move. Ids missing from the moveset fall back to the first move.
pub fn select_move<'a>(
    enemy: &'a EnemyInstance,
    turn: u32,
    allies: &[EnemyInstance],
    rng: &mut CombatRng,
) -> Option<&'a Move> {
    let id = evaluate(&enemy.template.ai, enemy, turn, allies, rng);
    enemy.template.move_or_first(id)
}

fn evaluate<'a>(
    pattern: &'a AiPattern,
    enemy: &EnemyInstance,
    turn: u32,
    allies: &[EnemyInstance],
    rng: &mut CombatRng,
) -> &'a str {
    match pattern {
        AiPattern::Fixed { move_id } => move_id,
        AiPattern::OnTurn {
            turn: on,
            move_id,
            otherwise,
        } => match turn == *on {
            true => move_id,
            false => evaluate(otherwise, enemy, turn, allies, rng),
        },
        AiPattern::BeforeTurn {
            turn: before,
            move_id,
            otherwise,
        } => match turn < *before {
            true => move_id,
            false => evaluate(otherwise, enemy, turn, allies, rng),
        },
        AiPattern::Cycle { moves, offset } => {
            if moves.is_empty() {
                return "";
            }
            let index = (turn as i64 - *offset as i64).rem_euclid(moves.len() as i64);
            &moves[index as usize]
        }
        AiPattern::Weighted { choices, otherwise } => {
            let roll = rng.next_f64();
            let last = enemy.last_move.as_deref();
            choices
                .iter()
                .find(|c| roll < c.threshold && !(c.avoid_repeat && last == Some(&*c.move_id)))
                .map(|c| c.move_id.as_str())
                .unwrap_or_else(|| evaluate(otherwise, enemy, turn, allies, rng))
        }
        AiPattern::NoRepeat {
            move_id,
            instead,
            pattern,
        } => {
            let chosen = evaluate(pattern, enemy, turn, allies, rng);
            match chosen == move_id && enemy.last_move.as_deref() == Some(move_id.as_str()) {
                true => instead,
                false => chosen,
            }
        }
        AiPattern::SpawnParity { even, odd } => match enemy.spawn_index % 2 == 0 {
            true => evaluate(even, enemy, turn, allies, rng),
            false => evaluate(odd, enemy, turn, allies, rng),
        },
        AiPattern::BelowHalfHp {
            move_id,
            once,
            otherwise,
        } => {
            let spent = *once && enemy.used_moves.iter().any(|m| m == move_id);
            match enemy.health.below_half() && !spent {
                true => move_id,
                false => evaluate(otherwise, enemy, turn, allies, rng),
            }
        }
        AiPattern::AllyBelowHalf { move_id, otherwise } => {
            let wounded = allies.iter().any(|a| {
                a.spawn_index != enemy.spawn_index && a.is_alive() && a.health.below_half()
            });
            match wounded {
                true => move_id,
                false => evaluate(otherwise, enemy, turn, allies, rng),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use models::{
        AiPattern, EncounterKind, EnemyTemplate, HpRange, Intent, Move, WeightedChoice,
    };

    use super::*;

    fn attack(id: &str) -> Move {
        Move {
            id: id.to_string(),
            name: id.to_string(),
            intent: Intent::Attack,
            damage: None,
            hits: 1,
            block: 0,
            effects: vec![],
            special: None,
        }
    }

    fn enemy(ai: AiPattern, hp: u32, spawn_index: usize) -> EnemyInstance {
        let template = EnemyTemplate {
            id: "dummy".to_string(),
            name: "Dummy".to_string(),
            kind: EncounterKind::Normal,
            act: 1,
            tier: None,
            hp: HpRange::fixed(hp),
            moveset: vec![attack("a"), attack("b"), attack("c")],
            ai,
            spawn_count: 1,
            retain_block: false,
            statuses: vec![],
        };
        EnemyInstance::new(Arc::new(template), hp, spawn_index)
    }

    fn pick(e: &EnemyInstance, turn: u32, allies: &[EnemyInstance]) -> String {
        let mut rng = CombatRng::from_seed(11);
        select_move(e, turn, allies, &mut rng)
            .map(|m| m.id.clone())
            .unwrap_or_default()
    }

    #[test]
    fn on_turn_then_cycle() {
        let ai = AiPattern::OnTurn {
            turn: 0,
            move_id: "a".to_string(),
            otherwise: Box::new(AiPattern::Cycle {
                moves: vec!["b".to_string(), "c".to_string()],
                offset: 1,
            }),
        };
        let e = enemy(ai, 40, 0);
        let picks: Vec<String> = (0..5).map(|t| pick(&e, t, &[])).collect();
        assert_eq!(picks, ["a", "b", "c", "b", "c"]);
    }

    #[test]
    fn unknown_move_falls_back_to_first() {
        let e = enemy(AiPattern::fixed("missing"), 40, 0);
        assert_eq!(pick(&e, 0, &[]), "a");
    }

    #[test]
    fn weighted_respects_avoid_repeat() {
        let ai = AiPattern::Weighted {
            choices: vec![WeightedChoice {
                threshold: 1.0,
                move_id: "b".to_string(),
                avoid_repeat: true,
            }],
            otherwise: Box::new(AiPattern::fixed("c")),
        };
        let mut e = enemy(ai, 40, 0);
        assert_eq!(pick(&e, 1, &[]), "b");
        e.record_move("b");
        assert_eq!(pick(&e, 2, &[]), "c");
    }

    #[test]
    fn no_repeat_substitutes() {
        let ai = AiPattern::NoRepeat {
            move_id: "a".to_string(),
            instead: "b".to_string(),
            pattern: Box::new(AiPattern::fixed("a")),
        };
        let mut e = enemy(ai, 40, 0);
        assert_eq!(pick(&e, 0, &[]), "a");
        e.record_move("a");
        assert_eq!(pick(&e, 1, &[]), "b");
    }

    #[test]
    fn spawn_parity_and_below_half() {
        let parity = AiPattern::SpawnParity {
            even: Box::new(AiPattern::fixed("a")),
            odd: Box::new(AiPattern::fixed("b")),
        };
        assert_eq!(pick(&enemy(parity.clone(), 40, 0), 0, &[]), "a");
        assert_eq!(pick(&enemy(parity, 40, 1), 0, &[]), "b");

        let split = AiPattern::BelowHalfHp {
            move_id: "c".to_string(),
            once: true,
            otherwise: Box::new(AiPattern::fixed("a")),
        };
        let mut e = enemy(split, 40, 0);
        e.health = crate::Health::new(10, 40);
        assert_eq!(pick(&e, 0, &[]), "c");
        e.record_move("c");
        assert_eq!(pick(&e, 1, &[]), "a");
    }

    #[test]
    fn ally_below_half_ignores_self() {
        let ai = AiPattern::AllyBelowHalf {
            move_id: "c".to_string(),
            otherwise: Box::new(AiPattern::fixed("a")),
        };
        let mut me = enemy(ai, 40, 0);
        me.health = crate::Health::new(5, 40);
        let mut ally = enemy(AiPattern::fixed("a"), 40, 1);
        assert_eq!(pick(&me, 0, &[me.clone(), ally.clone()]), "a");
        ally.health = crate::Health::new(5, 40);
        assert_eq!(pick(&me, 0, &[me.clone(), ally]), "c");
    }
}

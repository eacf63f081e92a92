//! Encounter tables used by simulated runs.

use std::sync::Arc;

use models::{EncounterKind, EnemyTemplate, EnemyTier};

use crate::CombatRng;

const FLOORS_PER_ACT_TABLE: u32 = 15;

/// (single, double) probabilities for normal encounters; the rest are multi-enemy fights.
fn group_chances(act: u32, floor_in_act: u32) -> (f64, f64) {
    let (mut single, mut double) = match act {
        1 => (0.50, 0.35),
        2 => (0.45, 0.35),
        _ => (0.40, 0.35),
    };
    if floor_in_act <= 5 {
        single += 0.15;
        double -= 0.10;
    }
    if floor_in_act >= 11 {
        single -= 0.10;
        double += 0.05;
    }
    (single, double)
}

fn pick(pool: &[Arc<EnemyTemplate>], rng: &mut CombatRng) -> Option<Arc<EnemyTemplate>> {
    rng.pick(pool).cloned()
}

fn or_else(pool: Vec<Arc<EnemyTemplate>>, fallback: &[Arc<EnemyTemplate>]) -> Vec<Arc<EnemyTemplate>> {
    match pool.is_empty() {
        true => fallback.to_vec(),
        false => pool,
    }
}

/// Rolls the enemies of one hallway or elite fight on `floor` (1-based) of `act`.
pub fn roll_encounter(
    act: u32,
    floor: u32,
    elite: bool,
    rng: &mut CombatRng,
) -> Vec<Arc<EnemyTemplate>> {
    if elite {
        return roll_elite(act, rng);
    }

    let floor_in_act = ((floor.max(1) - 1) % FLOORS_PER_ACT_TABLE) + 1;
    let early = floor_in_act <= 5;
    let late = floor_in_act >= 11;
    let (single, double) = group_chances(act, floor_in_act);

    let all = gamedata::enemies_for(act, EncounterKind::Normal, None);
    let weak = gamedata::enemies_for(act, EncounterKind::Normal, Some(EnemyTier::Weak));
    let medium = gamedata::enemies_for(act, EncounterKind::Normal, Some(EnemyTier::Medium));
    let strong = gamedata::enemies_for(act, EncounterKind::Normal, Some(EnemyTier::Strong));

    let roll = rng.next_f64();
    if roll < single {
        let pool = if early && act == 1 {
            [weak.as_slice(), medium.as_slice()].concat()
        } else if late {
            [strong.as_slice(), medium.as_slice()].concat()
        } else {
            all.clone()
        };
        return pick(&or_else(pool, &all), rng).into_iter().collect();
    }

    if roll < single + double {
        let pool = if (early || rng.next_f64() < 0.7) && !weak.is_empty() {
            weak
        } else if !medium.is_empty() {
            medium
        } else {
            all.iter()
                .filter(|e| e.tier != Some(EnemyTier::Strong))
                .cloned()
                .collect()
        };
        return pick(&or_else(pool, &all), rng)
            .map(|enemy| vec![enemy.clone(), enemy])
            .unwrap_or_default();
    }

    if weak.is_empty() {
        return pick(&or_else(medium, &all), rng)
            .map(|enemy| vec![enemy.clone(), enemy])
            .unwrap_or_default();
    }
    let count = match early {
        true => 2,
        false => (rng.next_f64() * 2.0).floor() as usize + 2,
    };
    (0..count).filter_map(|_| pick(&weak, rng)).collect()
}

/// Elites prefer the current act and spawn `spawn_count` copies.
fn roll_elite(act: u32, rng: &mut CombatRng) -> Vec<Arc<EnemyTemplate>> {
    let available = gamedata::enemies_for(act, EncounterKind::Elite, None);
    let current: Vec<_> = available.iter().filter(|e| e.act == act).cloned().collect();
    let Some(elite) = pick(&or_else(current, &available), rng) else {
        return vec![];
    };
    std::iter::repeat_n(elite.clone(), elite.spawn_count.max(1) as usize).collect()
}

/// One boss of `act`, falling back to the highest earlier act that has bosses.
pub fn roll_boss(act: u32, rng: &mut CombatRng) -> Vec<Arc<EnemyTemplate>> {
    let pool = (1..=act.max(1))
        .rev()
        .map(gamedata::bosses_for)
        .find(|bosses| !bosses.is_empty())
        .unwrap_or_default();
    pick(&pool, rng).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chances_shift_with_floor() {
        let (single, double) = group_chances(1, 3);
        assert!((single - 0.65).abs() < 1e-9);
        assert!((double - 0.25).abs() < 1e-9);
        let (single, double) = group_chances(2, 12);
        assert!((single - 0.35).abs() < 1e-9);
        assert!((double - 0.40).abs() < 1e-9);
        assert_eq!(group_chances(3, 8), (0.40, 0.35));
    }

    #[test]
    fn encounters_are_never_empty() {
        let mut rng = CombatRng::from_seed(5);
        for act in 1..=4 {
            for floor in 1..=15 {
                let enemies = roll_encounter(act, floor, false, &mut rng);
                assert!(!enemies.is_empty(), "act {act} floor {floor}");
                assert!(enemies.iter().all(|e| e.kind == EncounterKind::Normal && e.act <= act));
            }
        }
    }

    #[test]
    fn elites_spawn_copies() {
        let mut rng = CombatRng::from_seed(5);
        for _ in 0..20 {
            let enemies = roll_elite(1, &mut rng);
            assert_eq!(enemies.len(), enemies[0].spawn_count as usize);
            assert!(enemies.iter().all(|e| e.kind == EncounterKind::Elite && e.act == 1));
        }
    }

    #[test]
    fn bosses_fall_back_to_earlier_acts() {
        let mut rng = CombatRng::from_seed(5);
        let act_one = roll_boss(1, &mut rng);
        assert_eq!(act_one.len(), 1);
        assert_eq!(act_one[0].act, 1);
        let act_four = roll_boss(4, &mut rng);
        assert_eq!(act_four.len(), 1);
        assert_eq!(act_four[0].act, 3);
    }
}

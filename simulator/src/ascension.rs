use models::{AscensionProfile, EncounterKind, StatusKind};

use crate::EnemyInstance;

const BOSS_HP_MULTIPLIER: f64 = 1.05;

/// Scales a freshly spawned enemy for `level`. Levels outside 0..=10 behave like level 0.
pub fn apply_ascension(
    mut enemy: EnemyInstance,
    level: i64,
    kind: EncounterKind,
) -> EnemyInstance {
    let profile = AscensionProfile::for_level(level);
    enemy.health = enemy.health.scaled(profile.enemy_hp_multiplier);
    match kind {
        EncounterKind::Elite if profile.elite_buffed => {
            enemy.statuses.add(StatusKind::Strength, 1);
        }
        EncounterKind::Boss if profile.boss_buffed => {
            enemy.statuses.add(StatusKind::Strength, 1);
            enemy.health = enemy.health.scaled(BOSS_HP_MULTIPLIER);
        }
        _ => {}
    }
    enemy.damage_multiplier = profile.enemy_damage_multiplier;
    enemy
}

pub fn should_add_wound(level: i64) -> bool {
    AscensionProfile::for_level(level).start_with_wound
}

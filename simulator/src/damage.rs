use models::StatusKind;

use crate::{FRAIL_FACTOR, Statuses, VULNERABLE_FACTOR, WEAK_FACTOR};

/// Attack damage after Strength, Weak and Vulnerable, never negative.
///
/// `vulnerable_bonus` is added to the Vulnerable factor and comes from relics on the
/// attacking side.
pub fn calculate_damage(
    base: u32,
    strength_multiplier: i32,
    attacker: &Statuses,
    defender: &Statuses,
    vulnerable_bonus: f64,
) -> u32 {
    let strength = attacker.get(StatusKind::Strength) * strength_multiplier;
    let mut damage = base as f64 + strength as f64;
    if attacker.has(StatusKind::Weak) {
        damage = (damage * *WEAK_FACTOR).floor();
    }
    if defender.has(StatusKind::Vulnerable) {
        damage = (damage * (*VULNERABLE_FACTOR + vulnerable_bonus)).floor();
    }
    damage.max(0.0) as u32
}

/// Ascension damage scaling, applied after every other modifier.
pub fn scale_enemy_damage(damage: u32, multiplier: f64) -> u32 {
    (damage as f64 * multiplier).floor() as u32
}

/// Block after Dexterity and Frail, never negative.
pub fn calculate_block(base: u32, owner: &Statuses) -> u32 {
    let mut block = base as f64 + owner.get(StatusKind::Dexterity) as f64;
    if owner.has(StatusKind::Frail) {
        block = (block * *FRAIL_FACTOR).floor();
    }
    block.max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn statuses(entries: &[(StatusKind, i32)]) -> Statuses {
        entries.iter().copied().collect()
    }

    #[rstest]
    #[case(&[], &[], 6, 6)]
    #[case(&[(StatusKind::Strength, 3)], &[], 6, 9)]
    #[case(&[(StatusKind::Weak, 1)], &[], 6, 4)]
    #[case(&[], &[(StatusKind::Vulnerable, 1)], 6, 9)]
    #[case(&[(StatusKind::Weak, 1)], &[(StatusKind::Vulnerable, 2)], 7, 7)]
    #[case(&[(StatusKind::Strength, -9)], &[], 6, 0)]
    fn damage_modifiers(
        #[case] attacker: &[(StatusKind, i32)],
        #[case] defender: &[(StatusKind, i32)],
        #[case] base: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(
            calculate_damage(base, 1, &statuses(attacker), &statuses(defender), 0.0),
            expected
        );
    }

    #[test]
    fn strength_multiplier_and_relic_bonus() {
        let attacker = statuses(&[(StatusKind::Strength, 2)]);
        let defender = statuses(&[(StatusKind::Vulnerable, 1)]);
        assert_eq!(calculate_damage(14, 3, &attacker, &Statuses::default(), 0.0), 20);
        assert_eq!(calculate_damage(10, 1, &attacker, &defender, 0.25), 21);
    }

    #[rstest]
    #[case(&[], 5, 5)]
    #[case(&[(StatusKind::Dexterity, 2)], 5, 7)]
    #[case(&[(StatusKind::Frail, 1)], 5, 3)]
    #[case(&[(StatusKind::Dexterity, -8)], 5, 0)]
    fn block_modifiers(
        #[case] owner: &[(StatusKind, i32)],
        #[case] base: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(calculate_block(base, &statuses(owner)), expected);
    }

    #[test]
    fn enemy_scaling_floors() {
        assert_eq!(scale_enemy_damage(11, 1.1), 12);
        assert_eq!(scale_enemy_damage(6, 1.0), 6);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscensionProfile {
    pub level: u8,
    pub enemy_hp_multiplier: f64,
    pub enemy_damage_multiplier: f64,
    pub elite_buffed: bool,
    pub boss_buffed: bool,
    pub start_with_wound: bool,
    pub reduced_healing: bool,
    pub reduced_gold: bool,
    pub fewer_card_rewards: bool,
    pub start_with_curse: bool,
}

pub const MAX_ASCENSION: u8 = 10;

const BASE: AscensionProfile = AscensionProfile {
    level: 0,
    enemy_hp_multiplier: 1.0,
    enemy_damage_multiplier: 1.0,
    elite_buffed: false,
    boss_buffed: false,
    start_with_wound: false,
    reduced_healing: false,
    reduced_gold: false,
    fewer_card_rewards: false,
    start_with_curse: false,
};

const A1: AscensionProfile = AscensionProfile { level: 1, enemy_hp_multiplier: 1.1, ..BASE };
const A2: AscensionProfile = AscensionProfile { level: 2, start_with_wound: true, ..A1 };
const A3: AscensionProfile = AscensionProfile { level: 3, elite_buffed: true, ..A2 };
const A4: AscensionProfile = AscensionProfile { level: 4, reduced_healing: true, ..A3 };
const A5: AscensionProfile = AscensionProfile { level: 5, boss_buffed: true, ..A4 };
const A6: AscensionProfile = AscensionProfile { level: 6, reduced_gold: true, ..A5 };
const A7: AscensionProfile = AscensionProfile { level: 7, enemy_hp_multiplier: 1.2, ..A6 };
const A8: AscensionProfile = AscensionProfile { level: 8, fewer_card_rewards: true, ..A7 };
const A9: AscensionProfile = AscensionProfile { level: 9, start_with_curse: true, ..A8 };
const A10: AscensionProfile = AscensionProfile { level: 10, enemy_damage_multiplier: 1.1, ..A9 };

pub static ASCENSION_PROFILES: [AscensionProfile; 11] =
    [BASE, A1, A2, A3, A4, A5, A6, A7, A8, A9, A10];

impl AscensionProfile {
    /// Profile for `level`. Anything outside 0..=10 behaves like level 0.
    pub fn for_level(level: i64) -> &'static AscensionProfile {
        usize::try_from(level)
            .ok()
            .and_then(|l| ASCENSION_PROFILES.get(l))
            .unwrap_or(&ASCENSION_PROFILES[0])
    }

    pub fn starting_gold(&self) -> u32 {
        if self.reduced_gold { 75 } else { 99 }
    }

    pub fn rest_heal_fraction(&self) -> f64 {
        if self.reduced_healing { 0.25 } else { 0.30 }
    }

    pub fn card_reward_count(&self) -> usize {
        if self.fewer_card_rewards { 2 } else { 3 }
    }
}

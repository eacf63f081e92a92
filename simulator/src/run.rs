use std::sync::Arc;

use indexmap::IndexMap;
use models::{AscensionProfile, CardDefinition, EncounterKind, EnemyTemplate, Rarity};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    BETWEEN_ACT_HEAL, CombatOptions, CombatResult, CombatRng, DeckCard, EnemySpawn, Health,
    PlayerState, RunConfig, roll_boss, roll_encounter, simulate_combat,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatOutcome {
    Victory,
    Defeat,
    Timeout,
}

/// One fight of a run, without its log.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatSummary {
    pub act: u32,
    pub floor: u32,
    pub kind: EncounterKind,
    pub enemies: Vec<String>,
    pub outcome: CombatOutcome,
    pub turns_played: u32,
    pub damage_dealt: u32,
    pub damage_received: u32,
    pub hp_remaining: u32,
    pub cards_played: u32,
    pub card_play_frequency: IndexMap<String, u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub seed: u64,
    pub survived: bool,
    pub floors_cleared: u32,
    pub acts_completed: u32,
    pub final_hp: u32,
    pub max_hp: u32,
    pub ascension: i64,
    pub starting_gold: u32,
    pub deck_size: usize,
    pub combats: Vec<CombatSummary>,
}

impl RunOutcome {
    /// The fight that ended a lost run.
    pub fn fatal_combat(&self) -> Option<&CombatSummary> {
        match self.survived {
            true => None,
            false => self.combats.last(),
        }
    }
}

/// Chance bands of the card reward rarity roll.
fn reward_rarity(roll: f64) -> Rarity {
    if roll < 0.6 {
        Rarity::Common
    } else if roll < 0.9 {
        Rarity::Uncommon
    } else {
        Rarity::Rare
    }
}

/// Offers `choices` distinct cards of a rolled rarity and keeps the best scoring one.
fn card_reward(choices: usize, rng: &mut CombatRng) -> Option<Arc<CardDefinition>> {
    let mut pool = gamedata::reward_pool(reward_rarity(rng.next_f64()));
    rng.shuffle(&mut pool);
    pool.truncate(choices);
    pool.into_iter()
        .enumerate()
        .max_by_key(|(i, card)| (card.reward_score(), std::cmp::Reverse(*i)))
        .map(|(_, card)| card)
}

struct RunState {
    config: RunConfig,
    profile: &'static AscensionProfile,
    rng: CombatRng,
    deck: Vec<DeckCard>,
    health: Health,
    combats: Vec<CombatSummary>,
}

impl RunState {
    fn fight(
        &mut self,
        act: u32,
        floor: u32,
        kind: EncounterKind,
        enemies: Vec<Arc<EnemyTemplate>>,
    ) -> bool {
        let spawns: Vec<EnemySpawn> = enemies.into_iter().map(EnemySpawn::new).collect();
        let options = CombatOptions {
            seed: Some(self.rng.derive_seed()),
            max_rounds: self.config.max_turns,
            ascension: self.config.ascension,
            encounter: kind,
            passives: vec![],
        };
        let player = PlayerState::new(self.health, self.config.energy);
        let result = simulate_combat(player, &self.deck, &spawns, options);
        let outcome = match result {
            CombatResult::Victory(..) => CombatOutcome::Victory,
            CombatResult::Defeat(..) => CombatOutcome::Defeat,
            CombatResult::Timeout(..) => CombatOutcome::Timeout,
        };
        let record = result.into_inner();
        self.health = Health::new(record.hp_remaining, record.max_hp);
        self.combats.push(CombatSummary {
            act,
            floor,
            kind,
            enemies: record.enemies,
            outcome,
            turns_played: record.turns_played,
            damage_dealt: record.damage_dealt,
            damage_received: record.damage_received,
            hp_remaining: record.hp_remaining,
            cards_played: record.cards_played,
            card_play_frequency: record.card_play_frequency,
        });
        outcome == CombatOutcome::Victory
    }

    fn outcome(self, seed: u64, survived: bool, floors_cleared: u32, acts: u32) -> RunOutcome {
        RunOutcome {
            seed,
            survived,
            floors_cleared,
            acts_completed: acts,
            final_hp: match survived {
                true => self.health.current(),
                false => 0,
            },
            max_hp: self.health.max(),
            ascension: self.config.ascension,
            starting_gold: self.profile.starting_gold(),
            deck_size: self.deck.len(),
            combats: self.combats,
        }
    }
}

/// Plays a whole run: `floors` normal or elite fights per act followed by a boss. Partial heals
/// between floors, a larger heal between acts and a card reward after every won hallway fight.
/// Timeouts end the run like defeats.
#[instrument(skip_all, fields(seed = ?config.seed, ascension = config.ascension))]
pub fn simulate_run(config: &RunConfig) -> RunOutcome {
    let seed = config
        .seed
        .unwrap_or_else(|| CombatRng::from_entropy().derive_seed());
    let profile = AscensionProfile::for_level(config.ascension);
    let mut deck: Vec<DeckCard> = gamedata::starter_deck()
        .into_iter()
        .map(DeckCard::new)
        .collect();
    if profile.start_with_curse {
        match gamedata::card("curse_decay") {
            Some(curse) => deck.push(DeckCard::new(curse)),
            None => warn!("decay curse missing from the card catalog"),
        }
    }
    let max_hp = config.max_hp.max(1);
    let mut run = RunState {
        config: config.clone(),
        profile,
        rng: CombatRng::from_seed(seed),
        deck,
        health: Health::new(config.hp.clamp(1, max_hp), max_hp),
        combats: vec![],
    };
    let floor_heal = |health: Health| {
        let cap = (health.max() as f64 * profile.rest_heal_fraction()).floor() as u32;
        config.heal_per_floor.min(cap)
    };

    let mut floors_cleared = 0;
    let mut acts_completed = 0;
    for act in 1..=config.acts {
        for floor in 1..=config.floors {
            let elite = run.rng.next_f64() < config.elite_chance;
            let enemies = roll_encounter(act, floor, elite, &mut run.rng);
            if enemies.is_empty() {
                warn!(act, floor, "no enemies available, floor skipped");
                floors_cleared += 1;
                continue;
            }
            let kind = match elite {
                true => EncounterKind::Elite,
                false => EncounterKind::Normal,
            };
            if !run.fight(act, floor, kind, enemies) {
                info!(act, floor, floors_cleared, "run lost");
                return run.outcome(seed, false, floors_cleared, acts_completed);
            }
            run.health += floor_heal(run.health);
            if let Some(card) = card_reward(profile.card_reward_count(), &mut run.rng) {
                run.deck.push(DeckCard::new(card));
            }
            floors_cleared += 1;
        }

        let boss = roll_boss(act, &mut run.rng);
        if !boss.is_empty() && !run.fight(act, config.floors + 1, EncounterKind::Boss, boss) {
            info!(act, floors_cleared, "run lost to the boss");
            return run.outcome(seed, false, floors_cleared, acts_completed);
        }
        if act < config.acts {
            let heal = (run.health.max() as f64 * *BETWEEN_ACT_HEAL).floor() as u32;
            run.health += heal;
        }
        floors_cleared += 1;
        acts_completed += 1;
    }
    info!(floors_cleared, hp = %run.health, "run survived");
    run.outcome(seed, true, floors_cleared, acts_completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_bands() {
        assert_eq!(reward_rarity(0.0), Rarity::Common);
        assert_eq!(reward_rarity(0.59), Rarity::Common);
        assert_eq!(reward_rarity(0.6), Rarity::Uncommon);
        assert_eq!(reward_rarity(0.89), Rarity::Uncommon);
        assert_eq!(reward_rarity(0.95), Rarity::Rare);
    }

    #[test]
    fn reward_keeps_best_of_choices() {
        let mut rng = CombatRng::from_seed(9);
        for _ in 0..10 {
            let card = card_reward(3, &mut rng);
            assert!(card.is_some_and(|c| !matches!(c.rarity, Rarity::Basic | Rarity::Curse)));
        }
    }
}

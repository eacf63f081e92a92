use std::{
    collections::HashMap,
    fmt,
    sync::mpsc,
    thread,
    time::Instant,
};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{RunConfig, RunOutcome, simulate_run};

/// Associative fold of run outcomes. Tallies built from disjoint slices of a sweep can be merged
/// in any order and yield the same report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTally {
    pub runs: u64,
    pub survived: u64,
    pub floors_cleared: u64,
    pub turns: u64,
    pub combats: u64,
    pub survivor_hp: u64,
    /// Runs that completed at least `i + 1` acts.
    pub acts_completed: Vec<u64>,
    pub deaths: HashMap<String, u64>,
    pub card_plays: HashMap<String, u64>,
}

impl RunTally {
    pub fn add(&mut self, outcome: &RunOutcome) {
        self.runs += 1;
        self.floors_cleared += outcome.floors_cleared as u64;
        if outcome.survived {
            self.survived += 1;
            self.survivor_hp += outcome.final_hp as u64;
        }
        let acts = outcome.acts_completed as usize;
        if self.acts_completed.len() < acts {
            self.acts_completed.resize(acts, 0);
        }
        self.acts_completed[..acts].iter_mut().for_each(|c| *c += 1);

        for combat in outcome.combats.iter() {
            self.combats += 1;
            self.turns += combat.turns_played as u64;
            for (card, count) in combat.card_play_frequency.iter() {
                *self.card_plays.entry(card.clone()).or_default() += *count as u64;
            }
        }
        if let Some(fatal) = outcome.fatal_combat() {
            for enemy in fatal.enemies.iter() {
                *self.deaths.entry(enemy.clone()).or_default() += 1;
            }
        }
    }

    pub fn merge(mut self, other: RunTally) -> RunTally {
        self.runs += other.runs;
        self.survived += other.survived;
        self.floors_cleared += other.floors_cleared;
        self.turns += other.turns;
        self.combats += other.combats;
        self.survivor_hp += other.survivor_hp;
        if self.acts_completed.len() < other.acts_completed.len() {
            self.acts_completed.resize(other.acts_completed.len(), 0);
        }
        for (i, count) in other.acts_completed.into_iter().enumerate() {
            self.acts_completed[i] += count;
        }
        for (enemy, count) in other.deaths {
            *self.deaths.entry(enemy).or_default() += count;
        }
        for (card, count) in other.card_plays {
            *self.card_plays.entry(card).or_default() += count;
        }
        self
    }

    /// Most frequent name in lost combats, ties broken alphabetically.
    pub fn deadliest_enemy(&self) -> Option<&str> {
        self.deaths
            .iter()
            .max_by(|(a_name, a), (b_name, b)| a.cmp(b).then_with(|| b_name.cmp(a_name)))
            .map(|(name, _)| name.as_str())
    }
}

impl From<&Vec<RunOutcome>> for RunTally {
    fn from(outcomes: &Vec<RunOutcome>) -> Self {
        let mut tally = RunTally::default();
        outcomes.iter().for_each(|o| tally.add(o));
        tally
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub win_rate: f64,
    pub avg_floors_cleared: f64,
    pub avg_turns_per_combat: f64,
    pub deadliest_enemy: String,
    pub avg_hp_at_end: f64,
    pub card_play_frequency: IndexMap<String, u64>,
    pub total_runs: u64,
    /// Wall-clock milliseconds.
    pub total_time: u64,
    pub base_seed: u64,
    pub ascension: i64,
    pub win_rate_by_act: Vec<f64>,
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    match denominator {
        0 => 0.0,
        d => numerator as f64 / d as f64,
    }
}

impl BalanceReport {
    pub fn from_tally(tally: &RunTally, config: &RunConfig, base_seed: u64, millis: u64) -> Self {
        let mut card_play_frequency: Vec<(String, u64)> = tally
            .card_plays
            .iter()
            .map(|(card, count)| (card.clone(), *count))
            .collect();
        card_play_frequency.sort_by(|(a_card, a), (b_card, b)| b.cmp(a).then(a_card.cmp(b_card)));

        let win_rate_by_act = (0..config.acts as usize)
            .map(|act| ratio(tally.acts_completed.get(act).copied().unwrap_or(0), tally.runs))
            .collect();

        BalanceReport {
            win_rate: ratio(tally.survived, tally.runs),
            avg_floors_cleared: ratio(tally.floors_cleared, tally.runs),
            avg_turns_per_combat: ratio(tally.turns, tally.combats),
            deadliest_enemy: tally.deadliest_enemy().unwrap_or("none").to_string(),
            avg_hp_at_end: ratio(tally.survivor_hp, tally.survived),
            card_play_frequency: card_play_frequency.into_iter().collect(),
            total_runs: tally.runs,
            total_time: millis,
            base_seed,
            ascension: config.ascension,
            win_rate_by_act,
        }
    }
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} runs at ascension {} (seed {:#x}) in {}ms",
            self.total_runs, self.ascension, self.base_seed, self.total_time
        )?;
        writeln!(f, "win rate            {:>7.2}%", self.win_rate * 100.0)?;
        for (act, rate) in self.win_rate_by_act.iter().enumerate() {
            writeln!(f, "  act {:<2} cleared    {:>7.2}%", act + 1, rate * 100.0)?;
        }
        writeln!(f, "avg floors cleared  {:>8.2}", self.avg_floors_cleared)?;
        writeln!(f, "avg turns / combat  {:>8.2}", self.avg_turns_per_combat)?;
        writeln!(f, "avg hp at end       {:>8.2}", self.avg_hp_at_end)?;
        writeln!(f, "deadliest enemy     {}", self.deadliest_enemy)?;
        writeln!(f, "card plays:")?;
        for (card, count) in self.card_play_frequency.iter().take(15) {
            writeln!(f, "  {card:<24} {count:>8}")?;
        }
        Ok(())
    }
}

/// Runs `n` seeded runs (`base_seed + i`) across `workers` threads and aggregates them.
#[instrument(skip_all, fields(runs = n, workers = workers, ascension = config.ascension))]
pub fn run_balance_report(n: u64, config: &RunConfig, workers: usize) -> BalanceReport {
    let started = Instant::now();
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let workers = workers.clamp(1, n.max(1) as usize);

    let (tx, rx) = mpsc::channel::<RunTally>();
    thread::scope(|scope| {
        for worker in 0..workers {
            let tx = tx.clone();
            scope.spawn(move || {
                let mut tally = RunTally::default();
                for i in (worker as u64..n).step_by(workers) {
                    let run_config = config.clone().with_seed(base_seed.wrapping_add(i));
                    tally.add(&simulate_run(&run_config));
                }
                if tx.send(tally).is_err() {
                    warn!(worker, "report receiver dropped");
                }
            });
        }
    });
    drop(tx);

    let tally = rx.into_iter().fold(RunTally::default(), RunTally::merge);
    let millis = started.elapsed().as_millis() as u64;
    let report = BalanceReport::from_tally(&tally, config, base_seed, millis);
    info!(
        win_rate = report.win_rate,
        deadliest = %report.deadliest_enemy,
        millis,
        "balance report finished"
    );
    report
}

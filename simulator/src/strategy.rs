use std::collections::VecDeque;

use models::{CardDefinition, CardType, Cost, Special, Targeting};
use serde::Deserialize;
use tracing::warn;

use crate::{
    BLOCK_PRIORITY_THRESHOLD, CardInstance, CardInstanceId, CombatSession, MAX_PLAYS_PER_TURN,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Action {
    pub card: CardInstanceId,
    pub target: Option<usize>,
}

/// Decides what to play. An empty plan ends the turn.
pub trait Strategy {
    fn choose_actions(&mut self, session: &CombatSession) -> Vec<Action>;
}

/// Telegraphed attack damage of all living enemies: damage midpoint times hits, before
/// modifiers.
pub fn incoming_damage(session: &CombatSession) -> u32 {
    session
        .intents()
        .into_iter()
        .filter(|(_, m)| m.intent.is_attack())
        .map(|(_, m)| m.expected_damage())
        .sum()
}

/// Block first when threatened, otherwise attacks first, packed greedily into the energy
/// budget. This is not a knapsack: a cheaper card later in the order can be crowded out by an
/// expensive one earlier.
#[derive(Clone, Debug)]
pub struct GreedyStrategy {
    pub block_threshold: u32,
}

impl Default for GreedyStrategy {
    fn default() -> Self {
        Self {
            block_threshold: *BLOCK_PRIORITY_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bucket {
    Block,
    Attack,
    Power,
    Other,
}

fn bucket(card: &CardDefinition) -> Bucket {
    match card.card_type {
        CardType::Attack => Bucket::Attack,
        CardType::Power => Bucket::Power,
        _ if card.grants_block() => Bucket::Block,
        _ => Bucket::Other,
    }
}

fn attack_value(card: &CardDefinition, session: &CombatSession) -> u32 {
    match card.special {
        Some(Special::DamageEqualBlock) => session.player().block,
        _ => card.expected_damage(session.player().energy),
    }
}

impl GreedyStrategy {
    pub fn threatened(&self, session: &CombatSession) -> bool {
        let incoming = incoming_damage(session);
        incoming > self.block_threshold && (session.player().block as f64) < incoming as f64 * 0.5
    }
}

impl Strategy for GreedyStrategy {
    fn choose_actions(&mut self, session: &CombatSession) -> Vec<Action> {
        let Some(lowest) = session
            .living_enemies()
            .min_by_key(|(i, e)| (e.health.current(), *i))
            .map(|(i, _)| i)
        else {
            return vec![];
        };
        let order: &[Bucket] = match self.threatened(session) {
            true => &[Bucket::Block, Bucket::Attack, Bucket::Power, Bucket::Other],
            false => &[Bucket::Attack, Bucket::Power, Bucket::Block, Bucket::Other],
        };

        let mut playable: Vec<&CardInstance> = session
            .hand()
            .into_iter()
            .filter(|c| session.is_playable_now(c))
            .collect();
        playable.sort_by_key(|c| {
            let card = c.definition();
            let rank = order.iter().position(|b| *b == bucket(card)).unwrap_or(order.len());
            let value = match bucket(card) {
                Bucket::Attack => attack_value(card, session),
                Bucket::Block => card.block,
                Bucket::Power | Bucket::Other => 0,
            };
            (rank, std::cmp::Reverse(value), c.id)
        });

        let mut budget = session.player().energy;
        let mut plan = Vec::new();
        for card in playable {
            let definition = card.definition();
            let cost = match session.effective_cost(definition) {
                Cost::X if budget == 0 => continue,
                cost => cost.payable(budget),
            };
            let Some(cost) = cost else {
                continue;
            };
            budget -= cost;
            let target = match definition.targeting {
                Targeting::SingleEnemy => Some(lowest),
                _ => None,
            };
            plan.push(Action {
                card: card.id,
                target,
            });
        }
        plan
    }
}

/// One step of a scripted replay: play the first matching card in hand, or end the turn.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    Play {
        play: String,
        #[serde(default)]
        target: Option<usize>,
    },
    EndTurn {
        end_turn: bool,
    },
}

/// Replays a fixed queue of decisions, one turn's worth per round.
#[derive(Clone, Debug, Default)]
pub struct ScriptedStrategy {
    steps: VecDeque<ScriptStep>,
    planned_round: Option<u32>,
}

impl ScriptedStrategy {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            planned_round: None,
        }
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl Strategy for ScriptedStrategy {
    fn choose_actions(&mut self, session: &CombatSession) -> Vec<Action> {
        if self.planned_round == Some(session.round()) {
            return vec![];
        }
        self.planned_round = Some(session.round());

        let mut hand = session.hand();
        let mut plan = Vec::new();
        while let Some(step) = self.steps.pop_front() {
            match step {
                ScriptStep::EndTurn { .. } => break,
                ScriptStep::Play { play, target } => {
                    match hand.iter().position(|c| c.card_id() == play) {
                        Some(position) => plan.push(Action {
                            card: hand.remove(position).id,
                            target,
                        }),
                        None => warn!(card = %play, round = session.round(), "scripted card not in hand"),
                    }
                }
            }
        }
        plan
    }
}

/// Plays one turn: asks for a plan, plays it, and asks again until a plan yields no accepted
/// play. Rejected plays are logged and never counted.
pub fn play_turn(session: &mut CombatSession, strategy: &mut dyn Strategy) {
    let mut plays = 0;
    loop {
        let plan = strategy.choose_actions(session);
        let mut accepted = 0;
        for action in plan {
            if plays >= *MAX_PLAYS_PER_TURN || session.is_over() {
                return;
            }
            match session.try_play_card(action.card, action.target) {
                Ok(()) => {
                    accepted += 1;
                    plays += 1;
                }
                Err(rejected) => {
                    warn!(card = %action.card, target = ?action.target, %rejected, "play rejected")
                }
            }
        }
        if accepted == 0 || session.is_over() || plays >= *MAX_PLAYS_PER_TURN {
            return;
        }
    }
}

/// Drives `session` with `strategy` until Victory, Defeat or Timeout.
pub fn run_to_completion(
    mut session: CombatSession,
    strategy: &mut dyn Strategy,
) -> CombatSession {
    while !session.is_over() {
        play_turn(&mut session, strategy);
        if session.is_over() || session.try_end_turn().is_err() {
            break;
        }
    }
    session
}

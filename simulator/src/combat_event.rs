use models::{PileKind, StatusKind};
use serde::Serialize;

use crate::CardInstanceId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Side {
    Player,
    Enemy(usize),
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy(i) => write!(f, "enemy[{i}]"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SkipReason {
    UnsupportedSpecial(String),
    NoLivingTarget,
    NothingToUpgrade,
    UnknownCard(String),
}

/// One entry of the append-only combat log.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CombatEvent {
    Raw(String),
    Skip(SkipReason),
    RoundStarted(u32),
    Drew(Vec<CardInstanceId>),
    Reshuffled,
    Intent { enemy: usize, move_id: String },
    CardPlayed { card: String, target: Option<usize>, energy: u32 },
    PotionUsed { potion: String, target: Option<usize> },
    EnemyMove { enemy: usize, move_id: String },
    Damage { source: Side, target: Side, amount: u32, blocked: u32 },
    HpLost { target: Side, amount: u32 },
    Healed { target: Side, amount: u32 },
    Block { target: Side, amount: u32 },
    Status { target: Side, status: StatusKind, amount: i32 },
    StatusNegated { target: Side, status: StatusKind },
    EnergyGained(u32),
    CardAdded { card: String, pile: PileKind },
    Upgraded(CardInstanceId),
    Exhausted(CardInstanceId),
    Died(Side),
    TurnEnded(u32),
    Victory,
    Defeat,
    Timeout,
}

impl CombatEvent {
    /// HP the player lost in this event.
    pub fn player_hp_lost(&self) -> u32 {
        match self {
            CombatEvent::Damage {
                target: Side::Player,
                amount,
                blocked,
                ..
            } => amount.saturating_sub(*blocked),
            CombatEvent::HpLost {
                target: Side::Player,
                amount,
            } => *amount,
            _ => 0,
        }
    }
}

impl std::fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatEvent::Raw(s) => write!(f, "{s}"),
            CombatEvent::Skip(reason) => write!(f, "skipped: {reason:?}"),
            CombatEvent::RoundStarted(n) => write!(f, "round {n}"),
            CombatEvent::Drew(ids) => write!(f, "drew {} card(s)", ids.len()),
            CombatEvent::Reshuffled => write!(f, "discard pile reshuffled"),
            CombatEvent::Intent { enemy, move_id } => write!(f, "enemy[{enemy}] intends {move_id}"),
            CombatEvent::CardPlayed {
                card,
                target,
                energy,
            } => match target {
                Some(t) => write!(f, "played {card} ({energy}E) on enemy[{t}]"),
                None => write!(f, "played {card} ({energy}E)"),
            },
            CombatEvent::PotionUsed { potion, .. } => write!(f, "used {potion}"),
            CombatEvent::EnemyMove { enemy, move_id } => write!(f, "enemy[{enemy}] uses {move_id}"),
            CombatEvent::Damage {
                source,
                target,
                amount,
                blocked,
            } => write!(f, "{source} hits {target} for {amount} ({blocked} blocked)"),
            CombatEvent::HpLost { target, amount } => write!(f, "{target} loses {amount} hp"),
            CombatEvent::Healed { target, amount } => write!(f, "{target} heals {amount}"),
            CombatEvent::Block { target, amount } => write!(f, "{target} gains {amount} block"),
            CombatEvent::Status {
                target,
                status,
                amount,
            } => write!(f, "{target} {status} {amount:+}"),
            CombatEvent::StatusNegated { target, status } => {
                write!(f, "{target} negates {status}")
            }
            CombatEvent::EnergyGained(n) => write!(f, "gained {n} energy"),
            CombatEvent::CardAdded { card, pile } => write!(f, "{card} added to {pile:?}"),
            CombatEvent::Upgraded(id) => write!(f, "upgraded {id}"),
            CombatEvent::Exhausted(id) => write!(f, "exhausted {id}"),
            CombatEvent::Died(side) => write!(f, "{side} died"),
            CombatEvent::TurnEnded(n) => write!(f, "turn {n} ended"),
            CombatEvent::Victory => write!(f, "victory"),
            CombatEvent::Defeat => write!(f, "defeat"),
            CombatEvent::Timeout => write!(f, "timeout"),
        }
    }
}

use indexmap::IndexMap;
use serde::Serialize;

use crate::{CombatEvent, CombatSession, Phase};

/// Everything a finished combat reports. Two combats from the same seed and initial state
/// produce equal records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CombatRecord {
    pub turns_played: u32,
    pub damage_dealt: u32,
    pub damage_received: u32,
    pub hp_remaining: u32,
    pub max_hp: u32,
    pub cards_played: u32,
    pub card_play_frequency: IndexMap<String, u32>,
    pub enemies: Vec<String>,
    #[serde(skip)]
    pub log: Vec<CombatEvent>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CombatResult {
    Victory(CombatRecord),
    Defeat(CombatRecord),
    Timeout(CombatRecord),
}

impl CombatResult {
    pub fn inner_ref(&self) -> &CombatRecord {
        match self {
            CombatResult::Victory(r) | CombatResult::Defeat(r) | CombatResult::Timeout(r) => r,
        }
    }

    pub fn into_inner(self) -> CombatRecord {
        match self {
            CombatResult::Victory(r) | CombatResult::Defeat(r) | CombatResult::Timeout(r) => r,
        }
    }

    pub fn short_str(&self) -> String {
        match self {
            CombatResult::Victory(..) => "Victory".to_string(),
            CombatResult::Defeat(..) => "Defeat".to_string(),
            CombatResult::Timeout(..) => "Timeout".to_string(),
        }
    }

    pub fn won(&self) -> bool {
        matches!(self, CombatResult::Victory(..))
    }
}

/// A session that has not reached a terminal phase counts as a timeout.
impl From<CombatSession> for CombatResult {
    fn from(session: CombatSession) -> Self {
        let record = CombatRecord {
            turns_played: session.turns_played,
            damage_dealt: session.stats.damage_dealt,
            damage_received: session.stats.damage_received,
            hp_remaining: session.player.health.current(),
            max_hp: session.player.health.max(),
            cards_played: session.stats.cards_played,
            card_play_frequency: session.stats.card_play_frequency,
            enemies: session
                .enemies
                .iter()
                .map(|e| e.name().to_string())
                .collect(),
            log: session.log,
        };
        match session.phase {
            Phase::Victory => CombatResult::Victory(record),
            Phase::Defeat => CombatResult::Defeat(record),
            _ => CombatResult::Timeout(record),
        }
    }
}

impl std::fmt::Display for CombatResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner_ref();
        writeln!(
            f,
            "{} after {} turn(s) vs {} (hp {}/{}, dealt {}, received {})",
            self.short_str(),
            inner.turns_played,
            inner.enemies.join(", "),
            inner.hp_remaining,
            inner.max_hp,
            inner.damage_dealt,
            inner.damage_received,
        )?;
        for event in &inner.log {
            match event {
                CombatEvent::RoundStarted(n) => writeln!(f, "[{n}] Round")?,
                CombatEvent::Drew(..) | CombatEvent::Intent { .. } => {}
                e => writeln!(f, "  {e}")?,
            }
        }
        Ok(())
    }
}

use std::sync::Arc;

use models::{EnemyTemplate, Move};

use crate::{CombatRng, Health, Statuses, impl_combatant};

#[derive(Clone, Debug)]
pub struct EnemyInstance {
    pub template: Arc<EnemyTemplate>,
    pub health: Health,
    pub block: u32,
    pub statuses: Statuses,
    /// Position in the encounter, used by spawn-parity patterns and ally checks.
    pub spawn_index: usize,
    pub last_move: Option<String>,
    pub used_moves: Vec<String>,
    /// Move telegraphed for the current round.
    pub intent: Option<String>,
    /// Ascension scaling applied to every attack of this enemy.
    pub damage_multiplier: f64,
}

impl_combatant!(EnemyInstance);

impl EnemyInstance {
    pub fn new(template: Arc<EnemyTemplate>, hp: u32, spawn_index: usize) -> Self {
        let statuses = template.statuses.iter().copied().collect();
        Self {
            template,
            health: Health::full(hp),
            block: 0,
            statuses,
            spawn_index,
            last_move: None,
            used_moves: vec![],
            intent: None,
            damage_multiplier: 1.0,
        }
    }

    /// Rolls HP uniformly from the template range.
    pub fn spawn(template: Arc<EnemyTemplate>, spawn_index: usize, rng: &mut CombatRng) -> Self {
        let hp = rng.range_inclusive(template.hp.min, template.hp.max);
        Self::new(template, hp, spawn_index)
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn intent_move(&self) -> Option<&Move> {
        self.intent
            .as_deref()
            .and_then(|id| self.template.move_or_first(id))
    }

    pub fn record_move(&mut self, id: &str) {
        self.last_move = Some(id.to_string());
        if !self.used_moves.iter().any(|m| m == id) {
            self.used_moves.push(id.to_string());
        }
    }
}

impl std::fmt::Display for EnemyInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}](hp {}, block {}) {}",
            self.name(),
            self.spawn_index,
            self.health,
            self.block,
            self.statuses
        )?;
        if let Some(m) = self.intent_move() {
            write!(f, " -> {}", m.name)?;
        }
        Ok(())
    }
}

use std::sync::Arc;

use models::{PassiveEffect, PotionDefinition, StatusKind};

use crate::{Health, POTION_SLOTS, Statuses, impl_combatant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnCounters {
    pub cards: u32,
    pub attacks: u32,
    pub skills: u32,
    pub powers: u32,
}

#[derive(Clone, Debug)]
pub struct PlayerState {
    pub health: Health,
    pub block: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub statuses: Statuses,
    pub counters: TurnCounters,
    pub potions: Vec<Option<Arc<PotionDefinition>>>,
    /// HP lost at each end of turn while Combust is active.
    pub combust_hp_loss: u32,
    /// Cards queued on top of the regular draw for the next turn start.
    pub extra_draw: u32,
    pub energy_bonus: u32,
    pub draw_bonus: u32,
    pub vulnerable_bonus: f64,
}

impl_combatant!(PlayerState);

impl PlayerState {
    pub fn new(health: Health, max_energy: u32) -> Self {
        Self {
            health,
            block: 0,
            energy: max_energy,
            max_energy,
            statuses: Statuses::default(),
            counters: TurnCounters::default(),
            potions: vec![None; *POTION_SLOTS],
            combust_hp_loss: 0,
            extra_draw: 0,
            energy_bonus: 0,
            draw_bonus: 0,
            vulnerable_bonus: 0.0,
        }
    }

    /// Places `potion` in the first free slot. Returns false when every slot is taken.
    pub fn give_potion(&mut self, potion: Arc<PotionDefinition>) -> bool {
        match self.potions.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(potion);
                true
            }
            None => false,
        }
    }

    /// Relic contributions. `StartingBlock` is returned instead of applied because block is
    /// reset when the first turn starts.
    pub fn apply_passive(&mut self, passive: &PassiveEffect) -> Option<u32> {
        match *passive {
            PassiveEffect::EnergyBonus { amount } => self.energy_bonus += amount,
            PassiveEffect::DrawBonus { amount } => self.draw_bonus += amount,
            PassiveEffect::VulnerableBonus { amount } => self.vulnerable_bonus += amount,
            PassiveEffect::StartingStatus { status, amount } => self.statuses.add(status, amount),
            PassiveEffect::StartingBlock { amount } => return Some(amount),
        }
        None
    }

    pub fn turn_energy(&self) -> u32 {
        self.max_energy + self.energy_bonus + self.statuses.stacks(StatusKind::Berserk)
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Player(hp {}, block {}, energy {}/{}) {}",
            self.health, self.block, self.energy, self.max_energy, self.statuses
        )
    }
}

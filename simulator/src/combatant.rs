use models::StatusKind;

use crate::{Applied, Health, Statuses};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageTaken {
    pub blocked: u32,
    pub hp_lost: u32,
}

/// Shared HP, block and status bookkeeping for the player and enemies.
pub trait Combatant {
    fn health(&self) -> Health;
    fn health_mut(&mut self) -> &mut Health;
    fn block(&self) -> u32;
    fn block_mut(&mut self) -> &mut u32;
    fn statuses(&self) -> &Statuses;
    fn statuses_mut(&mut self) -> &mut Statuses;

    fn is_dead(&self) -> bool {
        self.health().is_dead()
    }

    fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// Block absorbs first; only the remainder reaches HP.
    fn take_damage(&mut self, amount: u32) -> DamageTaken {
        let blocked = amount.min(self.block());
        *self.block_mut() -= blocked;
        let hp_before = self.health().current();
        *self.health_mut() -= amount - blocked;
        DamageTaken {
            blocked,
            hp_lost: hp_before - self.health().current(),
        }
    }

    /// HP loss that ignores block.
    fn lose_hp(&mut self, amount: u32) -> u32 {
        let hp_before = self.health().current();
        *self.health_mut() -= amount;
        hp_before - self.health().current()
    }

    /// HP loss that can never kill: HP stays at 1 or above.
    fn lose_hp_nonlethal(&mut self, amount: u32) -> u32 {
        let hp = self.health().current();
        let allowed = amount.min(hp.saturating_sub(1));
        self.lose_hp(allowed)
    }

    fn heal(&mut self, amount: u32) -> u32 {
        let hp_before = self.health().current();
        *self.health_mut() += amount;
        self.health().current() - hp_before
    }

    fn gain_block(&mut self, amount: u32) {
        *self.block_mut() += amount;
    }

    fn reset_block(&mut self) {
        *self.block_mut() = 0;
    }

    fn apply_status(&mut self, kind: StatusKind, amount: i32) -> Applied {
        self.statuses_mut().apply(kind, amount)
    }

    fn strength(&self) -> i32 {
        self.statuses().get(StatusKind::Strength)
    }
}

#[macro_export]
macro_rules! impl_combatant {
    ($ty:ty) => {
        impl $crate::Combatant for $ty {
            fn health(&self) -> $crate::Health {
                self.health
            }

            fn health_mut(&mut self) -> &mut $crate::Health {
                &mut self.health
            }

            fn block(&self) -> u32 {
                self.block
            }

            fn block_mut(&mut self) -> &mut u32 {
                &mut self.block
            }

            fn statuses(&self) -> &$crate::Statuses {
                &self.statuses
            }

            fn statuses_mut(&mut self) -> &mut $crate::Statuses {
                &mut self.statuses
            }
        }
    };
}

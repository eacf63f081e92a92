use crate::StatusKind;

/// Who an effect lands on, relative to whoever plays the card or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    Source,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub status: StatusKind,
    pub amount: i32,
    pub target: EffectTarget,
}

impl Effect {
    pub fn on_source(status: StatusKind, amount: i32) -> Self {
        Self {
            status,
            amount,
            target: EffectTarget::Source,
        }
    }

    pub fn on_opponent(status: StatusKind, amount: i32) -> Self {
        Self {
            status,
            amount,
            target: EffectTarget::Opponent,
        }
    }
}

use serde::Deserialize;

use crate::StatusKind;

/// What a relic contributes to a combat. Applied once when the session is created.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PassiveEffect {
    EnergyBonus { amount: u32 },
    DrawBonus { amount: u32 },
    VulnerableBonus { amount: f64 },
    StartingStatus { status: StatusKind, amount: i32 },
    StartingBlock { amount: u32 },
}

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct WeightedChoice {
    pub threshold: f64,
    #[serde(rename = "move")]
    pub move_id: String,
    #[serde(default, rename = "avoidRepeat")]
    pub avoid_repeat: bool,
}

/// Declarative move selection. Every pattern names moves by id; an id missing from the moveset
/// falls back to the first move.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AiPattern {
    Fixed {
        #[serde(rename = "move")]
        move_id: String,
    },
    /// `move` on exactly `turn`, otherwise defer.
    OnTurn {
        turn: u32,
        #[serde(rename = "move")]
        move_id: String,
        otherwise: Box<AiPattern>,
    },
    /// `move` on every turn before `turn`, otherwise defer.
    BeforeTurn {
        turn: u32,
        #[serde(rename = "move")]
        move_id: String,
        otherwise: Box<AiPattern>,
    },
    /// `moves[(turn - offset) % len]`.
    Cycle {
        moves: Vec<String>,
        #[serde(default)]
        offset: u32,
    },
    /// One roll per node; the first choice whose threshold exceeds the roll and whose repeat
    /// rule allows it wins.
    Weighted {
        choices: Vec<WeightedChoice>,
        otherwise: Box<AiPattern>,
    },
    /// Replace `move` with `instead` when it was also the last move.
    NoRepeat {
        #[serde(rename = "move")]
        move_id: String,
        instead: String,
        pattern: Box<AiPattern>,
    },
    SpawnParity {
        even: Box<AiPattern>,
        odd: Box<AiPattern>,
    },
    BelowHalfHp {
        #[serde(rename = "move")]
        move_id: String,
        #[serde(default)]
        once: bool,
        otherwise: Box<AiPattern>,
    },
    /// `move` when any other living ally is below half HP.
    AllyBelowHalf {
        #[serde(rename = "move")]
        move_id: String,
        otherwise: Box<AiPattern>,
    },
}

impl AiPattern {
    pub fn fixed(move_id: impl Into<String>) -> Self {
        AiPattern::Fixed {
            move_id: move_id.into(),
        }
    }

    /// Every move id referenced anywhere in the pattern.
    pub fn referenced_moves(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_moves(&mut ids);
        ids
    }

    fn collect_moves<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            AiPattern::Fixed { move_id } => ids.push(move_id),
            AiPattern::OnTurn {
                move_id, otherwise, ..
            }
            | AiPattern::BeforeTurn {
                move_id, otherwise, ..
            }
            | AiPattern::BelowHalfHp {
                move_id, otherwise, ..
            }
            | AiPattern::AllyBelowHalf { move_id, otherwise } => {
                ids.push(move_id);
                otherwise.collect_moves(ids);
            }
            AiPattern::Cycle { moves, .. } => ids.extend(moves.iter().map(String::as_str)),
            AiPattern::Weighted { choices, otherwise } => {
                ids.extend(choices.iter().map(|c| c.move_id.as_str()));
                otherwise.collect_moves(ids);
            }
            AiPattern::NoRepeat {
                move_id,
                instead,
                pattern,
            } => {
                ids.push(move_id);
                ids.push(instead);
                pattern.collect_moves(ids);
            }
            AiPattern::SpawnParity { even, odd } => {
                even.collect_moves(ids);
                odd.collect_moves(ids);
            }
        }
    }
}

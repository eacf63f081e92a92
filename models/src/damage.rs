use crate::RANGE_DESCRIPTOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    Fixed(u32),
    Range { min: u32, max: u32 },
}

impl Damage {
    /// Value fed into the damage formula. Ranges resolve to their floored midpoint.
    pub fn base(&self) -> u32 {
        match self {
            Damage::Fixed(n) => *n,
            Damage::Range { min, max } => (min + max) / 2,
        }
    }
}

impl TryFrom<&str> for Damage {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (min, max) = parse_range(value)?;
        Ok(match max {
            Some(max) => Damage::Range { min, max },
            None => Damage::Fixed(min),
        })
    }
}

impl std::fmt::Display for Damage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Damage::Fixed(n) => write!(f, "{n}"),
            Damage::Range { min, max } => write!(f, "{min}-{max}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HpRange {
    pub min: u32,
    pub max: u32,
}

impl HpRange {
    pub fn fixed(hp: u32) -> Self {
        Self { min: hp, max: hp }
    }
}

impl TryFrom<&str> for HpRange {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (min, max) = parse_range(value)?;
        Ok(Self {
            min,
            max: max.unwrap_or(min),
        })
    }
}

fn parse_range(value: &str) -> anyhow::Result<(u32, Option<u32>)> {
    let Some(captures) = RANGE_DESCRIPTOR.captures(value.trim()) else {
        anyhow::bail!("invalid range descriptor {value:?}");
    };
    let min: u32 = captures[1].parse()?;
    let max = match captures.get(2) {
        Some(m) => Some(m.as_str().parse::<u32>()?),
        None => None,
    };
    if let Some(max) = max {
        if max < min {
            anyhow::bail!("range {value:?} has max below min");
        }
    }
    Ok((min, max))
}

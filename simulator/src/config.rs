use serde::Deserialize;

/// Parameters of a simulated run. Keys are accepted in snake_case or camelCase.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub seed: Option<u64>,
    /// Normal floors per act, the boss not included.
    #[serde(alias = "floorsPerAct")]
    pub floors: u32,
    pub acts: u32,
    pub ascension: i64,
    pub hp: u32,
    #[serde(alias = "maxHp")]
    pub max_hp: u32,
    pub energy: u32,
    #[serde(alias = "eliteChance")]
    pub elite_chance: f64,
    #[serde(alias = "healPerFloor")]
    pub heal_per_floor: u32,
    #[serde(alias = "maxTurns")]
    pub max_turns: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            floors: 14,
            acts: 1,
            ascension: 0,
            hp: 80,
            max_hp: 80,
            energy: 3,
            elite_chance: 0.1,
            heal_per_floor: 6,
            max_turns: 50,
        }
    }
}

impl RunConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() -> anyhow::Result<()> {
        let config: RunConfig = toml::from_str("acts = 3\nascension = 5")?;
        assert_eq!(config.acts, 3);
        assert_eq!(config.ascension, 5);
        assert_eq!(config.floors, 14);
        assert_eq!(config.max_hp, 80);
        assert_eq!(config.seed, None);
        Ok(())
    }

    #[test]
    fn camel_case_keys() -> anyhow::Result<()> {
        let config: RunConfig =
            serde_json::from_str(r#"{"maxHp": 70, "eliteChance": 0.25, "healPerFloor": 3}"#)?;
        assert_eq!(config.max_hp, 70);
        assert_eq!(config.elite_chance, 0.25);
        assert_eq!(config.heal_per_floor, 3);
        Ok(())
    }
}

use anyhow::Context;
use models::EncounterKind;
use serde::Deserialize;

use crate::{
    CombatOptions, CombatResult, CombatSession, EnemySpawn, GreedyStrategy, MAX_ROUNDS,
    PlayerTemplate, ScriptStep, ScriptedStrategy, Strategy, finish, initialize_combat,
};

#[derive(Clone, Debug, Deserialize)]
pub struct EnemyEntry {
    pub id: String,
    #[serde(default)]
    pub hp: Option<u32>,
}

/// A single combat described in TOML.
#[derive(Clone, Debug, Deserialize)]
pub struct SimulationTemplate {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default, alias = "maxTurns")]
    pub max_turns: Option<u32>,
    #[serde(default)]
    pub ascension: i64,
    #[serde(default)]
    pub encounter: EncounterKind,
    pub player: PlayerTemplate,
    pub enemies: Vec<EnemyEntry>,
    /// Scripted decisions. Without a script the greedy strategy plays.
    #[serde(default)]
    pub script: Vec<ScriptStep>,
    #[serde(skip, default)]
    pub source: Option<String>,
}

impl SimulationTemplate {
    pub fn options(&self) -> CombatOptions {
        CombatOptions {
            seed: self.seed,
            max_rounds: self.max_turns.unwrap_or(*MAX_ROUNDS),
            ascension: self.ascension,
            encounter: self.encounter,
            passives: self.player.passives.clone(),
        }
    }

    pub fn spawns(&self) -> anyhow::Result<Vec<EnemySpawn>> {
        if self.enemies.is_empty() {
            anyhow::bail!("simulation has no enemies");
        }
        self.enemies
            .iter()
            .map(|entry| {
                let template = gamedata::enemy(&entry.id)
                    .with_context(|| format!("unknown enemy {}", entry.id))?;
                Ok(match entry.hp {
                    Some(0) => anyhow::bail!("enemy {} has zero hp", entry.id),
                    Some(hp) => EnemySpawn::with_hp(template, hp),
                    None => EnemySpawn::new(template),
                })
            })
            .collect()
    }

    pub fn strategy(&self) -> Box<dyn Strategy> {
        match self.script.is_empty() {
            true => Box::new(GreedyStrategy::default()),
            false => Box::new(ScriptedStrategy::new(self.script.clone())),
        }
    }

    /// Builds the session and plays it out with the template's strategy.
    pub fn run(self) -> anyhow::Result<CombatResult> {
        let mut strategy = self.strategy();
        let session = CombatSession::try_from(self)?;
        Ok(finish(session, strategy.as_mut()))
    }
}

impl TryFrom<SimulationTemplate> for CombatSession {
    type Error = anyhow::Error;

    fn try_from(template: SimulationTemplate) -> Result<Self, Self::Error> {
        let player = template
            .player
            .create_player()
            .context("invalid player template")?;
        let deck = template.player.deck().context("invalid player deck")?;
        let spawns = template.spawns()?;
        Ok(initialize_combat(player, &deck, &spawns, template.options()))
    }
}

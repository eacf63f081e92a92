use std::path::PathBuf;

use simulator::{CombatResult, SimulationTemplate};

#[allow(unused)]
pub static SEED: u64 = 0x3a3f7af8085da7a2;

#[allow(unused)]
pub fn run_simulation(
    name: String,
    mut template: SimulationTemplate,
) -> Result<CombatResult, Box<dyn std::error::Error>> {
    let name = name.replace('"', "");
    template.seed = template.seed.or(Some(SEED));
    let result = tracing::info_span!("simulation", %name).in_scope(|| template.run())?;
    Ok(result)
}

#[allow(unused)]
pub fn read_simulation(path: &PathBuf) -> Result<SimulationTemplate, Box<dyn std::error::Error>> {
    let simulation_str = std::fs::read_to_string(path)?;
    let mut template = toml::from_str::<SimulationTemplate>(&simulation_str)?;
    template.source = Some(path.display().to_string());
    Ok(template)
}

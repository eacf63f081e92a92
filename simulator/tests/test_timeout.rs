mod aux;

use aux::{read_simulation, run_simulation};
use rstest::rstest;
use simulator::CombatResult;
use std::path::PathBuf;

#[rstest]
fn test_timeout(
    #[files("tests/simulations/timeout/*.toml")] path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = read_simulation(&path)?;
    let max_turns = template.max_turns;
    let result = run_simulation(format!("{:?}", path.file_name().unwrap()), template)?;
    assert!(
        matches!(result, CombatResult::Timeout(..)),
        "Simulation `{:?}` failed: Expected `Timeout` got `{}`",
        path.file_name().unwrap(),
        result.short_str(),
    );
    if let Some(max_turns) = max_turns {
        assert_eq!(result.inner_ref().turns_played, max_turns);
    }
    Ok(())
}

mod aux;

use aux::{read_simulation, run_simulation};
use simulator::CombatResult;
use std::path::PathBuf;

#[rstest::rstest]
fn test_defeat(
    #[files("tests/simulations/defeat/*.toml")] path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = read_simulation(&path)?;
    let result = run_simulation(format!("{:?}", path.file_name().unwrap()), template)?;
    assert!(
        matches!(result, CombatResult::Defeat(..)),
        "Simulation `{:?}` failed: Expected `Defeat` got `{}`",
        path.file_name().unwrap(),
        result.short_str()
    );
    assert_eq!(result.inner_ref().hp_remaining, 0);
    Ok(())
}

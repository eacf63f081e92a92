mod aux;

use aux::{SEED, read_simulation, run_simulation};
use rstest::rstest;
use simulator::{RunConfig, simulate_run};
use std::path::PathBuf;

#[rstest]
fn test_same_seed_same_combat(
    #[files("tests/simulations/*/*.toml")] path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = format!("{:?}", path.file_name().unwrap());
    let first = run_simulation(name.clone(), read_simulation(&path)?)?;
    let second = run_simulation(name, read_simulation(&path)?)?;
    assert_eq!(first, second);
    assert_eq!(first.inner_ref().log, second.inner_ref().log);
    Ok(())
}

#[rstest]
#[case(0)]
#[case(5)]
#[case(10)]
fn test_same_seed_same_run(#[case] ascension: i64) {
    let config = RunConfig {
        ascension,
        floors: 6,
        ..RunConfig::default()
    }
    .with_seed(SEED);
    let first = simulate_run(&config);
    let second = simulate_run(&config);
    assert_eq!(first, second);
    assert_eq!(first.seed, SEED);
}

mod aux;

use aux::{read_simulation, run_simulation};
use rstest::rstest;
use simulator::{CombatEvent, CombatResult};
use std::path::PathBuf;

#[rstest]
fn test_scripted_replay(
    #[files("tests/simulations/scripted/*.toml")] path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = read_simulation(&path)?;
    let first = run_simulation(format!("{:?}", path.file_name().unwrap()), template.clone())?;
    let second = run_simulation(format!("{:?}", path.file_name().unwrap()), template)?;
    assert_eq!(first, second, "scripted replay diverged");
    Ok(())
}

#[test]
fn test_bash_then_strikes() -> Result<(), Box<dyn std::error::Error>> {
    let template = read_simulation(&PathBuf::from("tests/simulations/scripted/bash_then_strikes.toml"))?;
    let result = run_simulation("bash_then_strikes".to_string(), template)?;
    assert!(
        matches!(result, CombatResult::Victory(..)),
        "Expected `Victory` got `{}`",
        result.short_str()
    );
    let record = result.inner_ref();
    assert_eq!(record.turns_played, 2);
    assert_eq!(record.cards_played, 5);
    assert_eq!(record.damage_dealt, 40);
    assert_eq!(record.card_play_frequency.get("bash"), Some(&1));
    assert_eq!(record.card_play_frequency.get("strike"), Some(&4));

    let played: Vec<&str> = record
        .log
        .iter()
        .filter_map(|event| match event {
            CombatEvent::CardPlayed { card, .. } => Some(card.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(played, vec!["Bash", "Strike", "Strike", "Strike", "Strike"]);
    Ok(())
}

use tracing::instrument;

use crate::{
    CombatOptions, CombatResult, CombatSession, DeckCard, EnemySpawn, GreedyStrategy,
    PlayerState, Strategy, initialize_combat, run_to_completion,
};

/// Runs one encounter to a terminal phase with the greedy strategy.
#[instrument(skip_all, fields(seed = ?options.seed, enemies = spawns.len()))]
pub fn simulate_combat(
    player: PlayerState,
    deck: &[DeckCard],
    spawns: &[EnemySpawn],
    options: CombatOptions,
) -> CombatResult {
    let session = initialize_combat(player, deck, spawns, options);
    finish(session, &mut GreedyStrategy::default())
}

/// Runs `session` to a terminal phase with `strategy`.
pub fn finish(session: CombatSession, strategy: &mut dyn Strategy) -> CombatResult {
    CombatResult::from(run_to_completion(session, strategy))
}

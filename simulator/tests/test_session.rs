mod aux;

use aux::SEED;
use models::Cost;
use rstest::rstest;
use simulator::{
    CardInstanceId, CombatOptions, CombatSession, Combatant, DeckCard, EnemySpawn, GreedyStrategy,
    Health, Phase, PlayerState, Rejected, Strategy, initialize_combat, play_turn,
};

fn deck(cards: &[(&str, usize)]) -> Vec<DeckCard> {
    cards
        .iter()
        .flat_map(|(id, count)| {
            let card = gamedata::card(id).expect("card in catalog");
            std::iter::repeat_n(DeckCard::new(card), *count)
        })
        .collect()
}

fn spawn(id: &str, hp: u32) -> EnemySpawn {
    EnemySpawn::with_hp(gamedata::enemy(id).expect("enemy in catalog"), hp)
}

fn options(ascension: i64) -> CombatOptions {
    CombatOptions {
        seed: Some(SEED),
        ascension,
        ..CombatOptions::default()
    }
}

fn strikes_vs_cultist() -> CombatSession {
    initialize_combat(
        PlayerState::new(Health::full(80), 3),
        &deck(&[("strike", 5)]),
        &[spawn("cultist", 40)],
        options(0),
    )
}

fn first_in_hand(session: &CombatSession, id: &str) -> CardInstanceId {
    session
        .hand()
        .into_iter()
        .find(|c| c.card_id() == id)
        .map(|c| c.id)
        .expect("card in hand")
}

#[test]
fn test_session_starts_in_player_action() {
    let session = strikes_vs_cultist();
    assert_eq!(session.phase(), Phase::PlayerAction);
    assert_eq!(session.hand().len(), 5);
    assert_eq!(session.player().energy, 3);
    assert_eq!(session.turns_played(), 1);
    assert_eq!(session.intents().len(), 1);
}

#[rstest]
#[case::missing_target(None, Rejected::MissingTarget)]
#[case::out_of_range(Some(3), Rejected::InvalidTarget(3))]
fn test_rejected_target_changes_nothing(
    #[case] target: Option<usize>,
    #[case] expected: Rejected,
) {
    let mut session = strikes_vs_cultist();
    let before = format!("{session:?}");
    let strike = first_in_hand(&session, "strike");

    assert_eq!(session.try_play_card(strike, target), Err(expected));
    assert_eq!(format!("{session:?}"), before);
}

#[test]
fn test_unknown_card_is_rejected() {
    let session = strikes_vs_cultist();
    let missing = CardInstanceId::new(999);
    assert_eq!(
        session.play_card(missing, Some(0)).err(),
        Some(Rejected::CardNotInHand(missing))
    );
}

#[test]
fn test_energy_runs_out() -> Result<(), Rejected> {
    let mut session = strikes_vs_cultist();
    for _ in 0..3 {
        let strike = first_in_hand(&session, "strike");
        session = session.play_card(strike, Some(0))?;
    }
    assert_eq!(session.player().energy, 0);
    assert_eq!(session.enemies()[0].health.current(), 40 - 18);

    let before = format!("{session:?}");
    let strike = first_in_hand(&session, "strike");
    assert_eq!(
        session.play_card(strike, Some(0)).err(),
        Some(Rejected::InsufficientEnergy {
            required: 1,
            available: 0
        })
    );
    assert_eq!(format!("{session:?}"), before);
    Ok(())
}

#[test]
fn test_pure_transition_leaves_source_untouched() -> Result<(), Rejected> {
    let session = strikes_vs_cultist();
    let before = format!("{session:?}");
    let strike = first_in_hand(&session, "strike");
    let next = session.play_card(strike, Some(0))?;

    assert_eq!(format!("{session:?}"), before);
    assert_eq!(next.hand().len(), 4);
    assert_eq!(next.piles().discard_pile(), &[strike]);
    assert_eq!(next.stats().cards_played, 1);
    assert_eq!(next.stats().card_play_frequency.get("strike"), Some(&1));
    Ok(())
}

#[test]
fn test_block_absorbs_before_hp() {
    let mut player = PlayerState::new(Health::full(50), 3);
    player.gain_block(15);
    let taken = player.take_damage(20);
    assert_eq!(taken.blocked, 15);
    assert_eq!(taken.hp_lost, 5);
    assert_eq!(player.health.current(), 45);
    assert_eq!(player.block, 0);
}

#[test]
fn test_cleave_hits_every_enemy() -> Result<(), Rejected> {
    let session = initialize_combat(
        PlayerState::new(Health::full(80), 3),
        &deck(&[("cleave", 5)]),
        &[
            spawn("spike_slime_small", 14),
            spawn("spike_slime_small", 14),
            spawn("spike_slime_small", 14),
        ],
        options(0),
    );
    let cleave = first_in_hand(&session, "cleave");
    let next = session.play_card(cleave, None)?;

    let hp: Vec<u32> = next.enemies().iter().map(|e| e.health.current()).collect();
    assert_eq!(hp, vec![6, 6, 6]);
    assert_eq!(next.stats().damage_dealt, 24);
    Ok(())
}

#[test]
fn test_fire_potion_targets_one_enemy() -> Result<(), Rejected> {
    let mut player = PlayerState::new(Health::full(80), 3);
    assert!(player.give_potion(gamedata::potion("fire_potion").expect("potion in catalog")));
    let session = initialize_combat(
        player,
        &deck(&[("defend", 5)]),
        &[spawn("cultist", 40), spawn("cultist", 40)],
        options(0),
    );

    assert_eq!(session.use_potion(0, None).err(), Some(Rejected::MissingTarget));
    let next = session.use_potion(0, Some(1))?;
    assert_eq!(next.enemies()[0].health.current(), 40);
    assert_eq!(next.enemies()[1].health.current(), 20);
    assert_eq!(next.use_potion(0, Some(1)).err(), Some(Rejected::EmptyPotionSlot(0)));
    Ok(())
}

#[test]
fn test_block_potion_needs_no_target() -> Result<(), Rejected> {
    let mut player = PlayerState::new(Health::full(80), 3);
    assert!(player.give_potion(gamedata::potion("block_potion").expect("potion in catalog")));
    let session = initialize_combat(player, &deck(&[("defend", 5)]), &[spawn("cultist", 40)], options(0));
    let next = session.use_potion(0, None)?;
    assert_eq!(next.player().block, 12);
    Ok(())
}

#[test]
fn test_ascension_adds_wound_to_combat() {
    let cards = deck(&[("strike", 5), ("defend", 5)]);
    let spawns = [spawn("cultist", 40)];
    let plain = initialize_combat(PlayerState::new(Health::full(80), 3), &cards, &spawns, options(0));
    let wounded = initialize_combat(PlayerState::new(Health::full(80), 3), &cards, &spawns, options(2));

    assert_eq!(plain.piles().total(), 10);
    assert_eq!(wounded.piles().total(), 11);
}

#[test]
fn test_cards_are_conserved_while_playing() {
    let mut session = initialize_combat(
        PlayerState::new(Health::full(80), 3),
        &deck(&[("strike", 5), ("defend", 4), ("bash", 1), ("anger", 2)]),
        &[spawn("jawWorm", 44)],
        options(0),
    );
    let mut strategy = GreedyStrategy::default();
    while !session.is_over() {
        play_turn(&mut session, &mut strategy);
        let piles = session.piles();
        assert_eq!(piles.total(), piles.registered());
        assert_eq!(piles.registered(), 12 + piles.generated());
        assert!(session.player().health.current() <= session.player().health.max());
        if session.try_end_turn().is_err() {
            break;
        }
    }
    assert!(session.is_over());
    assert_eq!(session.end_turn().err(), Some(Rejected::CombatOver));
}

#[test]
fn test_greedy_plans_only_cards_in_hand() {
    let session = strikes_vs_cultist();
    let plan = GreedyStrategy::default().choose_actions(&session);
    assert_eq!(plan.len(), 3);
    assert!(plan.iter().all(|a| session.piles().in_hand(a.card)));
    assert!(plan.iter().all(|a| a.target == Some(0)));
}

fn hand_vs_cultist(cards: &[(&str, usize)]) -> CombatSession {
    initialize_combat(
        PlayerState::new(Health::full(80), 3),
        &deck(cards),
        &[spawn("cultist", 50)],
        options(0),
    )
}

#[rstest]
#[case::dead_on_arrival(vec![spawn("cultist", 0)])]
#[case::no_enemies(vec![])]
fn test_combat_without_living_enemies_is_won(#[case] spawns: Vec<EnemySpawn>) {
    let session = initialize_combat(
        PlayerState::new(Health::full(80), 3),
        &deck(&[("strike", 5)]),
        &spawns,
        options(0),
    );
    assert_eq!(session.phase(), Phase::Victory);
    assert!(session.is_over());
}

#[test]
fn test_clash_needs_an_all_attack_hand() {
    let mut session = hand_vs_cultist(&[("clash", 1), ("defend", 4)]);
    let before = format!("{session:?}");
    let clash = first_in_hand(&session, "clash");

    assert_eq!(
        session.try_play_card(clash, Some(0)),
        Err(Rejected::NonAttackInHand("Clash".to_string()))
    );
    assert_eq!(format!("{session:?}"), before);

    let plan = GreedyStrategy::default().choose_actions(&session);
    assert!(!plan.is_empty());
    assert!(plan.iter().all(|a| a.card != clash));
}

#[test]
fn test_clash_with_only_attacks() -> Result<(), Rejected> {
    let session = hand_vs_cultist(&[("clash", 1), ("strike", 4)]);
    let clash = first_in_hand(&session, "clash");
    let next = session.play_card(clash, Some(0))?;
    assert_eq!(next.enemies()[0].health.current(), 32);
    Ok(())
}

#[test]
fn test_perfected_strike_counts_itself() -> Result<(), Rejected> {
    let session = hand_vs_cultist(&[("perfectedStrike", 1), ("strike", 4)]);
    let card = first_in_hand(&session, "perfectedStrike");
    let next = session.play_card(card, Some(0))?;
    assert_eq!(next.enemies()[0].health.current(), 50 - 16);
    Ok(())
}

#[test]
fn test_corruption_makes_skills_free_and_exhausts_them() -> Result<(), Rejected> {
    let session = hand_vs_cultist(&[("corruption", 1), ("sentinel", 1), ("defend", 3)]);
    let corruption = first_in_hand(&session, "corruption");
    let session = session.play_card(corruption, None)?;
    assert_eq!(session.player().energy, 0);

    let defend = first_in_hand(&session, "defend");
    let session = session.play_card(defend, None)?;
    assert_eq!(session.player().block, 5);
    assert!(session.piles().exhaust_pile().contains(&defend));

    let sentinel = first_in_hand(&session, "sentinel");
    let session = session.play_card(sentinel, None)?;
    assert_eq!(session.player().block, 10);
    assert_eq!(session.player().energy, 2);
    Ok(())
}

#[test]
fn test_battle_trance_stops_later_draws() -> Result<(), Rejected> {
    let session = hand_vs_cultist(&[("battleTrance", 1), ("shrugItOff", 4)]);
    let trance = first_in_hand(&session, "battleTrance");
    let session = session.play_card(trance, None)?;
    assert_eq!(session.hand().len(), 5);

    let shrug = first_in_hand(&session, "shrugItOff");
    let session = session.play_card(shrug, None)?;
    assert_eq!(session.hand().len(), 4);
    assert_eq!(session.piles().discard_pile(), &[shrug]);
    Ok(())
}

#[test]
fn test_feel_no_pain_blocks_on_true_grit() -> Result<(), Rejected> {
    let session = hand_vs_cultist(&[("feelNoPain", 1), ("trueGrit", 1), ("defend", 3)]);
    let power = first_in_hand(&session, "feelNoPain");
    let session = session.play_card(power, None)?;
    assert_eq!(session.player().block, 0);

    let grit = first_in_hand(&session, "trueGrit");
    let session = session.play_card(grit, None)?;
    assert_eq!(session.player().block, 9 + 3);
    assert_eq!(session.hand().len(), 2);
    assert_eq!(session.piles().exhaust_pile().len(), 2);
    Ok(())
}

#[test]
fn test_second_wind_exhausts_non_attacks() -> Result<(), Rejected> {
    let session = hand_vs_cultist(&[("secondWind", 1), ("strike", 2), ("defend", 2)]);
    let wind = first_in_hand(&session, "secondWind");
    let session = session.play_card(wind, None)?;

    assert_eq!(session.player().block, 10);
    assert!(session.hand().iter().all(|c| c.card_id() == "strike"));
    assert_eq!(session.piles().exhaust_pile().len(), 2);
    Ok(())
}

#[test]
fn test_fiend_fire_burns_the_hand() -> Result<(), Rejected> {
    let session = hand_vs_cultist(&[("fiendFire", 1), ("strike", 4)]);
    let fire = first_in_hand(&session, "fiendFire");
    let session = session.play_card(fire, Some(0))?;

    assert_eq!(session.enemies()[0].health.current(), 50 - 28);
    assert!(session.hand().is_empty());
    assert_eq!(session.piles().exhaust_pile().len(), 5);
    Ok(())
}

#[test]
fn test_blood_for_blood_gets_cheaper_after_hp_loss() -> Result<(), Rejected> {
    let session = hand_vs_cultist(&[("bloodForBlood", 1), ("offering", 1), ("strike", 3)]);
    let blood = gamedata::card("bloodForBlood").expect("card in catalog");
    assert_eq!(session.effective_cost(&blood), Cost::Fixed(4));

    let offering = first_in_hand(&session, "offering");
    let session = session.play_card(offering, None)?;
    assert_eq!(session.times_hp_lost(), 1);
    assert_eq!(session.effective_cost(&blood), Cost::Fixed(3));

    let card = first_in_hand(&session, "bloodForBlood");
    let session = session.play_card(card, Some(0))?;
    assert_eq!(session.player().energy, 2);
    assert_eq!(session.enemies()[0].health.current(), 32);
    Ok(())
}

#[test]
fn test_pain_hurts_when_drawn() {
    let session = hand_vs_cultist(&[("curse_pain", 1), ("strike", 4)]);
    assert_eq!(session.player().health.current(), 79);
}

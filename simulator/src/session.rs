use std::sync::Arc;

use indexmap::IndexMap;
use models::{
    CardDefinition, CardType, Cost, EncounterKind, EnemyTemplate, Move, PassiveEffect, PileKind,
    Special, StatusKind, Targeting,
};
use serde::Serialize;
use tracing::debug;

use crate::{
    CardInstance, CardInstanceId, CardPlay, CombatEvent, CombatRng, Combatant, DeckCard,
    EnemyInstance, HAND_LIMIT, MAX_ROUNDS, PileCommand, Piles, PlayerState, Resolution, Side,
    SkipReason, apply_ascension, calculate_block, resolve_card, resolve_potion, should_add_wound,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    RoundStart,
    PlayerAction,
    TurnEnd,
    EnemyAction,
    StatusTick,
    Victory,
    Defeat,
    Timeout,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat | Phase::Timeout)
    }
}

/// Why an action was refused. A refused action leaves the session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    #[error("the combat is over")]
    CombatOver,
    #[error("card {0} is not in hand")]
    CardNotInHand(CardInstanceId),
    #[error("{0} cannot be played")]
    Unplayable(String),
    #[error("not enough energy: {required} required, {available} available")]
    InsufficientEnergy { required: u32, available: u32 },
    #[error("no living enemy at index {0}")]
    InvalidTarget(usize),
    #[error("this card needs a target")]
    MissingTarget,
    #[error("no potion in slot {0}")]
    EmptyPotionSlot(usize),
    #[error("attacks cannot be played while entangled")]
    Entangled,
    #[error("{0} can only be played when every card in hand is an attack")]
    NonAttackInHand(String),
}

#[derive(Clone, Debug)]
pub struct CombatOptions {
    /// `None` seeds from entropy.
    pub seed: Option<u64>,
    pub max_rounds: u32,
    pub ascension: i64,
    pub encounter: EncounterKind,
    pub passives: Vec<PassiveEffect>,
}

impl Default for CombatOptions {
    fn default() -> Self {
        Self {
            seed: None,
            max_rounds: *MAX_ROUNDS,
            ascension: 0,
            encounter: EncounterKind::Normal,
            passives: vec![],
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnemySpawn {
    pub template: Arc<EnemyTemplate>,
    /// Fixed HP instead of a roll from the template range.
    pub hp: Option<u32>,
}

impl EnemySpawn {
    pub fn new(template: Arc<EnemyTemplate>) -> Self {
        Self { template, hp: None }
    }

    pub fn with_hp(template: Arc<EnemyTemplate>, hp: u32) -> Self {
        Self {
            template,
            hp: Some(hp),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CombatStats {
    pub damage_dealt: u32,
    pub damage_received: u32,
    pub cards_played: u32,
    /// Accepted plays per catalog card id, in first-played order.
    pub card_play_frequency: IndexMap<String, u32>,
}

/// One combat, from encounter setup to a terminal phase.
///
/// Actions come in two flavours: `play_card`, `end_turn` and `use_potion` leave `self` untouched
/// and return the next session, while the `try_*` counterparts mutate in place. Either way a
/// rejected action changes nothing.
#[derive(Clone, Debug)]
pub struct CombatSession {
    pub(crate) player: PlayerState,
    pub(crate) enemies: Vec<EnemyInstance>,
    pub(crate) piles: Piles,
    pub(crate) round: u32,
    pub(crate) turns_played: u32,
    pub(crate) phase: Phase,
    pub(crate) log: Vec<CombatEvent>,
    pub(crate) rng: CombatRng,
    pub(crate) options: CombatOptions,
    pub(crate) stats: CombatStats,
}

/// Builds a session and runs the first round start, leaving it ready for the player's first
/// action.
pub fn initialize_combat(
    player: PlayerState,
    deck: &[DeckCard],
    spawns: &[EnemySpawn],
    options: CombatOptions,
) -> CombatSession {
    let mut rng = options
        .seed
        .map(CombatRng::from_seed)
        .unwrap_or_else(CombatRng::from_entropy);
    let wound = should_add_wound(options.ascension).then(gamedata::wound);
    let piles = Piles::build(deck, wound, &mut rng);

    let enemies = spawns
        .iter()
        .enumerate()
        .map(|(index, spawn)| {
            let enemy = match spawn.hp {
                Some(hp) => EnemyInstance::new(spawn.template.clone(), hp, index),
                None => EnemyInstance::spawn(spawn.template.clone(), index, &mut rng),
            };
            apply_ascension(enemy, options.ascension, options.encounter)
        })
        .collect();

    let mut player = player;
    let starting_block: u32 = options
        .passives
        .iter()
        .filter_map(|p| player.apply_passive(p))
        .sum();

    let mut session = CombatSession {
        player,
        enemies,
        piles,
        round: 0,
        turns_played: 0,
        phase: Phase::RoundStart,
        log: vec![],
        rng,
        options,
        stats: CombatStats::default(),
    };
    session.begin_round();
    session.check_terminal();
    if starting_block > 0 && !session.is_over() {
        session.player.gain_block(starting_block);
        session.log.push(CombatEvent::Block {
            target: Side::Player,
            amount: starting_block,
        });
    }
    session
}

impl CombatSession {
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn enemies(&self) -> &[EnemyInstance] {
        &self.enemies
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = (usize, &EnemyInstance)> {
        self.enemies.iter().enumerate().filter(|(_, e)| e.is_alive())
    }

    /// Telegraphed moves of living enemies for the current round.
    pub fn intents(&self) -> Vec<(usize, &Move)> {
        self.living_enemies()
            .filter_map(|(i, e)| e.intent_move().map(|m| (i, m)))
            .collect()
    }

    pub fn piles(&self) -> &Piles {
        &self.piles
    }

    pub fn hand(&self) -> Vec<&CardInstance> {
        self.piles.hand_cards().collect()
    }

    pub fn log(&self) -> &[CombatEvent] {
        &self.log
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    pub fn options(&self) -> &CombatOptions {
        &self.options
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn play_card(
        &self,
        card: CardInstanceId,
        target: Option<usize>,
    ) -> Result<CombatSession, Rejected> {
        let mut next = self.clone();
        next.try_play_card(card, target)?;
        Ok(next)
    }

    pub fn end_turn(&self) -> Result<CombatSession, Rejected> {
        let mut next = self.clone();
        next.try_end_turn()?;
        Ok(next)
    }

    pub fn use_potion(
        &self,
        slot: usize,
        target: Option<usize>,
    ) -> Result<CombatSession, Rejected> {
        let mut next = self.clone();
        next.try_use_potion(slot, target)?;
        Ok(next)
    }

    fn ensure_player_action(&self) -> Result<(), Rejected> {
        match self.phase {
            Phase::PlayerAction => Ok(()),
            _ => Err(Rejected::CombatOver),
        }
    }

    fn validate_target(
        &self,
        targeting: Targeting,
        target: Option<usize>,
    ) -> Result<Option<usize>, Rejected> {
        if targeting != Targeting::SingleEnemy {
            return Ok(None);
        }
        let index = target.ok_or(Rejected::MissingTarget)?;
        match self.enemies.get(index) {
            Some(enemy) if enemy.is_alive() => Ok(Some(index)),
            _ => Err(Rejected::InvalidTarget(index)),
        }
    }

    /// HP-loss events the player has suffered so far, blocked hits excluded.
    pub fn times_hp_lost(&self) -> u32 {
        self.log.iter().filter(|e| e.player_hp_lost() > 0).count() as u32
    }

    /// Cost of `card` right now, after Corruption and HP-loss discounts.
    pub fn effective_cost(&self, card: &CardDefinition) -> Cost {
        match card.cost {
            Cost::Fixed(_)
                if card.card_type == CardType::Skill
                    && self.player.statuses.has(StatusKind::Corruption) =>
            {
                Cost::Fixed(0)
            }
            Cost::Fixed(n) if card.special == Some(Special::CostReducedByHpLoss) => {
                Cost::Fixed(n.saturating_sub(self.times_hp_lost()))
            }
            cost => cost,
        }
    }

    /// Every rule on `card` except energy and targeting.
    fn check_playable(&self, card: &CardInstance) -> Result<(), Rejected> {
        let definition = card.definition();
        if !definition.is_playable() {
            return Err(Rejected::Unplayable(definition.name.clone()));
        }
        if definition.is_attack() && self.player.statuses.has(StatusKind::Entangled) {
            return Err(Rejected::Entangled);
        }
        if definition.special == Some(Special::OnlyAttacksInHand)
            && self
                .piles
                .hand_cards()
                .any(|c| c.id != card.id && !c.definition().is_attack())
        {
            return Err(Rejected::NonAttackInHand(definition.name.clone()));
        }
        Ok(())
    }

    /// Whether `card` could be played if there were energy for it.
    pub fn is_playable_now(&self, card: &CardInstance) -> bool {
        self.check_playable(card).is_ok()
    }

    fn card_play(&self, instance: &CardInstance, target: Option<usize>, spent: u32) -> CardPlay {
        let strikes = match instance.definition().special {
            Some(Special::BonusPerStrike { .. }) => self
                .piles
                .count(|c| c.definition().name.to_lowercase().contains("strike")),
            _ => 0,
        };
        CardPlay {
            target,
            energy_spent: spent,
            upgraded: instance.upgraded,
            strikes: strikes as u32,
            hand_size: self.piles.hand().len() as u32,
            status_cards_in_hand: self
                .piles
                .hand_cards()
                .filter(|c| matches!(c.definition().card_type, CardType::Status | CardType::Curse))
                .count() as u32,
        }
    }

    /// Validates and plays `card` from hand. Nothing is mutated unless the play is accepted.
    pub fn try_play_card(
        &mut self,
        card: CardInstanceId,
        target: Option<usize>,
    ) -> Result<(), Rejected> {
        self.ensure_player_action()?;
        let instance = self
            .piles
            .get(card)
            .filter(|_| self.piles.in_hand(card))
            .cloned()
            .ok_or(Rejected::CardNotInHand(card))?;
        let definition = instance.definition();
        self.check_playable(&instance)?;
        let available = self.player.energy;
        let cost = self.effective_cost(definition);
        let spent = cost.payable(available).ok_or(Rejected::InsufficientEnergy {
            required: match cost {
                Cost::Fixed(n) => n,
                _ => 0,
            },
            available,
        })?;
        let target = self.validate_target(definition.targeting, target)?;

        self.piles.take_from_hand(card);
        self.player.energy -= spent;
        if definition.hp_cost > 0 {
            self.lose_own_hp(definition.hp_cost, false);
        }
        self.count_play(definition.card_type);
        debug!(card = %definition.name, ?target, spent, "card played");
        self.log.push(CombatEvent::CardPlayed {
            card: definition.name.clone(),
            target,
            energy: spent,
        });

        let play = self.card_play(&instance, target, spent);
        let resolution = resolve_card(
            definition,
            &play,
            &self.player,
            &self.enemies,
            &mut self.rng,
        );
        let commands = self.absorb(resolution);

        let corrupted = definition.card_type == CardType::Skill
            && self.player.statuses.has(StatusKind::Corruption);
        if definition.card_type == CardType::Power {
            self.piles.to_exhaust(card);
            self.log.push(CombatEvent::Exhausted(card));
        } else if definition.flags.exhausts || corrupted {
            self.exhaust_card(card);
        } else {
            self.piles.to_discard(card);
        }
        self.run_commands(commands, Some(&instance));

        self.stats.cards_played += 1;
        *self
            .stats
            .card_play_frequency
            .entry(instance.card_id().to_string())
            .or_insert(0) += 1;
        self.check_terminal();
        Ok(())
    }

    fn count_play(&mut self, card_type: CardType) {
        self.player.counters.cards += 1;
        match card_type {
            CardType::Attack => {
                self.player.counters.attacks += 1;
                let rage = self.player.statuses.stacks(StatusKind::Rage);
                if rage > 0 {
                    self.player.gain_block(rage);
                    self.log.push(CombatEvent::Block {
                        target: Side::Player,
                        amount: rage,
                    });
                }
            }
            CardType::Skill => {
                self.player.counters.skills += 1;
                for (index, enemy) in self.enemies.iter_mut().enumerate() {
                    let enrage = enemy.statuses.get(StatusKind::Enrage);
                    if enemy.is_alive() && enrage > 0 {
                        enemy.statuses.add(StatusKind::Strength, enrage);
                        self.log.push(CombatEvent::Status {
                            target: Side::Enemy(index),
                            status: StatusKind::Strength,
                            amount: enrage,
                        });
                    }
                }
            }
            CardType::Power => self.player.counters.powers += 1,
            CardType::Status | CardType::Curse => {}
        }
    }

    pub fn try_end_turn(&mut self) -> Result<(), Rejected> {
        self.ensure_player_action()?;
        self.finish_turn();
        Ok(())
    }

    pub fn try_use_potion(&mut self, slot: usize, target: Option<usize>) -> Result<(), Rejected> {
        self.ensure_player_action()?;
        let potion = self
            .player
            .potions
            .get(slot)
            .cloned()
            .flatten()
            .ok_or(Rejected::EmptyPotionSlot(slot))?;
        let targeting = match potion.target {
            models::PotionTarget::Enemy => Targeting::SingleEnemy,
            _ => Targeting::SelfOnly,
        };
        let target = self.validate_target(targeting, target)?;

        self.player.potions[slot] = None;
        debug!(potion = %potion.name, ?target, "potion used");
        self.log.push(CombatEvent::PotionUsed {
            potion: potion.name.clone(),
            target,
        });
        let resolution = resolve_potion(&potion, &self.player, &self.enemies, target);
        let commands = self.absorb(resolution);
        self.run_commands(commands, None);
        self.check_terminal();
        Ok(())
    }

    pub(crate) fn absorb(&mut self, resolution: Resolution) -> Vec<PileCommand> {
        self.player = resolution.player;
        self.enemies = resolution.enemies;
        self.log.extend(resolution.events);
        self.stats.damage_dealt += resolution.damage_dealt;
        self.stats.damage_received += resolution.damage_received;
        resolution.commands
    }

    /// Draws `count` cards unless drawing is blocked this turn, then runs the on-draw triggers
    /// of each drawn card. Evolve draws chain until no Status card comes up.
    pub(crate) fn draw_cards(&mut self, count: usize) {
        let mut pending = count;
        while pending > 0 && !self.player.statuses.has(StatusKind::NoDraw) {
            let (drawn, reshuffled) = self.piles.draw(pending, *HAND_LIMIT, &mut self.rng);
            pending = 0;
            if reshuffled {
                self.log.push(CombatEvent::Reshuffled);
            }
            if drawn.is_empty() {
                break;
            }
            self.log.push(CombatEvent::Drew(drawn.clone()));
            for id in drawn {
                pending += self.on_draw(id);
            }
        }
    }

    /// Triggers for a freshly drawn card. Returns the extra cards to draw.
    fn on_draw(&mut self, id: CardInstanceId) -> usize {
        let Some((card_type, special)) = self
            .piles
            .get(id)
            .map(|c| (c.definition().card_type, c.definition().special.clone()))
        else {
            return 0;
        };
        match special {
            Some(Special::HpLossWhenDrawn { amount }) => {
                let lost = self.player.lose_hp(amount);
                self.log.push(CombatEvent::HpLost {
                    target: Side::Player,
                    amount: lost,
                });
            }
            Some(Special::EnergyLossWhenDrawn { amount }) => {
                self.player.energy = self.player.energy.saturating_sub(amount);
            }
            _ => {}
        }
        if matches!(card_type, CardType::Status | CardType::Curse) {
            let fire_breathing = self.player.statuses.stacks(StatusKind::FireBreathing);
            if fire_breathing > 0 {
                self.damage_all_enemies(fire_breathing);
            }
        }
        match card_type {
            CardType::Status => self.player.statuses.stacks(StatusKind::Evolve) as usize,
            _ => 0,
        }
    }

    /// Unmodified damage to every living enemy from a player power.
    pub(crate) fn damage_all_enemies(&mut self, amount: u32) {
        for (index, enemy) in self.enemies.iter_mut().enumerate() {
            if enemy.is_dead() {
                continue;
            }
            let taken = enemy.take_damage(amount);
            self.stats.damage_dealt += taken.hp_lost;
            self.log.push(CombatEvent::Damage {
                source: Side::Player,
                target: Side::Enemy(index),
                amount,
                blocked: taken.blocked,
            });
            if enemy.is_dead() {
                self.log.push(CombatEvent::Died(Side::Enemy(index)));
            }
        }
    }

    /// Moves `id` to the exhaust pile and runs the exhaust triggers: the card's own energy
    /// refund, then Feel No Pain block, then Dark Embrace draws.
    pub(crate) fn exhaust_card(&mut self, id: CardInstanceId) {
        self.piles.to_exhaust(id);
        self.log.push(CombatEvent::Exhausted(id));
        if let Some(Special::EnergyOnExhaust { amount }) =
            self.piles.get(id).and_then(|c| c.definition().special.clone())
        {
            self.player.energy += amount;
            self.log.push(CombatEvent::EnergyGained(amount));
        }
        let feel_no_pain = self.player.statuses.stacks(StatusKind::FeelNoPain);
        if feel_no_pain > 0 {
            self.player.gain_block(feel_no_pain);
            self.log.push(CombatEvent::Block {
                target: Side::Player,
                amount: feel_no_pain,
            });
        }
        let dark_embrace = self.player.statuses.stacks(StatusKind::DarkEmbrace);
        if dark_embrace > 0 {
            self.draw_cards(dark_embrace as usize);
        }
    }

    /// Self-inflicted HP loss. Rupture turns any loss into Strength.
    pub(crate) fn lose_own_hp(&mut self, amount: u32, lethal: bool) -> u32 {
        let lost = match lethal {
            true => self.player.lose_hp(amount),
            false => self.player.lose_hp_nonlethal(amount),
        };
        self.log.push(CombatEvent::HpLost {
            target: Side::Player,
            amount: lost,
        });
        let rupture = self.player.statuses.get(StatusKind::Rupture);
        if lost > 0 && rupture > 0 {
            self.player.statuses.add(StatusKind::Strength, rupture);
            self.log.push(CombatEvent::Status {
                target: Side::Player,
                status: StatusKind::Strength,
                amount: rupture,
            });
        }
        lost
    }

    pub(crate) fn run_commands(&mut self, commands: Vec<PileCommand>, played: Option<&CardInstance>) {
        for command in commands {
            match command {
                PileCommand::Draw(n) => self.draw_cards(n as usize),
                PileCommand::AddCard { card, pile, count } => {
                    let Some(definition) = gamedata::card(&card) else {
                        self.log.push(CombatEvent::Skip(SkipReason::UnknownCard(card)));
                        continue;
                    };
                    for _ in 0..count {
                        self.piles
                            .add(definition.clone(), false, pile, *HAND_LIMIT, &mut self.rng);
                        self.log.push(CombatEvent::CardAdded {
                            card: definition.name.clone(),
                            pile,
                        });
                    }
                }
                PileCommand::CopyPlayed => {
                    if let Some(played) = played {
                        self.piles.add(
                            played.base.clone(),
                            played.upgraded,
                            PileKind::Discard,
                            *HAND_LIMIT,
                            &mut self.rng,
                        );
                        self.log.push(CombatEvent::CardAdded {
                            card: played.definition().name.clone(),
                            pile: PileKind::Discard,
                        });
                    }
                }
                PileCommand::UpgradeInHand { all } => {
                    let upgraded = self.piles.upgrade_in_hand(all, &mut self.rng);
                    if upgraded.is_empty() {
                        self.log.push(CombatEvent::Skip(SkipReason::NothingToUpgrade));
                    }
                    self.log
                        .extend(upgraded.into_iter().map(CombatEvent::Upgraded));
                }
                PileCommand::StopDrawing => {
                    if !self.player.statuses.has(StatusKind::NoDraw) {
                        self.player.statuses.add(StatusKind::NoDraw, 1);
                        self.log.push(CombatEvent::Status {
                            target: Side::Player,
                            status: StatusKind::NoDraw,
                            amount: 1,
                        });
                    }
                }
                PileCommand::ExhaustRandom => {
                    let hand = self.piles.hand().to_vec();
                    if let Some(id) = self.rng.pick(&hand).copied() {
                        self.piles.take_from_hand(id);
                        self.exhaust_card(id);
                    }
                }
                PileCommand::ExhaustHand {
                    keep_attacks,
                    block_each,
                } => {
                    let chosen: Vec<CardInstanceId> = self
                        .piles
                        .hand_cards()
                        .filter(|c| !(keep_attacks && c.definition().is_attack()))
                        .map(|c| c.id)
                        .collect();
                    for &id in &chosen {
                        self.piles.take_from_hand(id);
                        self.exhaust_card(id);
                    }
                    let block = calculate_block(block_each, &self.player.statuses)
                        * chosen.len() as u32;
                    if block_each > 0 && block > 0 {
                        self.player.gain_block(block);
                        self.log.push(CombatEvent::Block {
                            target: Side::Player,
                            amount: block,
                        });
                    }
                }
            }
        }
    }

    /// Moves to Defeat or Victory when either side is wiped out. Defeat wins a tie.
    pub(crate) fn check_terminal(&mut self) -> bool {
        if self.phase.is_terminal() {
            return true;
        }
        if self.player.is_dead() {
            self.phase = Phase::Defeat;
            self.log.push(CombatEvent::Defeat);
        } else if self.enemies.iter().all(|e| e.is_dead()) {
            self.phase = Phase::Victory;
            self.log.push(CombatEvent::Victory);
        }
        self.phase.is_terminal()
    }
}

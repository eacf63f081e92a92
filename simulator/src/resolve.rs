//! Applies one card, enemy move or potion to a snapshot of the combat.
//!
//! Every entry point takes the current player and enemies by reference and returns a
//! [`Resolution`] holding the new values. Effects that touch the piles are not applied here;
//! they come back as [`PileCommand`]s for the session to run once the played card has moved.

use models::{
    CardDefinition, Cost, EffectTarget, Move, PileKind, PotionDefinition, PotionEffect, Special,
    StatusKind, Targeting,
};
use tracing::debug;

use crate::{
    Applied, CombatEvent, CombatRng, Combatant, DamageTaken, EnemyInstance, PlayerState, Side,
    SkipReason, calculate_block, calculate_damage, scale_enemy_damage,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PileCommand {
    Draw(u32),
    AddCard {
        card: String,
        pile: PileKind,
        count: u32,
    },
    /// A fresh copy of the card being played goes to the discard pile.
    CopyPlayed,
    UpgradeInHand {
        all: bool,
    },
    /// Later draw effects this turn do nothing.
    StopDrawing,
    ExhaustRandom,
    /// Exhausts the hand, or only its non-Attacks, gaining `block_each` per exhausted card.
    ExhaustHand {
        keep_attacks: bool,
        block_each: u32,
    },
}

/// What the session knows about a play beyond the card definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CardPlay {
    pub target: Option<usize>,
    /// Energy the cost consumed; X-cost cards repeat their hits that many times.
    pub energy_spent: u32,
    pub upgraded: bool,
    /// Cards named "Strike" across every pile, the played card included.
    pub strikes: u32,
    /// Cards left in hand once the played card has left it.
    pub hand_size: u32,
    pub status_cards_in_hand: u32,
}

#[derive(Clone, Debug)]
pub struct Resolution {
    pub player: PlayerState,
    pub enemies: Vec<EnemyInstance>,
    pub commands: Vec<PileCommand>,
    pub events: Vec<CombatEvent>,
    /// HP removed from enemies by the player.
    pub damage_dealt: u32,
    /// HP removed from the player by enemies.
    pub damage_received: u32,
}

impl Resolution {
    fn start(player: &PlayerState, enemies: &[EnemyInstance]) -> Self {
        Self {
            player: player.clone(),
            enemies: enemies.to_vec(),
            commands: vec![],
            events: vec![],
            damage_dealt: 0,
            damage_received: 0,
        }
    }

    fn living(&self) -> Vec<usize> {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    fn alive(&self, index: usize) -> bool {
        self.enemies.get(index).is_some_and(|e| e.is_alive())
    }

    /// Enemies a card effect lands on given its targeting mode.
    fn targets(
        &self,
        targeting: Targeting,
        chosen: Option<usize>,
        rng: &mut CombatRng,
    ) -> Vec<usize> {
        match targeting {
            Targeting::AllEnemies => self.living(),
            Targeting::RandomEnemy => rng.pick(&self.living()).copied().into_iter().collect(),
            Targeting::SingleEnemy | Targeting::SelfOnly => {
                chosen.filter(|i| self.alive(*i)).into_iter().collect()
            }
        }
    }

    fn hit_enemy(&mut self, index: usize, amount: u32) -> DamageTaken {
        let enemy = &mut self.enemies[index];
        let taken = enemy.take_damage(amount);
        let died = enemy.is_dead();
        self.damage_dealt += taken.hp_lost;
        self.events.push(CombatEvent::Damage {
            source: Side::Player,
            target: Side::Enemy(index),
            amount,
            blocked: taken.blocked,
        });
        if died {
            self.events.push(CombatEvent::Died(Side::Enemy(index)));
        }
        taken
    }

    /// A card attack hit. Unlike potion or Juggernaut damage it sets off Thorns.
    fn attack_enemy(&mut self, index: usize, amount: u32) -> DamageTaken {
        let taken = self.hit_enemy(index, amount);
        let thorns = self.enemies[index].statuses.stacks(StatusKind::Thorns);
        if thorns > 0 {
            let thorns_taken = self.player.take_damage(thorns);
            self.damage_received += thorns_taken.hp_lost;
            self.events.push(CombatEvent::Damage {
                source: Side::Enemy(index),
                target: Side::Player,
                amount: thorns,
                blocked: thorns_taken.blocked,
            });
        }
        taken
    }

    fn strike_player(&mut self, attacker: usize, amount: u32) {
        let taken = self.player.take_damage(amount);
        self.damage_received += taken.hp_lost;
        self.events.push(CombatEvent::Damage {
            source: Side::Enemy(attacker),
            target: Side::Player,
            amount,
            blocked: taken.blocked,
        });
        if taken.hp_lost > 0 && self.player.statuses.has(StatusKind::PlatedArmor) {
            self.player.statuses.add(StatusKind::PlatedArmor, -1);
        }
        let retaliation = self.player.statuses.stacks(StatusKind::FlameBarrier);
        if retaliation > 0 {
            let enemy = &mut self.enemies[attacker];
            let lost = enemy.lose_hp(retaliation);
            let died = enemy.is_dead();
            self.damage_dealt += lost;
            self.events.push(CombatEvent::HpLost {
                target: Side::Enemy(attacker),
                amount: lost,
            });
            if died {
                self.events.push(CombatEvent::Died(Side::Enemy(attacker)));
            }
        }
    }

    fn player_block(&mut self, amount: u32, rng: &mut CombatRng) {
        if amount == 0 {
            return;
        }
        self.player.gain_block(amount);
        self.events.push(CombatEvent::Block {
            target: Side::Player,
            amount,
        });
        let juggernaut = self.player.statuses.stacks(StatusKind::Juggernaut);
        if juggernaut > 0 {
            if let Some(index) = rng.pick(&self.living()).copied() {
                self.hit_enemy(index, juggernaut);
            }
        }
    }

    fn apply_status(&mut self, side: Side, status: StatusKind, amount: i32) -> Applied {
        let applied = match side {
            Side::Player => self.player.apply_status(status, amount),
            Side::Enemy(i) => self.enemies[i].apply_status(status, amount),
        };
        self.events.push(match applied {
            Applied::Applied => CombatEvent::Status {
                target: side,
                status,
                amount,
            },
            Applied::Negated => CombatEvent::StatusNegated {
                target: side,
                status,
            },
        });
        applied
    }

    /// Self-inflicted HP loss that cannot kill. Rupture turns any loss into Strength.
    fn lose_own_hp(&mut self, amount: u32) -> u32 {
        let lost = self.player.lose_hp_nonlethal(amount);
        self.events.push(CombatEvent::HpLost {
            target: Side::Player,
            amount: lost,
        });
        let rupture = self.player.statuses.get(StatusKind::Rupture);
        if lost > 0 && rupture > 0 {
            self.apply_status(Side::Player, StatusKind::Strength, rupture);
        }
        lost
    }

    fn gain_energy(&mut self, amount: u32) {
        if amount > 0 {
            self.player.energy += amount;
            self.events.push(CombatEvent::EnergyGained(amount));
        }
    }

    fn skip_special(&mut self, special: &Special) {
        debug!(special = %special, "special has no handler, skipping");
        self.events.push(CombatEvent::Skip(SkipReason::UnsupportedSpecial(
            special.tag().to_string(),
        )));
    }
}

/// Base damage of one hit, for cards whose damage depends on the rest of the combat.
fn base_damage(card: &CardDefinition, play: &CardPlay, block: u32) -> Option<u32> {
    let printed = card.damage.map(|d| d.base());
    match card.special {
        Some(Special::DamageEqualBlock) => Some(block),
        Some(Special::BonusPerStrike { per_strike }) => {
            printed.map(|d| d + per_strike * play.strikes)
        }
        Some(Special::ExhaustHandForDamage) => {
            printed.map(|d| d * play.hand_size).filter(|d| *d > 0)
        }
        Some(Special::DamagePerStatusInHand) => printed
            .map(|d| d * play.status_cards_in_hand)
            .filter(|d| *d > 0),
        Some(Special::DamagePerUpgrade) => {
            let n = play.upgraded as u32;
            printed.map(|d| d + 4 * n + n * n.saturating_sub(1) / 2)
        }
        _ => printed,
    }
}

/// Resolves `card` played by the player.
pub fn resolve_card(
    card: &CardDefinition,
    play: &CardPlay,
    player: &PlayerState,
    enemies: &[EnemyInstance],
    rng: &mut CombatRng,
) -> Resolution {
    let mut r = Resolution::start(player, enemies);
    let target = play.target;
    let hits = match card.cost {
        Cost::X => card.hits * play.energy_spent,
        _ => card.hits,
    };
    let target_vulnerable = target
        .and_then(|i| r.enemies.get(i))
        .is_some_and(|e| e.statuses.has(StatusKind::Vulnerable));

    let doubled = card.is_attack() && r.player.statuses.has(StatusKind::DoubleTap);
    if doubled {
        r.player.statuses.add(StatusKind::DoubleTap, -1);
    }

    let base = base_damage(card, play, r.player.block);
    let mut last_hit = None;
    let mut killed = false;
    let mut healed_from = 0;
    if let Some(base) = base {
        for _ in 0..hits {
            let targets = r.targets(card.targeting, target, rng);
            if targets.is_empty() {
                break;
            }
            for index in targets {
                let mut damage = calculate_damage(
                    base,
                    card.strength_multiplier,
                    &r.player.statuses,
                    &r.enemies[index].statuses,
                    r.player.vulnerable_bonus,
                );
                if doubled {
                    damage *= 2;
                }
                let taken = r.attack_enemy(index, damage);
                healed_from += taken.hp_lost;
                killed |= r.enemies[index].is_dead();
                last_hit = Some(index);
            }
            if r.player.is_dead() {
                break;
            }
        }
    }

    if card.block > 0 {
        let block = calculate_block(card.block, &r.player.statuses);
        r.player_block(block, rng);
    }

    let effect_targets = match (card.targeting, last_hit) {
        (Targeting::RandomEnemy, Some(index)) => vec![index],
        (targeting, _) => r.targets(targeting, target, rng),
    };
    for effect in &card.effects {
        match effect.target {
            EffectTarget::Source => {
                r.apply_status(Side::Player, effect.status, effect.amount);
            }
            EffectTarget::Opponent => {
                for &index in &effect_targets {
                    r.apply_status(Side::Enemy(index), effect.status, effect.amount);
                }
            }
        }
    }

    if card.draw > 0 {
        r.commands.push(PileCommand::Draw(card.draw));
    }
    r.gain_energy(card.energy_gain);

    if let Some(special) = &card.special {
        match special {
            Special::DamageEqualBlock
            | Special::EndOfTurnDamage { .. }
            | Special::OnlyAttacksInHand
            | Special::BonusPerStrike { .. }
            | Special::DamagePerStatusInHand
            | Special::DamagePerUpgrade
            | Special::CostReducedByHpLoss
            | Special::EnergyOnExhaust { .. }
            | Special::HpLossWhenDrawn { .. }
            | Special::EnergyLossWhenDrawn { .. }
            | Special::HpLossPerCardInHand
            | Special::WeakAtEndOfTurn { .. } => {}
            Special::DoubleBlock => {
                let block = r.player.block;
                r.player_block(block, rng);
            }
            Special::DoubleStrength => {
                let strength = r.player.strength();
                if strength > 0 {
                    r.apply_status(Side::Player, StatusKind::Strength, strength);
                }
            }
            Special::HpForEnergy { hp_loss, energy } => {
                r.lose_own_hp(*hp_loss);
                r.gain_energy(*energy);
            }
            Special::RetainAllBlock => {
                r.apply_status(Side::Player, StatusKind::Barricade, 1);
            }
            Special::RemoveStrength { amount } => {
                for &index in &effect_targets {
                    r.apply_status(Side::Enemy(index), StatusKind::Strength, -amount);
                }
            }
            Special::TempStrengthDown { amount } => {
                for &index in &effect_targets {
                    let side = Side::Enemy(index);
                    if r.apply_status(side, StatusKind::Strength, -amount) == Applied::Applied {
                        r.enemies[index]
                            .statuses
                            .add(StatusKind::RegainStrength, *amount);
                    }
                }
            }
            Special::FlexStrength { amount } => {
                r.apply_status(Side::Player, StatusKind::LoseStrength, *amount);
            }
            Special::Metallicize { amount } => {
                r.apply_status(Side::Player, StatusKind::Metallicize, *amount);
            }
            Special::StrengthEachTurn { amount } => {
                r.apply_status(Side::Player, StatusKind::DemonForm, *amount);
            }
            Special::BlockPerAttack { amount } => {
                r.apply_status(Side::Player, StatusKind::Rage, *amount);
            }
            Special::RetaliateOnHit { amount } => {
                r.apply_status(Side::Player, StatusKind::FlameBarrier, *amount);
            }
            Special::HpForDraw => {
                r.apply_status(Side::Player, StatusKind::Brutality, 1);
            }
            Special::HpForAoeDamage { hp_loss, damage } => {
                r.player.combust_hp_loss += hp_loss;
                r.apply_status(Side::Player, StatusKind::Combust, *damage as i32);
            }
            Special::DamageOnBlock { amount } => {
                r.apply_status(Side::Player, StatusKind::Juggernaut, *amount);
            }
            Special::SelfVulnerableForEnergy { energy } => {
                r.apply_status(Side::Player, StatusKind::Berserk, *energy);
            }
            Special::DoubleNextAttack { count } => {
                r.apply_status(Side::Player, StatusKind::DoubleTap, *count);
            }
            Special::Lifesteal => {
                let healed = r.player.heal(healed_from);
                r.events.push(CombatEvent::Healed {
                    target: Side::Player,
                    amount: healed,
                });
            }
            Special::AddCopyToDiscard => r.commands.push(PileCommand::CopyPlayed),
            Special::AddCard { card, pile, count } => r.commands.push(PileCommand::AddCard {
                card: card.clone(),
                pile: *pile,
                count: *count,
            }),
            Special::UpgradeInHand { all } => {
                r.commands.push(PileCommand::UpgradeInHand { all: *all })
            }
            Special::BonusIfVulnerable { energy, draw } => {
                if target_vulnerable {
                    r.gain_energy(*energy);
                    r.commands.push(PileCommand::Draw(*draw));
                }
            }
            Special::StrengthOnKill { amount } => {
                if killed {
                    r.apply_status(Side::Player, StatusKind::Strength, *amount);
                }
            }
            Special::MaxHpOnKill { amount } => {
                if killed {
                    r.player.health.raise_max(*amount);
                    r.events.push(CombatEvent::Healed {
                        target: Side::Player,
                        amount: *amount,
                    });
                }
            }
            Special::NoDrawThisTurn => r.commands.push(PileCommand::StopDrawing),
            Special::StrengthIfAttacking { amount } => {
                let attacking = target
                    .and_then(|i| r.enemies.get(i))
                    .and_then(|e| e.intent_move())
                    .is_some_and(|m| m.intent.is_attack());
                if attacking {
                    r.apply_status(Side::Player, StatusKind::Strength, *amount);
                }
            }
            Special::BlockOnExhaust { amount } => {
                r.apply_status(Side::Player, StatusKind::FeelNoPain, *amount);
            }
            Special::DrawOnExhaust { amount } => {
                r.apply_status(Side::Player, StatusKind::DarkEmbrace, *amount);
            }
            Special::StrengthOnSelfHpLoss { amount } => {
                r.apply_status(Side::Player, StatusKind::Rupture, *amount);
            }
            Special::FreeSkillsExhaust => {
                if !r.player.statuses.has(StatusKind::Corruption) {
                    r.apply_status(Side::Player, StatusKind::Corruption, 1);
                }
            }
            Special::DrawOnStatus { amount } => {
                r.apply_status(Side::Player, StatusKind::Evolve, *amount);
            }
            Special::DamageOnStatusDraw { amount } => {
                r.apply_status(Side::Player, StatusKind::FireBreathing, *amount);
            }
            Special::ExhaustRandom => r.commands.push(PileCommand::ExhaustRandom),
            Special::ExhaustNonAttacks { block_each } => r.commands.push(PileCommand::ExhaustHand {
                keep_attacks: true,
                block_each: *block_each,
            }),
            Special::ExhaustHandForDamage => r.commands.push(PileCommand::ExhaustHand {
                keep_attacks: false,
                block_each: 0,
            }),
            Special::HealLowestAlly { .. } | Special::Unsupported(..) => r.skip_special(special),
        }
    }
    r
}

/// Resolves `enemies[actor]` performing `mv` against the player.
pub fn resolve_enemy_move(
    mv: &Move,
    actor: usize,
    enemies: &[EnemyInstance],
    player: &PlayerState,
) -> Resolution {
    let mut r = Resolution::start(player, enemies);
    if !r.alive(actor) {
        return r;
    }

    if let Some(damage) = mv.damage {
        for _ in 0..mv.hits {
            if r.player.is_dead() || !r.alive(actor) {
                break;
            }
            let enemy = &r.enemies[actor];
            let amount = scale_enemy_damage(
                calculate_damage(damage.base(), 1, &enemy.statuses, &r.player.statuses, 0.0),
                enemy.damage_multiplier,
            );
            r.strike_player(actor, amount);
        }
    }

    if mv.block > 0 && r.alive(actor) {
        let enemy = &mut r.enemies[actor];
        let block = calculate_block(mv.block, &enemy.statuses);
        enemy.gain_block(block);
        r.events.push(CombatEvent::Block {
            target: Side::Enemy(actor),
            amount: block,
        });
    }

    for effect in &mv.effects {
        let side = match effect.target {
            EffectTarget::Source => Side::Enemy(actor),
            EffectTarget::Opponent => Side::Player,
        };
        r.apply_status(side, effect.status, effect.amount);
    }

    if let Some(special) = &mv.special {
        match special {
            Special::AddCard { card, pile, count } => r.commands.push(PileCommand::AddCard {
                card: card.clone(),
                pile: *pile,
                count: *count,
            }),
            Special::HealLowestAlly { amount } => {
                let lowest = r
                    .living()
                    .into_iter()
                    .filter(|i| r.enemies[*i].health.missing() > 0)
                    .min_by_key(|i| r.enemies[*i].health.current());
                if let Some(index) = lowest {
                    let healed = r.enemies[index].heal(*amount);
                    r.events.push(CombatEvent::Healed {
                        target: Side::Enemy(index),
                        amount: healed,
                    });
                }
            }
            Special::Metallicize { amount } => {
                r.apply_status(Side::Enemy(actor), StatusKind::Metallicize, *amount);
            }
            Special::StrengthEachTurn { amount } => {
                r.apply_status(Side::Enemy(actor), StatusKind::Ritual, *amount);
            }
            _ => r.skip_special(special),
        }
    }
    r
}

/// Resolves a potion. `target` is only read for single-enemy potions.
pub fn resolve_potion(
    potion: &PotionDefinition,
    player: &PlayerState,
    enemies: &[EnemyInstance],
    target: Option<usize>,
) -> Resolution {
    let mut r = Resolution::start(player, enemies);
    match potion.effect {
        PotionEffect::Damage(amount) => {
            if let Some(index) = target.filter(|i| r.alive(*i)) {
                r.hit_enemy(index, amount);
            }
        }
        PotionEffect::DamageAll(amount) => {
            for index in r.living() {
                r.hit_enemy(index, amount);
            }
        }
        PotionEffect::Block(amount) => {
            r.player.gain_block(amount);
            r.events.push(CombatEvent::Block {
                target: Side::Player,
                amount,
            });
        }
        PotionEffect::Energy(amount) => r.gain_energy(amount),
        PotionEffect::Heal(amount) => {
            let healed = r.player.heal(amount);
            r.events.push(CombatEvent::Healed {
                target: Side::Player,
                amount: healed,
            });
        }
        PotionEffect::Buff(status, amount) => {
            r.apply_status(Side::Player, status, amount);
        }
        PotionEffect::Debuff(status, amount) => {
            for index in r.living() {
                r.apply_status(Side::Enemy(index), status, amount);
            }
        }
        PotionEffect::Draw(amount) => r.commands.push(PileCommand::Draw(amount)),
        PotionEffect::DoubleTap(count) => {
            r.apply_status(Side::Player, StatusKind::DoubleTap, count);
        }
    }
    r
}

use models::{Special, StatusKind};
use tracing::debug;

use crate::{
    Applied, CombatEvent, CombatSession, Combatant, HAND_SIZE, Phase, Side, resolve_enemy_move,
    select_move,
};

impl CombatSession {
    /// Round start, in order: block reset, energy refill, Demon Form, Metallicize, Brutality,
    /// Rage and Flame Barrier expiry, draw and its triggers, then enemy intents.
    pub(crate) fn begin_round(&mut self) {
        self.phase = Phase::RoundStart;
        self.turns_played += 1;
        self.log.push(CombatEvent::RoundStarted(self.round));

        if !self.player.statuses.has(StatusKind::Barricade) {
            self.player.reset_block();
        }
        self.player.energy = self.player.turn_energy();

        let demon_form = self.player.statuses.get(StatusKind::DemonForm);
        if demon_form > 0 {
            self.player.statuses.add(StatusKind::Strength, demon_form);
            self.log.push(CombatEvent::Status {
                target: Side::Player,
                status: StatusKind::Strength,
                amount: demon_form,
            });
        }
        let metallicize = self.player.statuses.stacks(StatusKind::Metallicize);
        if metallicize > 0 {
            self.player.gain_block(metallicize);
            self.log.push(CombatEvent::Block {
                target: Side::Player,
                amount: metallicize,
            });
        }
        let brutality = self.player.statuses.stacks(StatusKind::Brutality);
        if brutality > 0 {
            self.lose_own_hp(brutality, true);
            self.player.extra_draw += brutality;
            if self.check_terminal() {
                return;
            }
        }
        self.player.statuses.remove(StatusKind::Rage);
        self.player.statuses.remove(StatusKind::FlameBarrier);

        self.player.counters = Default::default();
        let count = *HAND_SIZE + (self.player.draw_bonus + self.player.extra_draw) as usize;
        self.player.extra_draw = 0;
        self.draw_cards(count);
        if self.check_terminal() {
            return;
        }

        for index in 0..self.enemies.len() {
            if self.enemies[index].is_dead() {
                self.enemies[index].intent = None;
                continue;
            }
            let chosen = select_move(
                &self.enemies[index],
                self.round,
                &self.enemies,
                &mut self.rng,
            )
            .map(|m| m.id.clone());
            if let Some(move_id) = &chosen {
                self.log.push(CombatEvent::Intent {
                    enemy: index,
                    move_id: move_id.clone(),
                });
            }
            self.enemies[index].intent = chosen;
        }
        self.phase = Phase::PlayerAction;
    }

    /// Turn end, enemy actions and the status tick, then the next round start unless the
    /// combat ended on the way.
    pub(crate) fn finish_turn(&mut self) {
        self.end_player_turn();
        if self.check_terminal() {
            return;
        }
        self.enemy_actions();
        if self.check_terminal() {
            return;
        }
        self.status_tick();
    }

    fn end_player_turn(&mut self) {
        self.phase = Phase::TurnEnd;

        let hand_size = self.piles.hand().len() as u32;
        let mut burns = vec![];
        let mut regrets = 0;
        let mut doubt = 0;
        for card in self.piles.hand_cards() {
            match card.definition().special {
                Some(Special::EndOfTurnDamage { amount }) => burns.push(amount),
                Some(Special::HpLossPerCardInHand) => regrets += 1,
                Some(Special::WeakAtEndOfTurn { amount }) => doubt += amount,
                _ => {}
            }
        }
        for amount in burns {
            let taken = self.player.take_damage(amount);
            self.stats.damage_received += taken.hp_lost;
            self.log.push(CombatEvent::Damage {
                source: Side::Player,
                target: Side::Player,
                amount,
                blocked: taken.blocked,
            });
        }

        for _ in 0..regrets {
            let lost = self.player.lose_hp(hand_size);
            self.log.push(CombatEvent::HpLost {
                target: Side::Player,
                amount: lost,
            });
        }

        let ethereal: Vec<_> = self
            .piles
            .hand_cards()
            .filter(|c| c.definition().flags.ethereal)
            .map(|c| c.id)
            .collect();
        for id in self.piles.clear_hand(|c| c.definition().flags.retained) {
            if ethereal.contains(&id) {
                self.exhaust_card(id);
            } else {
                self.piles.to_discard(id);
            }
        }

        let flex = self.player.statuses.remove(StatusKind::LoseStrength);
        if flex != 0 {
            self.player.statuses.add(StatusKind::Strength, -flex);
            self.log.push(CombatEvent::Status {
                target: Side::Player,
                status: StatusKind::Strength,
                amount: -flex,
            });
        }

        self.player.statuses.remove(StatusKind::NoDraw);

        let combust = self.player.statuses.stacks(StatusKind::Combust);
        if combust > 0 {
            self.lose_own_hp(self.player.combust_hp_loss, true);
            self.damage_all_enemies(combust);
        }

        let plated = self.player.statuses.stacks(StatusKind::PlatedArmor);
        if plated > 0 {
            self.player.gain_block(plated);
            self.log.push(CombatEvent::Block {
                target: Side::Player,
                amount: plated,
            });
        }

        self.player.statuses.decay();
        if doubt > 0 {
            let applied = self.player.apply_status(StatusKind::Weak, doubt);
            self.log.push(match applied {
                Applied::Applied => CombatEvent::Status {
                    target: Side::Player,
                    status: StatusKind::Weak,
                    amount: doubt,
                },
                Applied::Negated => CombatEvent::StatusNegated {
                    target: Side::Player,
                    status: StatusKind::Weak,
                },
            });
        }
        self.log.push(CombatEvent::TurnEnded(self.round));
    }

    /// Living enemies act in spawn order. Stops as soon as either side is wiped out.
    fn enemy_actions(&mut self) {
        self.phase = Phase::EnemyAction;
        for index in 0..self.enemies.len() {
            let enemy = &mut self.enemies[index];
            if enemy.is_dead() {
                continue;
            }
            if !enemy.template.retain_block {
                enemy.reset_block();
            }
            let ritual = enemy.statuses.get(StatusKind::Ritual);
            if ritual > 0 {
                enemy.statuses.add(StatusKind::Strength, ritual);
            }
            let metallicize = enemy.statuses.stacks(StatusKind::Metallicize);
            enemy.gain_block(metallicize);

            let Some(mv) = enemy.intent_move().cloned() else {
                continue;
            };
            debug!(enemy = %enemy.name(), action = %mv.name, "enemy acts");
            self.log.push(CombatEvent::EnemyMove {
                enemy: index,
                move_id: mv.id.clone(),
            });
            let resolution = resolve_enemy_move(&mv, index, &self.enemies, &self.player);
            let commands = self.absorb(resolution);
            self.run_commands(commands, None);
            self.enemies[index].record_move(&mv.id);
            if self.check_terminal() {
                return;
            }
        }
    }

    fn status_tick(&mut self) {
        self.phase = Phase::StatusTick;
        for enemy in &mut self.enemies {
            enemy.statuses.decay();
            let regain = enemy.statuses.remove(StatusKind::RegainStrength);
            if regain != 0 {
                enemy.statuses.add(StatusKind::Strength, regain);
            }
        }
        self.round += 1;
        if self.round >= self.options.max_rounds.max(1) {
            self.phase = Phase::Timeout;
            self.log.push(CombatEvent::Timeout);
            return;
        }
        self.begin_round();
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{CombatOptions, DeckCard, EnemySpawn, Health, PlayerState, initialize_combat};

    fn session(cards: &[(&str, usize)], enemies: &[(&str, u32)]) -> CombatSession {
        let deck: Vec<DeckCard> = cards
            .iter()
            .flat_map(|(id, count)| {
                let card = gamedata::card(id).expect("card in catalog");
                std::iter::repeat_n(DeckCard::new(card), *count)
            })
            .collect();
        let spawns: Vec<EnemySpawn> = enemies
            .iter()
            .map(|(id, hp)| EnemySpawn::with_hp(gamedata::enemy(id).expect("enemy in catalog"), *hp))
            .collect();
        let options = CombatOptions {
            seed: Some(7),
            ..CombatOptions::default()
        };
        initialize_combat(PlayerState::new(Health::full(80), 3), &deck, &spawns, options)
    }

    fn discard_hand(session: &mut CombatSession) {
        for id in session.piles.clear_hand(|_| false) {
            session.piles.to_discard(id);
        }
    }

    fn position(log: &[CombatEvent], event: &CombatEvent) -> usize {
        log.iter().position(|e| e == event).expect("event logged")
    }

    #[rstest]
    #[case::barricade(true, 12)]
    #[case::plain(false, 0)]
    fn block_resets_unless_barricaded(#[case] barricade: bool, #[case] expected: u32) {
        let mut session = session(&[("strike", 10)], &[("cultist", 50)]);
        if barricade {
            session.player.statuses.add(StatusKind::Barricade, 1);
        }
        session.player.gain_block(12);
        discard_hand(&mut session);
        session.begin_round();
        assert_eq!(session.player.block, expected);
    }

    #[rstest]
    #[case::lagavulin("lagavulin", 120, 17)]
    #[case::cultist("cultist", 50, 0)]
    fn enemy_block_kept_only_when_retained(
        #[case] id: &str,
        #[case] hp: u32,
        #[case] expected: u32,
    ) {
        let mut session = session(&[("strike", 5)], &[(id, hp)]);
        session.enemies[0].gain_block(7);
        session.enemy_actions();
        assert_eq!(session.enemies[0].block, expected);
    }

    #[test]
    fn start_of_turn_powers_fire_in_order() {
        let mut session = session(&[("strike", 15)], &[("cultist", 50)]);
        session.player.statuses.add(StatusKind::DemonForm, 2);
        session.player.statuses.add(StatusKind::Metallicize, 3);
        session.player.statuses.add(StatusKind::Brutality, 1);
        discard_hand(&mut session);
        let start = session.log.len();
        session.begin_round();

        let log = &session.log[start..];
        let strength = position(
            log,
            &CombatEvent::Status {
                target: Side::Player,
                status: StatusKind::Strength,
                amount: 2,
            },
        );
        let block = position(
            log,
            &CombatEvent::Block {
                target: Side::Player,
                amount: 3,
            },
        );
        let hp_loss = position(
            log,
            &CombatEvent::HpLost {
                target: Side::Player,
                amount: 1,
            },
        );
        assert!(strength < block && block < hp_loss);
        assert_eq!(session.player.strength(), 2);
        assert_eq!(session.player.block, 3);
        assert_eq!(session.player.health.current(), 79);
        assert_eq!(session.piles.hand().len(), *HAND_SIZE + 1);
    }

    #[test]
    fn brutality_can_end_the_combat() {
        let mut session = session(&[("strike", 10)], &[("cultist", 50)]);
        session.player.health = Health::new(1, 80);
        session.player.statuses.add(StatusKind::Brutality, 1);
        session.begin_round();
        assert_eq!(session.phase, Phase::Defeat);
    }

    #[test]
    fn borrowed_strength_returns_at_status_tick() {
        let mut session = session(&[("strike", 10)], &[("cultist", 50)]);
        session.enemies[0].statuses.add(StatusKind::Strength, -9);
        session.enemies[0].statuses.add(StatusKind::RegainStrength, 9);
        discard_hand(&mut session);
        session.status_tick();
        assert_eq!(session.enemies[0].statuses.get(StatusKind::Strength), 0);
        assert!(!session.enemies[0].statuses.has(StatusKind::RegainStrength));
    }

    #[test]
    fn combust_hits_every_enemy() {
        let mut session = session(&[("strike", 5)], &[("cultist", 50), ("cultist", 50)]);
        session.player.statuses.add(StatusKind::Combust, 5);
        session.player.combust_hp_loss = 1;
        session.end_player_turn();

        let hp: Vec<u32> = session.enemies.iter().map(|e| e.health.current()).collect();
        assert_eq!(hp, vec![45, 45]);
        assert_eq!(session.player.health.current(), 79);
        assert_eq!(session.stats.damage_dealt, 10);
    }

    #[test]
    fn regret_costs_hp_per_card_in_hand() {
        let mut session = session(&[("curse_regret", 1), ("strike", 4)], &[("cultist", 50)]);
        session.end_player_turn();
        assert_eq!(session.player.health.current(), 75);
    }

    #[test]
    fn doubt_weakens_through_the_next_turn() {
        let mut session = session(&[("curse_doubt", 1), ("strike", 4)], &[("cultist", 50)]);
        session.end_player_turn();
        assert_eq!(session.player.statuses.get(StatusKind::Weak), 1);
    }

    #[test]
    fn ethereal_cards_trigger_exhaust_powers() {
        let mut session = session(&[("dazed", 1), ("strike", 4)], &[("cultist", 50)]);
        session.player.statuses.add(StatusKind::FeelNoPain, 3);
        session.end_player_turn();
        assert_eq!(session.piles.exhaust_pile().len(), 1);
        assert_eq!(session.player.block, 3);
    }

    #[test]
    fn no_draw_wears_off_at_turn_end() {
        let mut session = session(&[("strike", 5)], &[("cultist", 50)]);
        session.player.statuses.add(StatusKind::NoDraw, 1);
        session.end_player_turn();
        assert!(!session.player.statuses.has(StatusKind::NoDraw));
    }
}

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use models::{CardDefinition, PileKind};

use crate::{CardInstance, CardInstanceId, CombatRng, DeckCard};

/// Arena of every card instance in a combat plus the four piles that index into it.
///
/// Each registered instance sits in exactly one of draw, hand, discard or exhaust, so
/// `self.total() == self.registered()` holds between operations. The front of `draw` is the top
/// of the pile.
#[derive(Clone, Debug, Default)]
pub struct Piles {
    cards: IndexMap<CardInstanceId, CardInstance>,
    draw: VecDeque<CardInstanceId>,
    hand: Vec<CardInstanceId>,
    discard: Vec<CardInstanceId>,
    exhaust: Vec<CardInstanceId>,
    pinned: Vec<CardInstanceId>,
    next_id: u32,
    generated: usize,
}

impl Piles {
    /// Instantiates `deck` plus an optional pinned card, shuffles, then moves innate and pinned
    /// cards to the top.
    pub fn build(
        deck: &[DeckCard],
        pinned: Option<Arc<CardDefinition>>,
        rng: &mut CombatRng,
    ) -> Self {
        let mut piles = Self::default();
        let mut ids: Vec<CardInstanceId> = deck
            .iter()
            .map(|c| piles.register(c.card.clone(), c.upgraded))
            .collect();
        if let Some(card) = pinned {
            let id = piles.register(card, false);
            piles.pinned.push(id);
            ids.push(id);
        }
        rng.shuffle(&mut ids);
        piles.draw = piles.front_load(ids);
        piles
    }

    fn register(&mut self, card: Arc<CardDefinition>, upgraded: bool) -> CardInstanceId {
        let id = CardInstanceId::new(self.next_id);
        self.next_id += 1;
        self.cards.insert(
            id,
            CardInstance {
                id,
                base: card,
                upgraded,
            },
        );
        id
    }

    fn front_load(&self, ids: Vec<CardInstanceId>) -> VecDeque<CardInstanceId> {
        let (front, rest): (Vec<_>, Vec<_>) = ids.into_iter().partition(|id| {
            self.pinned.contains(id)
                || self
                    .cards
                    .get(id)
                    .is_some_and(|c| c.definition().flags.innate)
        });
        front.into_iter().chain(rest).collect()
    }

    pub fn get(&self, id: CardInstanceId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    pub fn hand(&self) -> &[CardInstanceId] {
        &self.hand
    }

    pub fn hand_cards(&self) -> impl Iterator<Item = &CardInstance> {
        self.hand.iter().filter_map(|id| self.cards.get(id))
    }

    pub fn draw_pile(&self) -> &VecDeque<CardInstanceId> {
        &self.draw
    }

    pub fn discard_pile(&self) -> &[CardInstanceId] {
        &self.discard
    }

    pub fn exhaust_pile(&self) -> &[CardInstanceId] {
        &self.exhaust
    }

    pub fn in_hand(&self, id: CardInstanceId) -> bool {
        self.hand.contains(&id)
    }

    /// Cards across all four piles.
    pub fn total(&self) -> usize {
        self.draw.len() + self.hand.len() + self.discard.len() + self.exhaust.len()
    }

    /// Registered instances matching `f`, wherever they currently are.
    pub fn count(&self, f: impl Fn(&CardInstance) -> bool) -> usize {
        self.cards.values().filter(|c| f(c)).count()
    }

    /// Instances ever created in this combat.
    pub fn registered(&self) -> usize {
        self.cards.len()
    }

    /// Instances created mid-combat by add and copy effects.
    pub fn generated(&self) -> usize {
        self.generated
    }

    /// Draws up to `count` cards, reshuffling the discard pile into an empty draw pile. Stops
    /// early at `hand_limit` or when both piles are empty. Returns the ids drawn and whether a
    /// reshuffle happened.
    pub fn draw(
        &mut self,
        count: usize,
        hand_limit: usize,
        rng: &mut CombatRng,
    ) -> (Vec<CardInstanceId>, bool) {
        let mut drawn = Vec::with_capacity(count);
        let mut reshuffled = false;
        for _ in 0..count {
            if self.hand.len() >= hand_limit {
                break;
            }
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.reshuffle(rng);
                reshuffled = true;
            }
            let Some(id) = self.draw.pop_front() else {
                break;
            };
            self.hand.push(id);
            drawn.push(id);
        }
        (drawn, reshuffled)
    }

    fn reshuffle(&mut self, rng: &mut CombatRng) {
        let mut ids: Vec<CardInstanceId> = std::mem::take(&mut self.discard);
        ids.extend(self.draw.drain(..));
        rng.shuffle(&mut ids);
        self.draw = self.front_load(ids);
    }

    /// Removes a card from the hand so it can be resolved. The caller must place it again.
    pub fn take_from_hand(&mut self, id: CardInstanceId) -> Option<CardInstance> {
        let position = self.hand.iter().position(|h| *h == id)?;
        self.hand.remove(position);
        self.cards.get(&id).cloned()
    }

    pub fn to_discard(&mut self, id: CardInstanceId) {
        self.discard.push(id);
    }

    pub fn to_exhaust(&mut self, id: CardInstanceId) {
        self.exhaust.push(id);
    }

    /// Empties the hand, keeping cards for which `keep` is true. Returns the removed ids in
    /// hand order; the caller decides where each one goes.
    pub fn clear_hand(&mut self, keep: impl Fn(&CardInstance) -> bool) -> Vec<CardInstanceId> {
        let (kept, removed): (Vec<_>, Vec<_>) = self
            .hand
            .iter()
            .copied()
            .partition(|id| self.cards.get(id).is_some_and(&keep));
        self.hand = kept;
        removed
    }

    /// Creates a new instance in `pile`. Draw pile insertions land at a random position; a full
    /// hand sends the card to the discard pile instead.
    pub fn add(
        &mut self,
        card: Arc<CardDefinition>,
        upgraded: bool,
        pile: PileKind,
        hand_limit: usize,
        rng: &mut CombatRng,
    ) -> CardInstanceId {
        let id = self.register(card, upgraded);
        self.generated += 1;
        match pile {
            PileKind::Draw => {
                let at = rng.index(self.draw.len() + 1).unwrap_or(0);
                self.draw.insert(at, id);
            }
            PileKind::Hand if self.hand.len() < hand_limit => self.hand.push(id),
            PileKind::Hand | PileKind::Discard => self.discard.push(id),
        }
        id
    }

    /// Upgrades one random upgradable card in hand, or all of them.
    pub fn upgrade_in_hand(&mut self, all: bool, rng: &mut CombatRng) -> Vec<CardInstanceId> {
        let candidates: Vec<CardInstanceId> = self
            .hand
            .iter()
            .copied()
            .filter(|id| self.cards.get(id).is_some_and(CardInstance::can_upgrade))
            .collect();
        let chosen = if all {
            candidates
        } else {
            rng.pick(&candidates).copied().into_iter().collect()
        };
        for id in &chosen {
            if let Some(card) = self.cards.get_mut(id) {
                card.upgrade();
            }
        }
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::CardDefinition;

    fn deck(n: usize) -> Vec<DeckCard> {
        (0..n)
            .map(|i| {
                DeckCard::new(Arc::new(CardDefinition {
                    id: format!("card{i}"),
                    name: format!("Card {i}"),
                    ..CardDefinition::wound()
                }))
            })
            .collect()
    }

    #[test]
    fn pinned_card_is_on_top() {
        let mut rng = CombatRng::from_seed(3);
        let wound = Arc::new(CardDefinition::wound());
        let piles = Piles::build(&deck(10), Some(wound), &mut rng);
        let top = piles.draw_pile()[0];
        assert_eq!(piles.get(top).map(|c| c.card_id()), Some("wound"));
        assert_eq!(piles.total(), 11);
    }

    #[test]
    fn draw_reshuffles_and_respects_limit() {
        let mut rng = CombatRng::from_seed(3);
        let mut piles = Piles::build(&deck(6), None, &mut rng);
        let (first, _) = piles.draw(5, 10, &mut rng);
        assert_eq!(first.len(), 5);
        for id in piles.clear_hand(|_| false) {
            piles.to_discard(id);
        }
        let (second, reshuffled) = piles.draw(5, 10, &mut rng);
        assert_eq!(second.len(), 5);
        assert!(reshuffled);
        assert_eq!(piles.total(), piles.registered());

        let (capped, _) = piles.draw(5, 6, &mut rng);
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn added_cards_are_counted() {
        let mut rng = CombatRng::from_seed(3);
        let mut piles = Piles::build(&deck(3), None, &mut rng);
        let wound = Arc::new(CardDefinition::wound());
        piles.add(wound.clone(), false, PileKind::Discard, 10, &mut rng);
        piles.add(wound, false, PileKind::Draw, 10, &mut rng);
        assert_eq!(piles.generated(), 2);
        assert_eq!(piles.total(), 5);
        assert_eq!(piles.total(), piles.registered());
    }
}

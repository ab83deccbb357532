//! Deck construction and lookups.

use rand::{seq::SliceRandom, Rng};

use crate::models::{Card, CardId, ImageKey};

/// Ordered cards in play for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Deal two copies of every face and shuffle them.
    ///
    /// Ids are assigned before shuffling so they are unique but carry no
    /// information about position. The permutation is a Fisher–Yates shuffle.
    pub fn shuffled<R>(faces: &[ImageKey], rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut cards: Vec<Card> = faces
            .iter()
            .flat_map(|face| [face.clone(), face.clone()])
            .enumerate()
            .map(|(index, image)| Card::new(image, CardId(index as u32)))
            .collect();
        cards.shuffle(rng);
        Self { cards }
    }

    /// Cards in table order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards dealt.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True before a game has been dealt.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look up a card by id.
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Position of a card in table order.
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }

    /// True when there is at least one card and every card is matched.
    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|card| card.matched)
    }

    /// Pairs found so far.
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|card| card.matched).count() / 2
    }

    pub(crate) fn mark_matched(&mut self, image: &ImageKey) {
        for card in self.cards.iter_mut().filter(|card| &card.image == image) {
            card.matched = true;
        }
    }

    #[cfg(test)]
    pub(crate) fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn faces(names: &[&str]) -> Vec<ImageKey> {
        names.iter().map(|name| ImageKey::new(*name)).collect()
    }

    #[test]
    fn every_face_is_dealt_twice_with_unique_ids() {
        let faces = faces(&["apple", "banana", "cherry", "grape"]);
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::shuffled(&faces, &mut rng);

        assert_eq!(deck.len(), faces.len() * 2);

        let mut counts: HashMap<&ImageKey, usize> = HashMap::new();
        for card in deck.cards() {
            *counts.entry(&card.image).or_default() += 1;
            assert!(!card.matched);
        }
        assert!(counts.values().all(|count| *count == 2));
        assert_eq!(counts.len(), faces.len());

        let ids: HashSet<CardId> = deck.cards().iter().map(|card| card.id).collect();
        assert_eq!(ids.len(), deck.len());
    }

    #[test]
    fn same_seed_produces_same_order() {
        let faces = faces(&["apple", "banana", "cherry", "grape", "lemon"]);
        let first = Deck::shuffled(&faces, &mut StdRng::seed_from_u64(42));
        let second = Deck::shuffled(&faces, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn shuffle_has_no_positional_bias() {
        // Card 0 should land in each of the four slots about a quarter of the time.
        let faces = faces(&["a", "b"]);
        let mut rng = StdRng::seed_from_u64(1234);
        let mut landed = [0usize; 4];
        let rounds = 4000;
        for _ in 0..rounds {
            let deck = Deck::shuffled(&faces, &mut rng);
            let slot = deck.position(CardId(0)).unwrap();
            landed[slot] += 1;
        }
        for count in landed {
            assert!((800..1200).contains(&count), "skewed slot count {count}");
        }
    }

    #[test]
    fn empty_deck_is_never_complete() {
        let deck = Deck::shuffled(&[], &mut StdRng::seed_from_u64(0));
        assert!(deck.is_empty());
        assert!(!deck.is_complete());
    }

    #[test]
    fn mark_matched_touches_only_that_face() {
        let faces = faces(&["apple", "banana"]);
        let mut deck = Deck::shuffled(&faces, &mut StdRng::seed_from_u64(3));
        deck.mark_matched(&ImageKey::new("apple"));

        for card in deck.cards() {
            assert_eq!(card.matched, card.image.as_str() == "apple");
        }
        assert_eq!(deck.matched_pairs(), 1);
        assert!(!deck.is_complete());
    }
}

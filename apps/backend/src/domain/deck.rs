//! Deck composition, dealing, and shuffling.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::cards::{Card, Rank, Suit};

/// Cards contributed by a single standard deck.
pub const STANDARD_DECK_SIZE: usize = 52;
/// Cards contributed by a single Spanish deck (ranks 1-7 plus the three
/// face cards, four suits).
pub const SPANISH_DECK_SIZE: usize = 40;
/// Cards drawn for a single glitch deck.
pub const GLITCH_DECK_SIZE: usize = 52;

const SPANISH_RANKS: [Rank; 10] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

/// Card-composition ruleset for a deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckType {
    Standard,
    Spanish,
    /// Randomized composition: uniform (rank, suit) draws that need not
    /// mirror a physical deck. Duplicates are expected.
    Glitch,
}

impl DeckType {
    /// Number of cards one deck of this type contributes.
    pub const fn deck_size(self) -> usize {
        match self {
            DeckType::Standard => STANDARD_DECK_SIZE,
            DeckType::Spanish => SPANISH_DECK_SIZE,
            DeckType::Glitch => GLITCH_DECK_SIZE,
        }
    }
}

/// An ordered pile of cards plus the composition it was built from.
///
/// Dealing removes from the top and is irreversible without a reset.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    deck_type: DeckType,
    num_decks: usize,
}

impl Deck {
    /// One standard 52-card deck, in order.
    pub fn standard() -> Self {
        Self::with_decks_and_type(1, DeckType::Standard)
    }

    pub fn with_decks(num_decks: usize) -> Self {
        Self::with_decks_and_type(num_decks, DeckType::Standard)
    }

    pub fn with_decks_and_type(num_decks: usize, deck_type: DeckType) -> Self {
        let mut deck = Self {
            cards: Vec::new(),
            deck_type,
            num_decks,
        };
        deck.reset();
        deck
    }

    pub fn deck_type(&self) -> DeckType {
        self.deck_type
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    /// Count of undealt cards.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Pop the next card from the top of the deck.
    ///
    /// Returns `None` when the deck is empty. Callers treat this as an
    /// expected boundary condition, not a fault.
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Uniform in-place permutation of the cards still in the deck.
    /// Dealt cards are not restored.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }

    /// Shuffle with a caller-provided generator, for reproducible decks.
    pub fn shuffle_with<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Rebuild the full composition for the current type and count,
    /// discarding dealt cards and any shuffle order.
    pub fn reset(&mut self) {
        self.reset_with_decks_and_type(self.num_decks, self.deck_type);
    }

    pub fn reset_with_decks(&mut self, num_decks: usize) {
        self.reset_with_decks_and_type(num_decks, self.deck_type);
    }

    pub fn reset_with_decks_and_type(&mut self, num_decks: usize, deck_type: DeckType) {
        self.num_decks = num_decks;
        self.deck_type = deck_type;
        self.cards.clear();
        match deck_type {
            DeckType::Standard => {
                for _ in 0..num_decks {
                    push_composition(&mut self.cards, &Rank::ALL);
                }
            }
            DeckType::Spanish => {
                for _ in 0..num_decks {
                    push_composition(&mut self.cards, &SPANISH_RANKS);
                }
            }
            DeckType::Glitch => {
                // Glitch compositions come from a dedicated seeded stream
                // so a game's deck can be reproduced from its seed.
                let seed = rand::rng().random::<u64>();
                tracing::debug!(seed, "deck.glitch_composition");
                self.push_glitch(num_decks, seed);
            }
        }
    }

    /// Rebuild a glitch composition from an explicit seed.
    pub fn reset_glitch_seeded(&mut self, num_decks: usize, seed: u64) {
        self.num_decks = num_decks;
        self.deck_type = DeckType::Glitch;
        self.cards.clear();
        self.push_glitch(num_decks, seed);
    }

    fn push_glitch(&mut self, num_decks: usize, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..num_decks * GLITCH_DECK_SIZE {
            let rank = Rank::ALL[rng.random_range(0..Rank::ALL.len())];
            let suit = Suit::ALL[rng.random_range(0..Suit::ALL.len())];
            self.cards.push(Card::new(rank, suit));
        }
    }

    /// Read-only view of the undealt cards, top of the deck last.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

fn push_composition(cards: &mut Vec<Card>, ranks: &[Rank]) {
    for suit in Suit::ALL {
        for &rank in ranks {
            cards.push(Card::new(rank, suit));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn multiset(deck: &Deck) -> HashMap<(Rank, Suit), usize> {
        let mut counts = HashMap::new();
        for card in deck.cards() {
            *counts.entry(card.identity()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn standard_composition_is_52_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.remaining(), 52);
        assert_eq!(multiset(&deck).len(), 52);
    }

    #[test]
    fn spanish_composition_is_40_cards_without_middle_ranks() {
        let deck = Deck::with_decks_and_type(1, DeckType::Spanish);
        assert_eq!(deck.remaining(), SPANISH_DECK_SIZE);
        assert!(deck
            .cards()
            .iter()
            .all(|c| !matches!(c.rank, Rank::Eight | Rank::Nine | Rank::Ten)));
    }

    #[test]
    fn multiple_decks_multiply_the_composition() {
        let deck = Deck::with_decks(2);
        assert_eq!(deck.remaining(), 104);
        assert!(multiset(&deck).values().all(|&n| n == 2));
    }

    #[test]
    fn deal_pops_from_the_top_until_empty() {
        let mut deck = Deck::standard();
        let top = deck.cards().last().cloned().unwrap();
        assert_eq!(deck.deal().unwrap().identity(), top.identity());
        for _ in 0..51 {
            assert!(deck.deal().is_some());
        }
        assert!(deck.deal().is_none());
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn seeded_shuffles_are_reproducible() {
        let mut a = Deck::standard();
        let mut b = Deck::standard();
        a.shuffle_with(&mut ChaCha8Rng::seed_from_u64(11));
        b.shuffle_with(&mut ChaCha8Rng::seed_from_u64(11));
        let ids_a: Vec<_> = a.cards().iter().map(Card::identity).collect();
        let ids_b: Vec<_> = b.cards().iter().map(Card::identity).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn shuffle_preserves_the_multiset() {
        let mut deck = Deck::with_decks(2);
        let before = multiset(&deck);
        deck.shuffle();
        assert_eq!(multiset(&deck), before);
        assert_eq!(deck.remaining(), 104);
    }

    #[test]
    fn reset_restores_full_composition_after_deals() {
        let mut deck = Deck::standard();
        for _ in 0..10 {
            deck.deal();
        }
        deck.reset();
        assert_eq!(deck.remaining(), 52);
    }

    #[test]
    fn reset_with_decks_and_type_switches_composition() {
        let mut deck = Deck::standard();
        deck.reset_with_decks_and_type(3, DeckType::Spanish);
        assert_eq!(deck.remaining(), 3 * SPANISH_DECK_SIZE);
        assert_eq!(deck.deck_type(), DeckType::Spanish);
        assert_eq!(deck.num_decks(), 3);
    }

    #[test]
    fn glitch_composition_has_the_right_size_and_is_seed_stable() {
        let mut a = Deck::with_decks_and_type(2, DeckType::Glitch);
        assert_eq!(a.remaining(), 2 * GLITCH_DECK_SIZE);

        a.reset_glitch_seeded(1, 7);
        let mut b = Deck::standard();
        b.reset_glitch_seeded(1, 7);
        let ids_a: Vec<_> = a.cards().iter().map(Card::identity).collect();
        let ids_b: Vec<_> = b.cards().iter().map(Card::identity).collect();
        assert_eq!(ids_a, ids_b);
    }
}

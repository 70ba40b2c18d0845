//! Core card types: Card, Rank, Suit.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Numeric rank value, ace low: 1..=13.
    pub const fn value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
        }
    }

    /// Pip value used by counting games: faces count 10, ace counts 1.
    pub const fn pip_value(self) -> u8 {
        match self {
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other.value(),
        }
    }
}

/// A single card at the table.
///
/// Identity (rank, suit, attributes) is fixed once dealt; `face_up` is
/// the only commonly mutated field.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub face_up: bool,
    /// Free-form attributes for non-standard cards.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Card {
    /// A face-down card with no custom attributes.
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            face_up: false,
            attributes: BTreeMap::new(),
        }
    }

    /// Rank and suit, ignoring visibility and attributes.
    pub fn identity(&self) -> (Rank, Suit) {
        (self.rank, self.suit)
    }
}

// Display uses the two-character codes the fixtures and logs use: "AS",
// "TD", "9C".
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            Rank::Ace => 'A',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            other => (b'0' + other.value()) as char,
        };
        let suit = match self.suit {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };
        write!(f, "{rank}{suit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_values_cover_one_to_thirteen() {
        let values: Vec<u8> = Rank::ALL.iter().map(|r| r.value()).collect();
        assert_eq!(values, (1..=13).collect::<Vec<u8>>());
    }

    #[test]
    fn pip_value_caps_faces_at_ten() {
        assert_eq!(Rank::Jack.pip_value(), 10);
        assert_eq!(Rank::Queen.pip_value(), 10);
        assert_eq!(Rank::King.pip_value(), 10);
        assert_eq!(Rank::Nine.pip_value(), 9);
        assert_eq!(Rank::Ace.pip_value(), 1);
    }

    #[test]
    fn display_uses_two_character_codes() {
        assert_eq!(Card::new(Rank::Ace, Suit::Spades).to_string(), "AS");
        assert_eq!(Card::new(Rank::Ten, Suit::Diamonds).to_string(), "TD");
        assert_eq!(Card::new(Rank::Nine, Suit::Clubs).to_string(), "9C");
    }
}

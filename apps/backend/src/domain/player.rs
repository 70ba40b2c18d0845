//! Players and their hands.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::cards::Card;

/// Reserved identifier for the dealer's seat.
pub const DEALER_ID: &str = "dealer";

/// Identifier for a seat at the table: the reserved dealer seat, or a
/// UUID assigned when a player joins.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PlayerId {
    Dealer,
    Player(Uuid),
}

impl PlayerId {
    /// Fresh identifier for a joining player.
    pub fn new() -> Self {
        Self::Player(Uuid::new_v4())
    }

    pub const fn is_dealer(self) -> bool {
        matches!(self, PlayerId::Dealer)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Dealer => f.write_str(DEALER_ID),
            PlayerId::Player(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DEALER_ID {
            return Ok(PlayerId::Dealer);
        }
        Uuid::parse_str(s).map(PlayerId::Player)
    }
}

// On the wire a player id is the string "dealer" or a UUID.
impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A participant: held cards plus per-round status flags.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Append-only until explicitly cleared.
    pub hand: Vec<Card>,
    pub standing: bool,
    pub busted: bool,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            hand: Vec::new(),
            standing: false,
            busted: false,
        }
    }

    pub fn dealer() -> Self {
        Self {
            id: PlayerId::Dealer,
            name: "Dealer".to_string(),
            hand: Vec::new(),
            standing: false,
            busted: false,
        }
    }

    /// Drop all held cards and reset round flags.
    pub fn clear_hand(&mut self) {
        self.hand.clear();
        self.standing = false;
        self.busted = false;
    }

    /// A player still in the round: neither standing nor busted.
    pub fn is_active(&self) -> bool {
        !self.standing && !self.busted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_ids_round_trip_through_strings() {
        let id = PlayerId::new();
        assert_eq!(id.to_string().parse::<PlayerId>().unwrap(), id);
        assert_eq!(DEALER_ID.parse::<PlayerId>().unwrap(), PlayerId::Dealer);
    }

    #[test]
    fn player_ids_reject_garbage() {
        assert!("not-a-uuid".parse::<PlayerId>().is_err());
    }

    #[test]
    fn fresh_players_are_active_with_empty_hands() {
        let player = Player::new("Alice");
        assert!(player.is_active());
        assert!(player.hand.is_empty());
        assert!(!player.id.is_dealer());
    }

    #[test]
    fn clear_hand_resets_round_flags() {
        let mut player = Player::new("Bob");
        player.standing = true;
        player.busted = true;
        player.clear_hand();
        assert!(player.is_active());
    }
}

//! The game aggregate: deck + dealer + players + status + turn cursor.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::cards::Card;
use super::deck::Deck;
use super::player::{Player, PlayerId};
use crate::errors::domain::DomainError;

/// Default seat limit for new games.
pub const DEFAULT_MAX_PLAYERS: usize = 7;

/// Variant tag selecting the rule engine for a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Blackjack,
    Glitchjack,
    Cribbage,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameType::Blackjack => "blackjack",
            GameType::Glitchjack => "glitchjack",
            GameType::Cribbage => "cribbage",
        };
        f.write_str(s)
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blackjack" => Ok(GameType::Blackjack),
            "glitchjack" => Ok(GameType::Glitchjack),
            "cribbage" => Ok(GameType::Cribbage),
            other => Err(format!("unknown game type: {other}")),
        }
    }
}

/// Game progression. Transitions are monotonic: a finished game never
/// returns to play.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    InProgress,
    Finished,
}

/// One active play session.
///
/// The turn cursor is `Some(index)` into `players` while a seat is
/// expected to act, and `None` (the sentinel) when nobody is — before
/// start, during the dealer's turn, and after the game finishes.
/// Removing a player does not repair the cursor; callers re-validate it.
#[derive(Debug, Clone)]
pub struct Game {
    pub id: Uuid,
    pub game_type: GameType,
    status: GameStatus,
    pub deck: Deck,
    pub dealer: Player,
    /// Insertion order is seating order.
    pub players: Vec<Player>,
    pub current_player: Option<usize>,
    pub max_players: usize,
    pub created_at: OffsetDateTime,
    pub last_used: OffsetDateTime,
    discard_piles: HashMap<String, Vec<Card>>,
}

impl Game {
    pub fn new(game_type: GameType, deck: Deck, max_players: usize) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            game_type,
            status: GameStatus::Waiting,
            deck,
            dealer: Player::dealer(),
            players: Vec::new(),
            current_player: None,
            max_players,
            created_at: now,
            last_used: now,
            discard_piles: HashMap::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Move the game forward. Regressions (e.g. finished back to
    /// in-progress) are rejected.
    pub fn transition_to(&mut self, next: GameStatus) -> Result<(), DomainError> {
        if next < self.status {
            return Err(DomainError::phase_mismatch(format!(
                "cannot move from {:?} back to {next:?}",
                self.status
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Refresh the last-used timestamp.
    pub fn touch(&mut self) {
        self.last_used = OffsetDateTime::now_utc();
    }

    /// Seat a new player. Returns `None` when the roster is full.
    pub fn add_player(&mut self, name: impl Into<String>) -> Option<&Player> {
        if self.players.len() >= self.max_players {
            return None;
        }
        self.players.push(Player::new(name));
        self.players.last()
    }

    /// Remove a player by identifier. Returns false when absent. The
    /// dealer cannot be removed.
    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        self.players.len() != before
    }

    /// Look up a seat, dealer included.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        if id.is_dealer() {
            return Some(&self.dealer);
        }
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        if id.is_dealer() {
            return Some(&mut self.dealer);
        }
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The player at the turn cursor, if the cursor is valid.
    pub fn cursor_player(&self) -> Option<&Player> {
        self.players.get(self.current_player?)
    }

    /// Deal the next card into the target hand with the given
    /// visibility. `None` when the deck is exhausted or the player is
    /// unknown.
    pub fn deal_to_player(&mut self, id: PlayerId, face_up: bool) -> Option<Card> {
        self.player(id)?;
        let mut card = self.deck.deal()?;
        card.face_up = face_up;
        // The lookup above guarantees the seat exists.
        let player = self.player_mut(id)?;
        player.hand.push(card.clone());
        Some(card)
    }

    /// Read a keyed discard pile. `None` when no such pile exists yet.
    pub fn discard_pile(&self, key: &str) -> Option<&[Card]> {
        self.discard_piles.get(key).map(Vec::as_slice)
    }

    /// Append a card to a keyed discard pile, creating the pile on first
    /// use. Piles are append-only and separate from hands.
    pub fn add_to_discard_pile(&mut self, key: &str, card: Card) {
        self.discard_piles
            .entry(key.to_string())
            .or_default()
            .push(card);
    }
}

//! Public snapshot API for observing game state without exposing internals.
//!
//! Face-down cards keep their identity out of the snapshot: a hole card
//! is reported as present but not named until the engine flips it.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::cards::{Card, Rank, Suit};
use super::game::{Game, GameStatus, GameType};
use super::player::{Player, PlayerId};

/// Public view of a single card. Identity is omitted while face-down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardPublic {
    pub face_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suit: Option<Suit>,
}

impl From<&Card> for CardPublic {
    fn from(card: &Card) -> Self {
        if card.face_up {
            Self {
                face_up: true,
                rank: Some(card.rank),
                suit: Some(card.suit),
            }
        } else {
            Self {
                face_up: false,
                rank: None,
                suit: None,
            }
        }
    }
}

/// Public info about one seat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<CardPublic>,
    pub standing: bool,
    pub busted: bool,
}

impl From<&Player> for PlayerPublic {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            hand: player.hand.iter().map(CardPublic::from).collect(),
            standing: player.standing,
            busted: player.busted,
        }
    }
}

/// Top-level snapshot returned to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub id: Uuid,
    pub game_type: GameType,
    pub status: GameStatus,
    pub dealer: PlayerPublic,
    pub players: Vec<PlayerPublic>,
    /// Identifier of the seat expected to act; absent when nobody is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_player: Option<PlayerId>,
    pub remaining_cards: usize,
    pub max_players: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_used: OffsetDateTime,
}

/// Produce the public view of a game.
pub fn snapshot(game: &Game) -> GameSnapshot {
    GameSnapshot {
        id: game.id,
        game_type: game.game_type,
        status: game.status(),
        dealer: PlayerPublic::from(&game.dealer),
        players: game.players.iter().map(PlayerPublic::from).collect(),
        current_player: game.cursor_player().map(|p| p.id),
        remaining_cards: game.deck.remaining(),
        max_players: game.max_players,
        created_at: game.created_at,
        last_used: game.last_used,
    }
}

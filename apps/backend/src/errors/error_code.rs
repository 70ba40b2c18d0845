//! Error codes for the card-table backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the card-table backend API.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that
/// appears in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Missing resources
    /// Game not found in the registry
    GameNotFound,
    /// Player not found in the game
    PlayerNotFound,
    /// Discard pile not found in the game
    PileNotFound,

    // Preconditions
    /// Action does not match the game's current status
    PhaseMismatch,
    /// Roster is already at the game's player limit
    RosterFull,
    /// Acting player is not the player whose turn it is
    OutOfTurn,
    /// Operation addressed to a game of a different type
    WrongGameType,
    /// Game cannot be started in its current configuration
    GameNotStartable,
    /// Card is not in the acting player's hand
    CardNotInHand,

    // Resources
    /// Deck has fewer cards than the operation needs
    DeckExhausted,

    // Request validation
    /// Invalid game identifier in the request path
    InvalidGameId,
    /// Invalid player identifier in the request path
    InvalidPlayerId,
    /// General validation error
    ValidationError,

    // Infrastructure
    /// Unexpected internal error
    Internal,
}

impl ErrorCode {
    /// Canonical string for this code, as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::GameNotFound => "GAME_NOT_FOUND",
            ErrorCode::PlayerNotFound => "PLAYER_NOT_FOUND",
            ErrorCode::PileNotFound => "PILE_NOT_FOUND",
            ErrorCode::PhaseMismatch => "PHASE_MISMATCH",
            ErrorCode::RosterFull => "ROSTER_FULL",
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::WrongGameType => "WRONG_GAME_TYPE",
            ErrorCode::GameNotStartable => "GAME_NOT_STARTABLE",
            ErrorCode::CardNotInHand => "CARD_NOT_IN_HAND",
            ErrorCode::DeckExhausted => "DECK_EXHAUSTED",
            ErrorCode::InvalidGameId => "INVALID_GAME_ID",
            ErrorCode::InvalidPlayerId => "INVALID_PLAYER_ID",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Domain-level error type used across the engines and the registry.
//!
//! This error type is HTTP-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.
//!
//! Expected boundary conditions (an empty deck, a lookup miss inside the
//! aggregate) are `Option`/`bool`, not errors; `DomainError` is for rule
//! violations the caller can correct.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Domain-level not found entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Player,
    Pile,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Action does not match the game's current status
    PhaseMismatch(String),
    /// Roster is already at the game's player limit
    RosterFull,
    /// Acting player is not the player at the turn cursor
    OutOfTurn,
    /// Operation addressed to a game of a different type
    WrongGameType(String),
    /// Start preconditions not met (e.g. zero players)
    NotStartable(String),
    /// Named card is not in the acting player's hand
    CardNotInHand,
    /// Deck ran out of cards. A multi-step deal that hits this leaves the
    /// game partially dealt; no rollback is performed.
    DeckExhausted,
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::PhaseMismatch(d) => write!(f, "phase mismatch: {d}"),
            DomainError::RosterFull => write!(f, "roster full"),
            DomainError::OutOfTurn => write!(f, "out of turn"),
            DomainError::WrongGameType(d) => write!(f, "wrong game type: {d}"),
            DomainError::NotStartable(d) => write!(f, "not startable: {d}"),
            DomainError::CardNotInHand => write!(f, "card not in hand"),
            DomainError::DeckExhausted => write!(f, "deck exhausted"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn phase_mismatch(detail: impl Into<String>) -> Self {
        Self::PhaseMismatch(detail.into())
    }
    pub fn wrong_game_type(detail: impl Into<String>) -> Self {
        Self::WrongGameType(detail.into())
    }
    pub fn not_startable(detail: impl Into<String>) -> Self {
        Self::NotStartable(detail.into())
    }
}

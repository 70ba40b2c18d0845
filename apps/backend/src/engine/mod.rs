//! Variant rule engines over the shared game aggregate.
//!
//! Each engine is a module of functions over `Game`; the game's type tag
//! selects the engine. Engines validate the tag themselves, so calling
//! through the dispatch functions or a module directly behaves the same.

pub mod blackjack;
pub mod cribbage;
pub mod glitchjack;

use serde::Serialize;

use crate::domain::cards::Card;
use crate::domain::game::{Game, GameType};
use crate::domain::player::PlayerId;
use crate::errors::domain::DomainError;

/// Outcome of a finished blackjack-family game for one player.
///
/// The variants are listed in precedence order: a busted player scores
/// bust even when the raw totals would tie the dealer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Bust,
    Blackjack,
    Win,
    Push,
    Lose,
}

/// Start the game with the engine selected by its type tag.
pub fn start(game: &mut Game) -> Result<(), DomainError> {
    match game.game_type {
        GameType::Blackjack => blackjack::start(game),
        GameType::Glitchjack => glitchjack::start(game),
        GameType::Cribbage => cribbage::start(game),
    }
}

/// Deal one more card to the named player, where the variant allows it.
pub fn hit(game: &mut Game, player: PlayerId) -> Result<Card, DomainError> {
    match game.game_type {
        GameType::Blackjack => blackjack::hit(game, player),
        GameType::Glitchjack => glitchjack::hit(game, player),
        GameType::Cribbage => Err(DomainError::wrong_game_type(
            "cribbage has no hit action",
        )),
    }
}

/// Stand the named player, where the variant allows it.
pub fn stand(game: &mut Game, player: PlayerId) -> Result<(), DomainError> {
    match game.game_type {
        GameType::Blackjack => blackjack::stand(game, player),
        GameType::Glitchjack => glitchjack::stand(game, player),
        GameType::Cribbage => Err(DomainError::wrong_game_type(
            "cribbage has no stand action",
        )),
    }
}

/// Variant-specific results of a finished game.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum GameResults {
    /// Blackjack-family outcomes per player.
    Outcomes(Vec<PlayerOutcome>),
    /// Cribbage show totals per hand, dealer included.
    Scores(Vec<HandScore>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerOutcome {
    pub player: PlayerId,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandScore {
    pub player: PlayerId,
    pub points: u32,
}

/// Compute results with the engine selected by the game's type tag.
///
/// Blackjack-family games must be finished; a cribbage game is scored
/// (and thereby finished) on the way out, which is why this takes the
/// game mutably.
pub fn results(game: &mut Game) -> Result<GameResults, DomainError> {
    match game.game_type {
        GameType::Blackjack => Ok(GameResults::Outcomes(to_outcomes(blackjack::results(
            game,
        )?))),
        GameType::Glitchjack => Ok(GameResults::Outcomes(to_outcomes(glitchjack::results(
            game,
        )?))),
        GameType::Cribbage => Ok(GameResults::Scores(
            cribbage::score_show(game)?
                .into_iter()
                .map(|(player, points)| HandScore { player, points })
                .collect(),
        )),
    }
}

fn to_outcomes(raw: Vec<(PlayerId, Outcome)>) -> Vec<PlayerOutcome> {
    raw.into_iter()
        .map(|(player, outcome)| PlayerOutcome { player, outcome })
        .collect()
}

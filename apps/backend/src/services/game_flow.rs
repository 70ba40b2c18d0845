//! Orchestration between the transport layer, the registry, and the
//! variant engines.
//!
//! Handlers call these functions; each one resolves the game through the
//! registry, takes the per-game lock for the duration of the mutation,
//! and returns a snapshot the transport can serialize as-is.

use time::Duration;
use uuid::Uuid;

use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::deck::DeckType;
use crate::domain::game::GameStatus;
use crate::domain::player::PlayerId;
use crate::domain::snapshot::{snapshot, GameSnapshot};
use crate::engine;
use crate::engine::GameResults;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::registry::{CreateGameOptions, GameRegistry, GameSummary, SharedGame};

fn require_game(registry: &GameRegistry, id: Uuid) -> Result<SharedGame, DomainError> {
    registry
        .get_game(id)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, id.to_string()))
}

/// Create and register a game.
pub fn create_game(registry: &GameRegistry, opts: CreateGameOptions) -> GameSnapshot {
    let (id, shared) = registry.create_game(opts);
    tracing::info!(
        game_id = %id,
        game_type = %opts.game_type,
        deck_count = opts.deck_count,
        "game.created"
    );
    let game = shared.lock();
    snapshot(&game)
}

/// Snapshot of a single game.
pub fn get_game(registry: &GameRegistry, id: Uuid) -> Result<GameSnapshot, DomainError> {
    let shared = require_game(registry, id)?;
    let game = shared.lock();
    Ok(snapshot(&game))
}

pub fn list_games(registry: &GameRegistry) -> Vec<GameSummary> {
    registry.list_games()
}

/// Delete a game. `NotFound` when the identifier is unknown.
pub fn delete_game(registry: &GameRegistry, id: Uuid) -> Result<(), DomainError> {
    if !registry.delete_game(id) {
        return Err(DomainError::not_found(NotFoundKind::Game, id.to_string()));
    }
    tracing::info!(game_id = %id, "game.deleted");
    Ok(())
}

/// Seat a player. Joining is only possible before the game starts.
pub fn join_game(
    registry: &GameRegistry,
    id: Uuid,
    name: String,
) -> Result<(PlayerId, GameSnapshot), DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    if game.status() != GameStatus::Waiting {
        return Err(DomainError::phase_mismatch(format!(
            "cannot join a game that is {:?}",
            game.status()
        )));
    }
    let player_id = match game.add_player(name) {
        Some(player) => player.id,
        None => return Err(DomainError::RosterFull),
    };
    tracing::info!(game_id = %id, player_id = %player_id, "game.player_joined");
    Ok((player_id, snapshot(&game)))
}

/// Remove a player. The cursor is re-validated: a cursor left past the
/// end of the roster snaps to the sentinel. An in-range cursor may still
/// point at a shifted seat; the variant engines' turn checks are the
/// backstop for that case.
pub fn leave_game(
    registry: &GameRegistry,
    id: Uuid,
    player: PlayerId,
) -> Result<GameSnapshot, DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    if !game.remove_player(player) {
        return Err(DomainError::not_found(
            NotFoundKind::Player,
            player.to_string(),
        ));
    }
    if let Some(cursor) = game.current_player {
        if cursor >= game.players.len() {
            game.current_player = None;
        }
    }
    tracing::info!(game_id = %id, player_id = %player, "game.player_left");
    Ok(snapshot(&game))
}

/// Start the game with its variant engine.
pub fn start_game(registry: &GameRegistry, id: Uuid) -> Result<GameSnapshot, DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    engine::start(&mut game)?;
    tracing::info!(game_id = %id, game_type = %game.game_type, "game.started");
    Ok(snapshot(&game))
}

/// Hit: one more card for the named player.
pub fn hit(
    registry: &GameRegistry,
    id: Uuid,
    player: PlayerId,
) -> Result<(Card, GameSnapshot), DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    let card = engine::hit(&mut game, player)?;
    tracing::debug!(game_id = %id, player_id = %player, card = %card, "game.hit");
    Ok((card, snapshot(&game)))
}

/// Stand the named player; may run the dealer's turn and finish the game.
pub fn stand(
    registry: &GameRegistry,
    id: Uuid,
    player: PlayerId,
) -> Result<GameSnapshot, DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    engine::stand(&mut game, player)?;
    if game.status() == GameStatus::Finished {
        tracing::info!(game_id = %id, "game.finished");
    }
    Ok(snapshot(&game))
}

/// Variant-specific results; finishes a cribbage game as a side effect.
pub fn game_results(registry: &GameRegistry, id: Uuid) -> Result<GameResults, DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    engine::results(&mut game)
}

/// Cribbage: move the named cards from a hand into the crib.
pub fn crib_discard(
    registry: &GameRegistry,
    id: Uuid,
    player: PlayerId,
    cards: &[(Rank, Suit)],
) -> Result<GameSnapshot, DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    engine::cribbage::discard_to_crib(&mut game, player, cards)?;
    Ok(snapshot(&game))
}

/// Cribbage: cut the starter card.
pub fn crib_cut(registry: &GameRegistry, id: Uuid) -> Result<(Card, GameSnapshot), DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    let starter = engine::cribbage::cut_starter(&mut game)?;
    tracing::info!(game_id = %id, starter = %starter, "game.starter_cut");
    Ok((starter, snapshot(&game)))
}

/// Deal `count` cards off the top of the deck, face up. The whole deal
/// fails when the deck is short; callers pre-check bulk deals against
/// the snapshot's remaining count.
pub fn deal_cards(
    registry: &GameRegistry,
    id: Uuid,
    count: usize,
) -> Result<(Vec<Card>, GameSnapshot), DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    if game.deck.remaining() < count {
        return Err(DomainError::DeckExhausted);
    }
    let mut cards = Vec::with_capacity(count);
    for _ in 0..count {
        let mut card = game.deck.deal().ok_or(DomainError::DeckExhausted)?;
        card.face_up = true;
        cards.push(card);
    }
    Ok((cards, snapshot(&game)))
}

/// Deal one card into a hand with the given visibility, outside any
/// variant flow.
pub fn deal_to_player(
    registry: &GameRegistry,
    id: Uuid,
    player: PlayerId,
    face_up: bool,
) -> Result<(Card, GameSnapshot), DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    if game.player(player).is_none() {
        return Err(DomainError::not_found(
            NotFoundKind::Player,
            player.to_string(),
        ));
    }
    let card = game
        .deal_to_player(player, face_up)
        .ok_or(DomainError::DeckExhausted)?;
    Ok((card, snapshot(&game)))
}

/// Shuffle whatever is left in the deck.
pub fn shuffle_deck(registry: &GameRegistry, id: Uuid) -> Result<GameSnapshot, DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    game.deck.shuffle();
    Ok(snapshot(&game))
}

/// Rebuild the deck's composition, optionally switching count or type.
pub fn reset_deck(
    registry: &GameRegistry,
    id: Uuid,
    deck_count: Option<usize>,
    deck_type: Option<DeckType>,
) -> Result<GameSnapshot, DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    match (deck_count, deck_type) {
        (Some(count), Some(ty)) => game.deck.reset_with_decks_and_type(count, ty),
        (Some(count), None) => game.deck.reset_with_decks(count),
        (None, Some(ty)) => {
            let count = game.deck.num_decks();
            game.deck.reset_with_decks_and_type(count, ty);
        }
        (None, None) => game.deck.reset(),
    }
    tracing::info!(game_id = %id, "game.deck_reset");
    Ok(snapshot(&game))
}

/// Read a keyed discard pile.
pub fn get_discard_pile(
    registry: &GameRegistry,
    id: Uuid,
    key: &str,
) -> Result<Vec<Card>, DomainError> {
    let shared = require_game(registry, id)?;
    let game = shared.lock();
    game.discard_pile(key)
        .map(<[Card]>::to_vec)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Pile, key.to_string()))
}

/// Append a card to a keyed discard pile.
pub fn add_to_discard_pile(
    registry: &GameRegistry,
    id: Uuid,
    key: &str,
    rank: Rank,
    suit: Suit,
) -> Result<GameSnapshot, DomainError> {
    let shared = require_game(registry, id)?;
    let mut game = shared.lock();
    let mut card = Card::new(rank, suit);
    card.face_up = true;
    game.add_to_discard_pile(key, card);
    Ok(snapshot(&game))
}

/// Age-based sweep over the registry.
pub fn cleanup_old_games(registry: &GameRegistry, max_age: Duration) -> usize {
    registry.cleanup_old_games(max_age)
}

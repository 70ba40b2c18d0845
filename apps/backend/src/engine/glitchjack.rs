//! Glitchjack rules: blackjack played over a randomized deck
//! composition, with explicit turn tracking.
//!
//! Differences from blackjack: the initial deal gives every player their
//! first card before the dealer's, and the dealer's *second* card is the
//! hole card; hit and stand are rejected out of turn; after each action
//! the engine scans forward for the next seat still in the round.

use crate::domain::cards::{Card, Rank};
use crate::domain::game::{Game, GameStatus, GameType};
use crate::domain::player::PlayerId;
use crate::errors::domain::{DomainError, NotFoundKind};

use super::Outcome;

const TARGET: u8 = 21;
const DEALER_STAND: u8 = 17;

fn ensure_glitchjack(game: &Game) -> Result<(), DomainError> {
    if game.game_type != GameType::Glitchjack {
        return Err(DomainError::wrong_game_type(format!(
            "expected glitchjack, game is {}",
            game.game_type
        )));
    }
    Ok(())
}

fn ensure_in_progress(game: &Game) -> Result<(), DomainError> {
    if game.status() != GameStatus::InProgress {
        return Err(DomainError::phase_mismatch(format!(
            "game is {:?}",
            game.status()
        )));
    }
    Ok(())
}

/// The acting player must be the seat at the cursor. When the roster
/// changed since the cursor was set this comparison can miss; callers
/// that remove players mid-game re-validate the cursor themselves.
fn ensure_turn(game: &Game, player: PlayerId) -> Result<(), DomainError> {
    if game.player(player).is_none() {
        return Err(DomainError::not_found(
            NotFoundKind::Player,
            player.to_string(),
        ));
    }
    match game.cursor_player() {
        Some(seat) if seat.id == player => Ok(()),
        _ => Err(DomainError::OutOfTurn),
    }
}

/// Start the round over the randomized composition: every player's first
/// card, the dealer's first (face up), every player's second card, then
/// the dealer's hole card. Mid-sequence exhaustion aborts in place.
pub fn start(game: &mut Game) -> Result<(), DomainError> {
    ensure_glitchjack(game)?;
    if game.status() != GameStatus::Waiting {
        return Err(DomainError::phase_mismatch(format!(
            "game already {:?}",
            game.status()
        )));
    }
    if game.players.is_empty() {
        return Err(DomainError::not_startable("no players seated"));
    }

    game.transition_to(GameStatus::InProgress)?;

    let seats: Vec<PlayerId> = game.players.iter().map(|p| p.id).collect();
    for &seat in &seats {
        game.deal_to_player(seat, true)
            .ok_or(DomainError::DeckExhausted)?;
    }
    game.deal_to_player(PlayerId::Dealer, true)
        .ok_or(DomainError::DeckExhausted)?;
    for &seat in &seats {
        game.deal_to_player(seat, true)
            .ok_or(DomainError::DeckExhausted)?;
    }
    game.deal_to_player(PlayerId::Dealer, false)
        .ok_or(DomainError::DeckExhausted)?;

    game.current_player = first_active(game, 0);
    if game.current_player.is_none() {
        // Nobody can act; the dealer plays out immediately.
        dealer_turn(game)?;
    }
    Ok(())
}

/// Deal one face-up card to the acting player. A bust ends their turn
/// and advances the scan.
pub fn hit(game: &mut Game, player: PlayerId) -> Result<Card, DomainError> {
    ensure_glitchjack(game)?;
    ensure_in_progress(game)?;
    ensure_turn(game, player)?;

    let card = game
        .deal_to_player(player, true)
        .ok_or(DomainError::DeckExhausted)?;

    let mut busted = false;
    if let Some(seat) = game.player_mut(player) {
        if hand_value(&seat.hand) > TARGET {
            seat.busted = true;
            busted = true;
        }
    }
    if busted {
        advance(game)?;
    }
    Ok(card)
}

/// Mark the acting player standing and advance the scan.
pub fn stand(game: &mut Game, player: PlayerId) -> Result<(), DomainError> {
    ensure_glitchjack(game)?;
    ensure_in_progress(game)?;
    ensure_turn(game, player)?;

    if let Some(seat) = game.player_mut(player) {
        seat.standing = true;
    }
    advance(game)
}

/// Scan forward from the cursor for the next seat neither standing nor
/// busted; when none remains, hand the round to the dealer.
fn advance(game: &mut Game) -> Result<(), DomainError> {
    let from = game.current_player.map_or(0, |i| i + 1);
    game.current_player = first_active(game, from);
    if game.current_player.is_none() {
        dealer_turn(game)?;
    }
    Ok(())
}

fn first_active(game: &Game, from: usize) -> Option<usize> {
    game.players
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, p)| p.is_active())
        .map(|(i, _)| i)
}

/// Reveal the hole card and draw to 17 or bust; the cursor stays at the
/// sentinel and the game finishes.
fn dealer_turn(game: &mut Game) -> Result<(), DomainError> {
    for card in &mut game.dealer.hand {
        card.face_up = true;
    }
    while hand_value(&game.dealer.hand) < DEALER_STAND {
        if game.deal_to_player(PlayerId::Dealer, true).is_none() {
            break;
        }
    }
    if hand_value(&game.dealer.hand) > TARGET {
        game.dealer.busted = true;
    }
    game.current_player = None;
    game.transition_to(GameStatus::Finished)
}

/// Best value over the randomized composition. Conventional ranks keep
/// their blackjack behavior: faces are 10, and a single ace upgrades to
/// 11 when the total allows (two elevens always bust, so at most one
/// upgrade can ever apply).
pub fn hand_value(hand: &[Card]) -> u8 {
    let total: u32 = hand
        .iter()
        .map(|c| u32::from(c.rank.pip_value()))
        .sum();
    let has_ace = hand.iter().any(|c| c.rank == Rank::Ace);
    if has_ace && total + 10 <= u32::from(TARGET) {
        (total + 10) as u8
    } else {
        total as u8
    }
}

/// A two-card 21 over the variant's own valuation.
pub fn is_natural(hand: &[Card]) -> bool {
    hand.len() == 2 && hand_value(hand) == TARGET
}

/// Per-player outcomes with blackjack's precedence, evaluated through
/// the variant's hand-value function.
pub fn results(game: &Game) -> Result<Vec<(PlayerId, Outcome)>, DomainError> {
    ensure_glitchjack(game)?;
    if game.status() != GameStatus::Finished {
        return Err(DomainError::phase_mismatch(format!(
            "results requested while {:?}",
            game.status()
        )));
    }

    let dealer_value = hand_value(&game.dealer.hand);
    let dealer_natural = is_natural(&game.dealer.hand);
    let dealer_bust = dealer_value > TARGET;

    Ok(game
        .players
        .iter()
        .map(|p| {
            let value = hand_value(&p.hand);
            let outcome = if p.busted || value > TARGET {
                Outcome::Bust
            } else if is_natural(&p.hand) && !dealer_natural {
                Outcome::Blackjack
            } else if dealer_bust || value > dealer_value {
                Outcome::Win
            } else if value == dealer_value {
                Outcome::Push
            } else {
                Outcome::Lose
            };
            (p.id, outcome)
        })
        .collect())
}

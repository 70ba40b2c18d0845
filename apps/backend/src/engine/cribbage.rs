//! Cribbage: the deal, crib discards, the starter cut, and show scoring.
//!
//! The table's dealer seat is a full participant here: it holds a hand
//! and owns the crib. Counting the dealer, two hands play with six cards
//! each; three or four hands play with five (three-hand games seed the
//! crib with one card off the deck). The play (pegging) phase is not
//! modeled; a game moves from the deal through discards and the cut
//! straight to the show.

use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::game::{Game, GameStatus, GameType};
use crate::domain::player::PlayerId;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Discard pile holding the crib.
pub const CRIB_PILE: &str = "crib";
/// Discard pile holding the cut starter card.
pub const STARTER_PILE: &str = "starter";

/// Cards each hand keeps for the show.
pub const SHOW_HAND: usize = 4;

/// Points for a jack turned up as the starter ("his heels").
const HEELS: u32 = 2;

fn ensure_cribbage(game: &Game) -> Result<(), DomainError> {
    if game.game_type != GameType::Cribbage {
        return Err(DomainError::wrong_game_type(format!(
            "expected cribbage, game is {}",
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

fn starter_card(game: &Game) -> Option<Card> {
    game.discard_pile(STARTER_PILE)
        .and_then(|pile| pile.first())
        .cloned()
}

/// Deal the round. Hands are private, so every card goes out face down.
/// Mid-sequence exhaustion aborts in place, like the other engines.
pub fn start(game: &mut Game) -> Result<(), DomainError> {
    ensure_cribbage(game)?;
    if game.status() != GameStatus::Waiting {
        return Err(DomainError::phase_mismatch(format!(
            "game already {:?}",
            game.status()
        )));
    }
    let hands = game.players.len() + 1;
    if !(2..=4).contains(&hands) {
        return Err(DomainError::not_startable(format!(
            "cribbage needs 2-4 hands including the dealer, got {hands}"
        )));
    }

    game.transition_to(GameStatus::InProgress)?;

    let per_hand = if hands == 2 { 6 } else { 5 };
    let seats: Vec<PlayerId> = game.players.iter().map(|p| p.id).collect();
    for _ in 0..per_hand {
        for &seat in &seats {
            game.deal_to_player(seat, false)
                .ok_or(DomainError::DeckExhausted)?;
        }
        game.deal_to_player(PlayerId::Dealer, false)
            .ok_or(DomainError::DeckExhausted)?;
    }
    if hands == 3 {
        // Three-hand games balance the crib with a card off the deck.
        let card = game.deck.deal().ok_or(DomainError::DeckExhausted)?;
        game.add_to_discard_pile(CRIB_PILE, card);
    }

    game.current_player = None;
    Ok(())
}

/// Move the named cards from a hand into the crib. Every hand must end
/// at four cards before the starter can be cut.
pub fn discard_to_crib(
    game: &mut Game,
    player: PlayerId,
    cards: &[(Rank, Suit)],
) -> Result<(), DomainError> {
    ensure_cribbage(game)?;
    ensure_in_progress(game)?;
    if starter_card(game).is_some() {
        return Err(DomainError::phase_mismatch(
            "starter already cut, discards are closed",
        ));
    }
    let hand_len = match game.player(player) {
        Some(seat) => seat.hand.len(),
        None => {
            return Err(DomainError::not_found(
                NotFoundKind::Player,
                player.to_string(),
            ))
        }
    };
    if hand_len < cards.len() || hand_len - cards.len() < SHOW_HAND {
        return Err(DomainError::phase_mismatch(format!(
            "hand of {hand_len} cannot give {} to the crib and keep {SHOW_HAND}",
            cards.len()
        )));
    }

    for &(rank, suit) in cards {
        let removed = match game.player_mut(player) {
            Some(seat) => {
                match seat
                    .hand
                    .iter()
                    .position(|c| c.rank == rank && c.suit == suit)
                {
                    Some(idx) => Some(seat.hand.remove(idx)),
                    None => None,
                }
            }
            None => None,
        };
        let card = removed.ok_or(DomainError::CardNotInHand)?;
        game.add_to_discard_pile(CRIB_PILE, card);
    }
    Ok(())
}

/// Cut the starter once every hand is down to four cards. A jack starter
/// is "his heels" and scores two for the dealer at the show.
pub fn cut_starter(game: &mut Game) -> Result<Card, DomainError> {
    ensure_cribbage(game)?;
    ensure_in_progress(game)?;
    if starter_card(game).is_some() {
        return Err(DomainError::phase_mismatch("starter already cut"));
    }
    let all_ready = game
        .players
        .iter()
        .chain(std::iter::once(&game.dealer))
        .all(|p| p.hand.len() == SHOW_HAND);
    if !all_ready {
        return Err(DomainError::phase_mismatch(
            "crib discards incomplete, every hand must hold four cards",
        ));
    }

    let mut card = game.deck.deal().ok_or(DomainError::DeckExhausted)?;
    card.face_up = true;
    game.add_to_discard_pile(STARTER_PILE, card.clone());
    Ok(card)
}

/// Score the show and finish the game. Each hand counts against the
/// starter; the crib counts for the dealer, as do his heels when the
/// starter is a jack.
pub fn score_show(game: &mut Game) -> Result<Vec<(PlayerId, u32)>, DomainError> {
    ensure_cribbage(game)?;
    ensure_in_progress(game)?;
    let starter = starter_card(game).ok_or_else(|| {
        DomainError::phase_mismatch("starter not cut, nothing to score")
    })?;

    let mut scores: Vec<(PlayerId, u32)> = game
        .players
        .iter()
        .map(|p| (p.id, score_hand(&p.hand, &starter, false)))
        .collect();

    let mut dealer_total = score_hand(&game.dealer.hand, &starter, false);
    if let Some(crib) = game.discard_pile(CRIB_PILE) {
        dealer_total += score_hand(crib, &starter, true);
    }
    if starter.rank == Rank::Jack {
        dealer_total += HEELS;
    }
    scores.push((PlayerId::Dealer, dealer_total));

    game.current_player = None;
    game.transition_to(GameStatus::Finished)?;
    Ok(scores)
}

/// Score one hand (or the crib) against the starter: fifteens, pairs,
/// runs, flush, and nobs. Crib flushes must include the starter.
pub fn score_hand(hand: &[Card], starter: &Card, is_crib: bool) -> u32 {
    let mut all: Vec<&Card> = hand.iter().collect();
    all.push(starter);

    fifteens(&all) + pairs(&all) + runs(&all) + flush(hand, starter, is_crib) + nobs(hand, starter)
}

/// Two points for every distinct combination of cards summing to
/// fifteen, faces counting ten.
fn fifteens(cards: &[&Card]) -> u32 {
    let mut points = 0;
    for mask in 1u32..(1 << cards.len()) {
        let sum: u32 = cards
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, c)| u32::from(c.rank.pip_value()))
            .sum();
        if sum == 15 {
            points += 2;
        }
    }
    points
}

/// Two points per pair of equal ranks.
fn pairs(cards: &[&Card]) -> u32 {
    let mut points = 0;
    for (i, a) in cards.iter().enumerate() {
        for b in &cards[i + 1..] {
            if a.rank == b.rank {
                points += 2;
            }
        }
    }
    points
}

/// Runs of three or more consecutive ranks; duplicate ranks multiply
/// the count of distinct runs.
fn runs(cards: &[&Card]) -> u32 {
    let mut counts = [0u32; 14];
    for card in cards {
        counts[card.rank.value() as usize] += 1;
    }

    let mut points = 0;
    let mut len = 0u32;
    let mut combos = 1u32;
    for value in 1..=14usize {
        if value <= 13 && counts[value] > 0 {
            len += 1;
            combos *= counts[value];
        } else {
            if len >= 3 {
                points += len * combos;
            }
            len = 0;
            combos = 1;
        }
    }
    points
}

/// Four points for a one-suit hand, five when the starter matches. The
/// crib only scores a five-card flush.
fn flush(hand: &[Card], starter: &Card, is_crib: bool) -> u32 {
    let Some(first) = hand.first() else {
        return 0;
    };
    if !hand.iter().all(|c| c.suit == first.suit) {
        return 0;
    }
    if starter.suit == first.suit {
        hand.len() as u32 + 1
    } else if is_crib {
        0
    } else {
        hand.len() as u32
    }
}

/// One point for holding the jack of the starter's suit.
fn nobs(hand: &[Card], starter: &Card) -> u32 {
    let has_nobs = hand
        .iter()
        .any(|c| c.rank == Rank::Jack && c.suit == starter.suit);
    u32::from(has_nobs)
}

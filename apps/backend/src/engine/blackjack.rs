//! Blackjack rules: the initial deal, hit/stand, the dealer's automated
//! turn, hand valuation, and results.

use crate::domain::cards::{Card, Rank};
use crate::domain::game::{Game, GameStatus, GameType};
use crate::domain::player::PlayerId;
use crate::errors::domain::{DomainError, NotFoundKind};

use super::Outcome;

/// Target hand value.
pub const BLACKJACK: u8 = 21;
/// The dealer draws while strictly below this value.
pub const DEALER_STAND: u8 = 17;

fn ensure_blackjack(game: &Game) -> Result<(), DomainError> {
    if game.game_type != GameType::Blackjack {
        return Err(DomainError::wrong_game_type(format!(
            "expected blackjack, game is {}",
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

// Hit and stand address seated players; the dealer only ever plays its
// automated turn.
fn require_player(game: &Game, player: PlayerId) -> Result<(), DomainError> {
    if player.is_dealer() || game.player(player).is_none() {
        return Err(DomainError::not_found(
            NotFoundKind::Player,
            player.to_string(),
        ));
    }
    Ok(())
}

/// Start the round: two cards to every player face up and two to the
/// dealer, hole card first, one card to every seat per round.
///
/// If the deck runs dry mid-sequence the deal aborts where it stood; the
/// game keeps its partially dealt hands and the caller decides how to
/// recover (typically a deck reset).
pub fn start(game: &mut Game) -> Result<(), DomainError> {
    ensure_blackjack(game)?;
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
    for round in 0..2 {
        for &seat in &seats {
            game.deal_to_player(seat, true)
                .ok_or(DomainError::DeckExhausted)?;
        }
        // Hole card on the first round, face up on the second.
        let face_up = round == 1;
        game.deal_to_player(PlayerId::Dealer, face_up)
            .ok_or(DomainError::DeckExhausted)?;
    }

    game.current_player = Some(0);
    Ok(())
}

/// Deal one face-up card to the named player.
pub fn hit(game: &mut Game, player: PlayerId) -> Result<Card, DomainError> {
    ensure_blackjack(game)?;
    ensure_in_progress(game)?;
    require_player(game, player)?;

    let card = game
        .deal_to_player(player, true)
        .ok_or(DomainError::DeckExhausted)?;

    if let Some(seat) = game.player_mut(player) {
        if hand_value(&seat.hand) > BLACKJACK {
            seat.busted = true;
        }
    }
    Ok(card)
}

/// Mark the player standing and advance the cursor. Once the cursor
/// passes the last seat the dealer's automated turn runs and the game
/// finishes.
pub fn stand(game: &mut Game, player: PlayerId) -> Result<(), DomainError> {
    ensure_blackjack(game)?;
    ensure_in_progress(game)?;
    require_player(game, player)?;

    if let Some(seat) = game.player_mut(player) {
        seat.standing = true;
    }

    let next = game.current_player.map_or(0, |i| i + 1);
    if next >= game.players.len() {
        game.current_player = None;
        dealer_turn(game)?;
    } else {
        game.current_player = Some(next);
    }
    Ok(())
}

/// Reveal the hole card, then draw while the dealer's best value is
/// below 17. Deck exhaustion stops the draw without failing the turn.
fn dealer_turn(game: &mut Game) -> Result<(), DomainError> {
    if let Some(hole) = game.dealer.hand.first_mut() {
        hole.face_up = true;
    }
    while hand_value(&game.dealer.hand) < DEALER_STAND {
        if game.deal_to_player(PlayerId::Dealer, true).is_none() {
            break;
        }
    }
    if hand_value(&game.dealer.hand) > BLACKJACK {
        game.dealer.busted = true;
    }
    game.transition_to(GameStatus::Finished)
}

/// Best blackjack value of a hand: aces count 11 where that does not
/// bust, face cards count 10.
pub fn hand_value(hand: &[Card]) -> u8 {
    let mut total: u32 = 0;
    let mut aces = 0u32;
    for card in hand {
        if card.rank == Rank::Ace {
            aces += 1;
        }
        total += u32::from(card.rank.pip_value());
    }
    while aces > 0 && total + 10 <= u32::from(BLACKJACK) {
        total += 10;
        aces -= 1;
    }
    total as u8
}

/// A two-card 21, distinct from a 21 reached by drawing.
pub fn is_blackjack(hand: &[Card]) -> bool {
    hand.len() == 2 && hand_value(hand) == BLACKJACK
}

/// Per-player outcomes. Only valid once the game is finished.
///
/// Precedence: bust dominates, then blackjack against a non-blackjack
/// dealer, then dealer bust or the higher value, then push on equal
/// values.
pub fn results(game: &Game) -> Result<Vec<(PlayerId, Outcome)>, DomainError> {
    ensure_blackjack(game)?;
    if game.status() != GameStatus::Finished {
        return Err(DomainError::phase_mismatch(format!(
            "results requested while {:?}",
            game.status()
        )));
    }

    let dealer_value = hand_value(&game.dealer.hand);
    let dealer_blackjack = is_blackjack(&game.dealer.hand);
    let dealer_bust = dealer_value > BLACKJACK;

    Ok(game
        .players
        .iter()
        .map(|p| {
            let value = hand_value(&p.hand);
            let outcome = if p.busted || value > BLACKJACK {
                Outcome::Bust
            } else if is_blackjack(&p.hand) && !dealer_blackjack {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::Suit;
    use crate::domain::deck::Deck;

    fn card(rank: Rank) -> Card {
        let mut c = Card::new(rank, Suit::Spades);
        c.face_up = true;
        c
    }

    fn new_game(players: &[&str]) -> Game {
        let mut game = Game::new(GameType::Blackjack, Deck::standard(), 7);
        for name in players {
            game.add_player(*name);
        }
        game
    }

    fn set_hand(game: &mut Game, id: PlayerId, ranks: &[Rank]) {
        let seat = game.player_mut(id).unwrap();
        seat.hand = ranks.iter().map(|&r| card(r)).collect();
    }

    #[test]
    fn hand_value_flexes_aces() {
        assert_eq!(hand_value(&[card(Rank::Ace), card(Rank::King)]), 21);
        assert_eq!(hand_value(&[card(Rank::Ace), card(Rank::Ace)]), 12);
        assert_eq!(
            hand_value(&[card(Rank::Ace), card(Rank::Nine), card(Rank::Five)]),
            15
        );
        assert_eq!(hand_value(&[card(Rank::Ace), card(Rank::Six)]), 17);
    }

    #[test]
    fn two_card_21_is_blackjack_but_drawn_21_is_not() {
        assert!(is_blackjack(&[card(Rank::Ace), card(Rank::Queen)]));
        assert!(!is_blackjack(&[
            card(Rank::Seven),
            card(Rank::Seven),
            card(Rank::Seven)
        ]));
    }

    #[test]
    fn start_deals_two_rounds_with_the_hole_card_down() {
        let mut game = new_game(&["Alice", "Bob"]);
        start(&mut game).unwrap();

        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.deck.remaining(), 52 - 2 * 2 - 2);
        for p in &game.players {
            assert_eq!(p.hand.len(), 2);
            assert!(p.hand.iter().all(|c| c.face_up));
        }
        assert_eq!(game.dealer.hand.len(), 2);
        assert!(!game.dealer.hand[0].face_up);
        assert!(game.dealer.hand[1].face_up);
        assert_eq!(game.current_player, Some(0));
    }

    #[test]
    fn start_needs_at_least_one_player() {
        let mut game = new_game(&[]);
        assert!(matches!(
            start(&mut game),
            Err(DomainError::NotStartable(_))
        ));
        assert_eq!(game.status(), GameStatus::Waiting);
    }

    #[test]
    fn start_twice_is_a_phase_mismatch() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        assert!(matches!(
            start(&mut game),
            Err(DomainError::PhaseMismatch(_))
        ));
    }

    #[test]
    fn interrupted_start_leaves_the_partial_deal_in_place() {
        let mut game = new_game(&["Alice", "Bob"]);
        // Leave three cards: the second round cannot complete.
        while game.deck.remaining() > 3 {
            game.deck.deal();
        }
        assert_eq!(start(&mut game), Err(DomainError::DeckExhausted));
        assert_eq!(game.status(), GameStatus::InProgress);
        let dealt: usize = game.players.iter().map(|p| p.hand.len()).sum();
        assert_eq!(dealt + game.dealer.hand.len(), 3);
    }

    #[test]
    fn hit_rejects_wrong_phase_and_unknown_players() {
        let mut game = new_game(&["Alice"]);
        let alice = game.players[0].id;
        assert!(matches!(
            hit(&mut game, alice),
            Err(DomainError::PhaseMismatch(_))
        ));
        start(&mut game).unwrap();
        assert!(matches!(
            hit(&mut game, PlayerId::new()),
            Err(DomainError::NotFound(NotFoundKind::Player, _))
        ));
    }

    #[test]
    fn hit_marks_busts() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        let alice = game.players[0].id;
        set_hand(&mut game, alice, &[Rank::King, Rank::Queen, Rank::Five]);
        hit(&mut game, alice).unwrap();
        assert!(game.players[0].busted);
    }

    #[test]
    fn standing_past_the_last_player_runs_the_dealer_and_finishes() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        let alice = game.players[0].id;
        stand(&mut game, alice).unwrap();

        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.current_player, None);
        assert!(game.dealer.hand.iter().all(|c| c.face_up));
        let dealer = hand_value(&game.dealer.hand);
        assert!(dealer >= DEALER_STAND || game.dealer.busted);
    }

    #[test]
    fn stand_advances_to_the_next_seat_first() {
        let mut game = new_game(&["Alice", "Bob"]);
        start(&mut game).unwrap();
        let alice = game.players[0].id;
        stand(&mut game, alice).unwrap();
        assert_eq!(game.current_player, Some(1));
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn results_precedence_bust_dominates_even_on_a_tie() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        let alice = game.players[0].id;
        set_hand(&mut game, alice, &[Rank::King, Rank::Queen, Rank::Two]);
        game.player_mut(alice).unwrap().busted = true;
        set_hand(
            &mut game,
            PlayerId::Dealer,
            &[Rank::King, Rank::Queen, Rank::Two],
        );
        game.dealer.busted = true;
        game.transition_to(GameStatus::Finished).unwrap();

        let results = results(&game).unwrap();
        assert_eq!(results, vec![(alice, Outcome::Bust)]);
    }

    #[test]
    fn results_rank_blackjack_above_a_plain_21() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        let alice = game.players[0].id;
        set_hand(&mut game, alice, &[Rank::Ace, Rank::King]);
        set_hand(
            &mut game,
            PlayerId::Dealer,
            &[Rank::Seven, Rank::Seven, Rank::Seven],
        );
        game.transition_to(GameStatus::Finished).unwrap();
        assert_eq!(results(&game).unwrap()[0].1, Outcome::Blackjack);
    }

    #[test]
    fn results_push_on_equal_blackjacks_and_equal_values() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        let alice = game.players[0].id;
        set_hand(&mut game, alice, &[Rank::Ace, Rank::King]);
        set_hand(&mut game, PlayerId::Dealer, &[Rank::Ace, Rank::Queen]);
        game.transition_to(GameStatus::Finished).unwrap();
        assert_eq!(results(&game).unwrap()[0].1, Outcome::Push);
    }

    #[test]
    fn results_win_when_the_dealer_busts() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        let alice = game.players[0].id;
        set_hand(&mut game, alice, &[Rank::Ten, Rank::Two]);
        set_hand(
            &mut game,
            PlayerId::Dealer,
            &[Rank::King, Rank::Queen, Rank::Five],
        );
        game.dealer.busted = true;
        game.transition_to(GameStatus::Finished).unwrap();
        assert_eq!(results(&game).unwrap()[0].1, Outcome::Win);
    }

    #[test]
    fn results_lose_below_the_dealer() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        let alice = game.players[0].id;
        set_hand(&mut game, alice, &[Rank::Ten, Rank::Six]);
        set_hand(&mut game, PlayerId::Dealer, &[Rank::Ten, Rank::Nine]);
        game.transition_to(GameStatus::Finished).unwrap();
        assert_eq!(results(&game).unwrap()[0].1, Outcome::Lose);
    }

    #[test]
    fn results_require_a_finished_game() {
        let mut game = new_game(&["Alice"]);
        start(&mut game).unwrap();
        assert!(matches!(
            results(&game),
            Err(DomainError::PhaseMismatch(_))
        ));
    }
}

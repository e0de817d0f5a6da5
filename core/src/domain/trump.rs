//! Trump selection, 3-seat exchange, and reveal (C4).

use super::cards::{Card, Suit};
use super::state::{
    CardExchangeState, Game, GamePhase, Mode, PlayingState, TrumpSelectionState,
};
use crate::errors::{DomainError, ValidationKind};

fn set_first_player(game: &Game, trumper_seat: usize, bid_amount: u16) -> (usize, u32) {
    let turn_seat = if bid_amount == crate::domain::bidding::MAX_BID {
        trumper_seat
    } else {
        game.next_seat(game.dealer_seat)
    };
    (turn_seat, 1)
}

/// Selects the trump suit and stashes `card` face-down. Transitions to
/// `CardExchange` in mode 3, otherwise straight to `Playing`.
pub fn select_trump(
    game: &mut Game,
    seat: usize,
    suit: Suit,
    card: Card,
) -> Result<(), DomainError> {
    let ts = match &game.phase {
        GamePhase::TrumpSelection(ts) => ts.clone(),
        _ => {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "not in trump selection phase",
            ))
        }
    };
    if ts.trumper_seat != seat {
        return Err(DomainError::validation(
            ValidationKind::NotTrumper,
            "only the trumper can select trump",
        ));
    }
    if card.suit != suit {
        return Err(DomainError::validation(
            ValidationKind::InvalidSuit,
            "trump card must be of the selected trump suit",
        ));
    }

    let player = game
        .player_at_mut(seat)
        .expect("trumper_seat always refers to a seated player");
    let pos = player
        .hand
        .iter()
        .position(|c| *c == card)
        .ok_or_else(|| DomainError::validation(ValidationKind::CardNotInHand, "you don't have that card"))?;
    player.hand.remove(pos);

    if game.mode == Mode::Three {
        game.phase = GamePhase::CardExchange(CardExchangeState {
            trumper_seat: ts.trumper_seat,
            bid_amount: ts.bid_amount,
            trump_suit: suit,
            trump_card: card,
        });
    } else {
        let (turn_seat, trick_number) = set_first_player(game, ts.trumper_seat, ts.bid_amount);
        game.phase = GamePhase::Playing(PlayingState {
            trumper_seat: ts.trumper_seat,
            bid_amount: ts.bid_amount,
            trump_suit: suit,
            trump_card: Some(card),
            trump_revealed: false,
            current_trick: Vec::new(),
            tricks_won: vec![Vec::new(); game.seat_count()],
            turn_seat,
            turn_deadline: None,
            trick_number,
            lead_seat: turn_seat,
            exchange_done: false,
        });
    }
    Ok(())
}

/// Trumper exchanges exactly two hand cards for the entire center pile
/// (mode 3 only). The two discarded cards remain in `center_pile` and are
/// credited to the opposing team at scoring.
pub fn exchange_cards(game: &mut Game, seat: usize, cards_to_give: &[Card]) -> Result<(), DomainError> {
    let ce = match &game.phase {
        GamePhase::CardExchange(ce) => ce.clone(),
        _ => {
            return Err(DomainError::validation(
                ValidationKind::NotInExchangePhase,
                "not in card exchange phase",
            ))
        }
    };
    if ce.trumper_seat != seat {
        return Err(DomainError::validation(
            ValidationKind::NotTrumper,
            "only the trumper can exchange cards",
        ));
    }
    if cards_to_give.len() != 2 {
        return Err(DomainError::validation(
            ValidationKind::WrongExchangeCount,
            "must exchange exactly 2 cards",
        ));
    }

    let picked_up = std::mem::take(&mut game.center_pile);

    let player = game.player_at_mut(seat).expect("trumper is seated");
    for card in cards_to_give {
        let pos = player
            .hand
            .iter()
            .position(|c| c == card)
            .ok_or_else(|| DomainError::validation(ValidationKind::CardNotInHand, format!("you don't have {card}")))?;
        player.hand.remove(pos);
    }
    player.hand.extend_from_slice(&picked_up);

    let (turn_seat, trick_number) = set_first_player(game, ce.trumper_seat, ce.bid_amount);
    game.center_pile = cards_to_give.to_vec();
    game.phase = GamePhase::Playing(PlayingState {
        trumper_seat: ce.trumper_seat,
        bid_amount: ce.bid_amount,
        trump_suit: ce.trump_suit,
        trump_card: Some(ce.trump_card),
        trump_revealed: false,
        current_trick: Vec::new(),
        tricks_won: vec![Vec::new(); game.seat_count()],
        turn_seat,
        turn_deadline: None,
        trick_number,
        lead_seat: turn_seat,
        exchange_done: true,
    });
    Ok(())
}

pub fn skip_exchange(game: &mut Game, seat: usize) -> Result<(), DomainError> {
    let ce = match &game.phase {
        GamePhase::CardExchange(ce) => ce.clone(),
        _ => {
            return Err(DomainError::validation(
                ValidationKind::NotInExchangePhase,
                "not in card exchange phase",
            ))
        }
    };
    if ce.trumper_seat != seat {
        return Err(DomainError::validation(
            ValidationKind::NotTrumper,
            "only the trumper can skip exchange",
        ));
    }

    let (turn_seat, trick_number) = set_first_player(game, ce.trumper_seat, ce.bid_amount);
    game.phase = GamePhase::Playing(PlayingState {
        trumper_seat: ce.trumper_seat,
        bid_amount: ce.bid_amount,
        trump_suit: ce.trump_suit,
        trump_card: Some(ce.trump_card),
        trump_revealed: false,
        current_trick: Vec::new(),
        tricks_won: vec![Vec::new(); game.seat_count()],
        turn_seat,
        turn_deadline: None,
        trick_number,
        lead_seat: turn_seat,
        exchange_done: true,
    });
    Ok(())
}

/// Reveals the trump suit, returning the trump card to the trumper's hand
/// (invariant 5). Idempotent-failure if already revealed or not selected.
pub fn reveal_trump(game: &mut Game) -> Result<(), DomainError> {
    let ps = match &mut game.phase {
        GamePhase::Playing(ps) => ps,
        _ => {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "trump can only be revealed during play",
            ))
        }
    };
    if ps.trump_revealed {
        return Err(DomainError::validation(
            ValidationKind::AlreadyRevealed,
            "trump is already revealed",
        ));
    }
    ps.trump_revealed = true;
    let trumper_seat = ps.trumper_seat;
    let trump_card = ps.trump_card.take();

    if let Some(card) = trump_card {
        let trumper = game
            .player_at_mut(trumper_seat)
            .expect("trumper_seat always refers to a seated player");
        trumper.hand.push(card);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::{Rank, Suit};
    use crate::domain::state::{Player, TrumpSelectionState};

    fn game_in_trump_selection(mode: Mode, trumper_seat: usize) -> Game {
        let seat_count = mode.seat_count();
        let mut players: Vec<Player> = (0..seat_count)
            .map(|seat| Player {
                id: format!("p{seat}"),
                name: format!("P{seat}"),
                seat,
                hand: vec![],
                connected: true,
            })
            .collect();
        players[trumper_seat].hand.push(Card {
            suit: Suit::Hearts,
            rank: Rank::Jack,
        });
        Game {
            game_code: "ABC123".into(),
            mode,
            dealer_seat: 0,
            players,
            center_pile: vec![],
            scores: vec![0; seat_count],
            games_played: 0,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            expires_at: None,
            phase: GamePhase::TrumpSelection(TrumpSelectionState {
                trumper_seat,
                bid_amount: 150,
            }),
            version: 0,
        }
    }

    #[test]
    fn select_trump_moves_card_out_of_hand_and_enters_playing_in_mode_four() {
        let mut g = game_in_trump_selection(Mode::Four, 1);
        let card = Card {
            suit: Suit::Hearts,
            rank: Rank::Jack,
        };
        select_trump(&mut g, 1, Suit::Hearts, card).unwrap();
        assert!(!g.players[1].hand.contains(&card));
        match &g.phase {
            GamePhase::Playing(ps) => {
                assert_eq!(ps.trump_card, Some(card));
                assert!(!ps.trump_revealed);
            }
            _ => panic!("expected Playing phase"),
        }
    }

    #[test]
    fn select_trump_enters_exchange_in_mode_three() {
        let mut g = game_in_trump_selection(Mode::Three, 0);
        let card = Card {
            suit: Suit::Hearts,
            rank: Rank::Jack,
        };
        select_trump(&mut g, 0, Suit::Hearts, card).unwrap();
        assert!(matches!(g.phase, GamePhase::CardExchange(_)));
    }

    #[test]
    fn reveal_trump_returns_card_to_trumper_hand_exactly_once() {
        let mut g = game_in_trump_selection(Mode::Four, 1);
        let card = Card {
            suit: Suit::Hearts,
            rank: Rank::Jack,
        };
        select_trump(&mut g, 1, Suit::Hearts, card).unwrap();
        reveal_trump(&mut g).unwrap();
        assert_eq!(g.players[1].hand.iter().filter(|c| **c == card).count(), 1);
        assert!(reveal_trump(&mut g).is_err());
    }

    #[test]
    fn bid_304_sets_trumper_as_first_player() {
        let mut g = game_in_trump_selection(Mode::Four, 1);
        if let GamePhase::TrumpSelection(ts) = &mut g.phase {
            ts.bid_amount = 304;
        }
        let card = Card {
            suit: Suit::Hearts,
            rank: Rank::Jack,
        };
        select_trump(&mut g, 1, Suit::Hearts, card).unwrap();
        match &g.phase {
            GamePhase::Playing(ps) => assert_eq!(ps.turn_seat, 1),
            _ => panic!("expected Playing"),
        }
    }
}

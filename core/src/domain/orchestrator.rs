//! Game orchestrator (C6): routes one validated `PlayerAction` into the
//! bidding/trump/trick engines (C3-C5), stamps the next turn deadline,
//! and reports what happened as a small sequence of domain events. The
//! session dispatcher (C8) turns these into wire events; this module
//! never touches a clock source other than `OffsetDateTime::now_utc`
//! for the deadline stamp itself, and never performs I/O.

use time::OffsetDateTime;

use super::bidding::{self, BidOutcome};
use super::cards::{Card, Suit};
use super::lifecycle::TURN_TIMEOUT;
use super::state::{Game, GamePhase};
use super::tricks::{self, PlayResult};
use super::trump;
use crate::errors::{DomainError, ValidationKind};

/// One validated client action, scoped to a single seat. Lobby-level
/// actions (`create_game`, `join_game`, `start_game`, `next_game`) live
/// in [`super::lifecycle`] instead — they don't route through a single
/// seat's turn the way these do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Bid { seat: usize, amount: Option<u16> },
    SelectTrump { seat: usize, suit: Suit, card: Card },
    ExchangeCards { seat: usize, cards: Vec<Card> },
    SkipExchange { seat: usize },
    PlayCard { seat: usize, card: Card, wants_to_cut: bool },
    AskTrump { seat: usize },
    RevealTrump { seat: usize },
}

/// What happened as a result of applying one [`PlayerAction`]. A caller
/// building wire events folds these into its own event shape; a caller
/// only interested in persistence can ignore them entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    BidPlaced { seat: usize, amount: Option<u16> },
    BiddingConcluded { trumper_seat: usize, bid_amount: u16 },
    TrumpSelected { seat: usize, suit: Suit },
    EnteredCardExchange,
    CardsExchanged { seat: usize },
    ExchangeSkipped { seat: usize },
    TrumpRevealed { by_seat: usize },
    CardPlayed { seat: usize, card: Card, is_cut: bool },
    TrickResolved { winner_seat: usize, trick_points: u32 },
    DrawsAfterTrick { draws: Vec<(usize, Card)> },
    GameScored { spoilt: bool, trumper_team_points: u32 },
    /// Edge-triggered: the turn became a specific seat (mirrors the
    /// reference implementation's own edge-triggered turn notice).
    TurnBecame { seat: usize },
}

fn stamp_turn_deadline(game: &mut Game) {
    if let GamePhase::Playing(ps) = &mut game.phase {
        ps.turn_deadline = Some(OffsetDateTime::now_utc() + TURN_TIMEOUT);
    }
}

/// Applies one action to `game`, mutating it in place and returning the
/// events it produced. On error, `game` is guaranteed untouched (every
/// branch validates before it mutates).
pub fn apply_action(game: &mut Game, action: PlayerAction) -> Result<Vec<GameEvent>, DomainError> {
    match action {
        PlayerAction::Bid { seat, amount } => apply_bid(game, seat, amount),
        PlayerAction::SelectTrump { seat, suit, card } => apply_select_trump(game, seat, suit, card),
        PlayerAction::ExchangeCards { seat, cards } => apply_exchange_cards(game, seat, &cards),
        PlayerAction::SkipExchange { seat } => apply_skip_exchange(game, seat),
        PlayerAction::PlayCard { seat, card, wants_to_cut } => apply_play_card(game, seat, card, wants_to_cut),
        PlayerAction::AskTrump { seat } => apply_ask_trump(game, seat),
        PlayerAction::RevealTrump { seat } => apply_reveal_trump(game, seat),
    }
}

fn apply_bid(game: &mut Game, seat: usize, amount: Option<u16>) -> Result<Vec<GameEvent>, DomainError> {
    let mut state = match &game.phase {
        GamePhase::Bidding(b) => b.clone(),
        _ => {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "not in bidding phase",
            ))
        }
    };
    bidding::validate_bid(game, &state, seat, amount)?;
    let mut events = vec![GameEvent::BidPlaced { seat, amount }];
    match bidding::place_bid(game, &mut state, seat, amount) {
        BidOutcome::NextBidder { seat: next } => {
            events.push(GameEvent::TurnBecame { seat: next });
            game.phase = GamePhase::Bidding(state);
        }
        BidOutcome::Concluded(ts) => {
            events.push(GameEvent::BiddingConcluded {
                trumper_seat: ts.trumper_seat,
                bid_amount: ts.bid_amount,
            });
            events.push(GameEvent::TurnBecame { seat: ts.trumper_seat });
            game.phase = GamePhase::TrumpSelection(ts);
        }
    }
    Ok(events)
}

fn apply_select_trump(
    game: &mut Game,
    seat: usize,
    suit: Suit,
    card: Card,
) -> Result<Vec<GameEvent>, DomainError> {
    trump::select_trump(game, seat, suit, card)?;
    let mut events = vec![GameEvent::TrumpSelected { seat, suit }];
    match &game.phase {
        GamePhase::CardExchange(_) => events.push(GameEvent::EnteredCardExchange),
        GamePhase::Playing(ps) => {
            events.push(GameEvent::TurnBecame { seat: ps.turn_seat });
            stamp_turn_deadline(game);
        }
        _ => unreachable!("select_trump only transitions to CardExchange or Playing"),
    }
    Ok(events)
}

fn apply_exchange_cards(game: &mut Game, seat: usize, cards: &[Card]) -> Result<Vec<GameEvent>, DomainError> {
    trump::exchange_cards(game, seat, cards)?;
    let turn_seat = match &game.phase {
        GamePhase::Playing(ps) => ps.turn_seat,
        _ => unreachable!("exchange_cards always transitions to Playing"),
    };
    stamp_turn_deadline(game);
    Ok(vec![
        GameEvent::CardsExchanged { seat },
        GameEvent::TurnBecame { seat: turn_seat },
    ])
}

fn apply_skip_exchange(game: &mut Game, seat: usize) -> Result<Vec<GameEvent>, DomainError> {
    trump::skip_exchange(game, seat)?;
    let turn_seat = match &game.phase {
        GamePhase::Playing(ps) => ps.turn_seat,
        _ => unreachable!("skip_exchange always transitions to Playing"),
    };
    stamp_turn_deadline(game);
    Ok(vec![
        GameEvent::ExchangeSkipped { seat },
        GameEvent::TurnBecame { seat: turn_seat },
    ])
}

fn apply_play_card(
    game: &mut Game,
    seat: usize,
    card: Card,
    wants_to_cut: bool,
) -> Result<Vec<GameEvent>, DomainError> {
    let ps = match &game.phase {
        GamePhase::Playing(ps) => ps.clone(),
        _ => {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "not in playing phase",
            ))
        }
    };
    tricks::validate_play(game, &ps, seat, card, wants_to_cut)?;
    let PlayResult { is_cut, trick } = tricks::play_card(game, seat, card)?;

    let mut events = vec![GameEvent::CardPlayed { seat, card, is_cut }];
    match trick {
        None => {
            if let GamePhase::Playing(ps) = &game.phase {
                events.push(GameEvent::TurnBecame { seat: ps.turn_seat });
            }
            stamp_turn_deadline(game);
        }
        Some(resolution) => {
            events.push(GameEvent::TrickResolved {
                winner_seat: resolution.winner_seat,
                trick_points: resolution.trick_points,
            });
            if !resolution.draws.is_empty() {
                events.push(GameEvent::DrawsAfterTrick { draws: resolution.draws });
            }
            if let Some(scoring) = resolution.scoring {
                events.push(GameEvent::GameScored {
                    spoilt: scoring.spoilt,
                    trumper_team_points: scoring.trumper_team_points,
                });
            } else {
                events.push(GameEvent::TurnBecame { seat: resolution.winner_seat });
                stamp_turn_deadline(game);
            }
        }
    }
    Ok(events)
}

fn apply_ask_trump(game: &mut Game, seat: usize) -> Result<Vec<GameEvent>, DomainError> {
    tricks::ask_trump(game, seat)?;
    Ok(vec![GameEvent::TrumpRevealed { by_seat: seat }])
}

fn apply_reveal_trump(game: &mut Game, seat: usize) -> Result<Vec<GameEvent>, DomainError> {
    let trumper_seat = match &game.phase {
        GamePhase::Playing(ps) => ps.trumper_seat,
        _ => {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "trump can only be revealed during play",
            ))
        }
    };
    if seat != trumper_seat {
        return Err(DomainError::validation(
            ValidationKind::NotTrumper,
            "only the trumper can reveal trump",
        ));
    }
    trump::reveal_trump(game)?;
    Ok(vec![GameEvent::TrumpRevealed { by_seat: seat }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lifecycle::{create_game, join_game, start_game};
    use crate::domain::rng::EngineRng;

    fn four_seat_started() -> Game {
        let mut game = create_game(4, "ABC123".into(), "u0", "P0").unwrap();
        for i in 1..4 {
            join_game(&mut game, format!("u{i}"), format!("P{i}")).unwrap();
        }
        let rng = EngineRng::seeded(3);
        start_game(&mut game, &rng).unwrap();
        game.dealer_seat = 0;
        if let GamePhase::Bidding(b) = &mut game.phase {
            b.bid_turn_seat = 1;
        }
        game
    }

    #[test]
    fn all_pass_concludes_bidding_to_dealer_at_min_bid() {
        let mut game = four_seat_started();
        for seat in [1usize, 2, 3, 0] {
            let events = apply_action(&mut game, PlayerAction::Bid { seat, amount: None }).unwrap();
            if seat == 0 {
                assert!(events
                    .iter()
                    .any(|e| matches!(e, GameEvent::BiddingConcluded { trumper_seat: 0, bid_amount: 150 })));
            }
        }
        assert!(matches!(game.phase, GamePhase::TrumpSelection(_)));
    }

    #[test]
    fn bid_out_of_turn_is_rejected_and_leaves_game_untouched() {
        let mut game = four_seat_started();
        let before = game.clone();
        let err = apply_action(&mut game, PlayerAction::Bid { seat: 2, amount: Some(150) }).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationKind::NotYourTurn, _)));
        assert_eq!(game, before);
    }
}

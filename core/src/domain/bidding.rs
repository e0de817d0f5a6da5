//! Bidding engine (C3).

use super::state::{Bid, BiddingState, Game, GamePhase, Mode, TrumpSelectionState};
use crate::errors::{DomainError, ValidationKind};

pub const MIN_BID: u16 = 150;
pub const MAX_BID: u16 = 304;
pub const BID_STEP: u16 = 10;
pub const SPECIAL_BID_THRESHOLD: u16 = 200;

/// `(win_points, loss_points)` awarded at game end, keyed by the winning bid.
pub fn scoring_tokens(bid_amount: u16) -> (i32, i32) {
    if bid_amount == MAX_BID {
        (10, 7)
    } else if bid_amount >= SPECIAL_BID_THRESHOLD {
        (6, 5)
    } else {
        (5, 3)
    }
}

/// Starts bidding: first bidder is left of the dealer.
pub fn start_bidding(dealer_seat: usize, seat_count: usize) -> BiddingState {
    BiddingState {
        bids: Vec::new(),
        current_bid: None,
        bid_turn_seat: (dealer_seat + 1) % seat_count,
    }
}

fn has_bid(state: &BiddingState, seat: usize) -> bool {
    state.bids.iter().any(|b| b.seat == seat)
}

fn highest_bid_amount(state: &BiddingState) -> u16 {
    state
        .bids
        .iter()
        .filter_map(|b| b.amount)
        .max()
        .unwrap_or(0)
}

fn any_200_plus_bid(state: &BiddingState) -> bool {
    state
        .bids
        .iter()
        .any(|b| b.amount.is_some_and(|a| a >= SPECIAL_BID_THRESHOLD))
}

fn partner_bid_amount(game: &Game, state: &BiddingState, seat: usize) -> Option<u16> {
    let partner = game.partner_seat(seat)?;
    state
        .bids
        .iter()
        .find(|b| b.seat == partner)
        .and_then(|b| b.amount)
}

/// Validates a bid or pass without mutating anything. See spec §4.3.
pub fn validate_bid(
    game: &Game,
    state: &BiddingState,
    seat: usize,
    amount: Option<u16>,
) -> Result<(), DomainError> {
    if !matches!(game.phase, GamePhase::Bidding(_)) {
        return Err(DomainError::validation(
            ValidationKind::WrongPhase,
            "not in bidding phase",
        ));
    }
    if state.bid_turn_seat != seat {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            "not your turn to bid",
        ));
    }

    let amount = match amount {
        None => return Ok(()),
        Some(a) => a,
    };

    if amount < MIN_BID {
        return Err(DomainError::validation(
            ValidationKind::BidTooLow,
            format!("minimum bid is {MIN_BID}"),
        ));
    }
    if amount > MAX_BID {
        return Err(DomainError::validation(
            ValidationKind::BidTooLow,
            format!("maximum bid is {MAX_BID}"),
        ));
    }
    if amount != MAX_BID && amount % BID_STEP != 0 {
        return Err(DomainError::validation(
            ValidationKind::BidTooLow,
            format!("bid must be a multiple of {BID_STEP}"),
        ));
    }

    let current_highest = highest_bid_amount(state);
    if current_highest > 0 && amount <= current_highest {
        return Err(DomainError::validation(
            ValidationKind::BidTooLow,
            format!("bid must exceed current highest bid of {current_highest}"),
        ));
    }

    let already_bid = has_bid(state, seat);
    let any_200 = any_200_plus_bid(state);
    let is_200_plus = amount >= SPECIAL_BID_THRESHOLD;

    if already_bid && !(is_200_plus && !any_200) {
        return Err(DomainError::validation(
            ValidationKind::RebidNotAllowed,
            "you have already bid or passed",
        ));
    }

    let own_highest = state
        .bids
        .iter()
        .filter(|b| b.seat == seat)
        .filter_map(|b| b.amount)
        .max();
    if let Some(my_highest) = own_highest {
        let someone_overbid = state
            .bids
            .iter()
            .any(|b| b.seat != seat && b.amount.is_some_and(|a| a > my_highest));
        if !someone_overbid {
            return Err(DomainError::validation(
                ValidationKind::SelfOverbid,
                "cannot overbid yourself unless someone has overbid you",
            ));
        }
    }

    if game.mode == Mode::Four {
        if let Some(partner_amount) = partner_bid_amount(game, state, seat) {
            if amount > partner_amount {
                let partner = game.partner_seat(seat);
                let opponent_overbid_partner = state.bids.iter().any(|b| {
                    Some(b.seat) != partner
                        && b.seat != seat
                        && b.amount.is_some_and(|a| a > partner_amount)
                });
                if !opponent_overbid_partner && !(is_200_plus && !any_200) {
                    return Err(DomainError::validation(
                        ValidationKind::PartnerOverbid,
                        "cannot overbid your partner unless an opponent has overbid them",
                    ));
                }
            }
        }
    }

    Ok(())
}

pub enum BidOutcome {
    NextBidder { seat: usize },
    Concluded(TrumpSelectionState),
}

/// Appends a validated bid and advances to the next bidder, or concludes
/// bidding. Mirrors the reference implementation's advance logic exactly:
/// seats that have already bid are skipped during the scan even when they
/// could in principle re-bid under the 200+ rule (see the open-question
/// note in the crate-level design doc).
pub fn place_bid(
    game: &Game,
    state: &mut BiddingState,
    seat: usize,
    amount: Option<u16>,
) -> BidOutcome {
    let bid = Bid { seat, amount };
    state.bids.push(bid);
    if amount.is_some() {
        state.current_bid = Some(bid);
    }

    let seat_count = game.seat_count();
    let mut current = state.bid_turn_seat;
    for _ in 0..seat_count {
        current = (current + 1) % seat_count;
        if has_bid(state, current) {
            continue;
        }
        state.bid_turn_seat = current;
        return BidOutcome::NextBidder { seat: current };
    }

    conclude_bidding(game, state)
}

fn conclude_bidding(game: &Game, state: &mut BiddingState) -> BidOutcome {
    if state.current_bid.is_none() {
        let forced = Bid {
            seat: game.dealer_seat,
            amount: Some(MIN_BID),
        };
        state.bids.push(forced);
        state.current_bid = Some(forced);
    }

    let bid = state.current_bid.expect("forced above if absent");
    BidOutcome::Concluded(TrumpSelectionState {
        trumper_seat: bid.seat,
        bid_amount: bid.amount.expect("current_bid always carries an amount"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::{Mode, Player};

    fn game(mode: Mode, dealer_seat: usize, phase: GamePhase) -> Game {
        let seat_count = mode.seat_count();
        Game {
            game_code: "ABC123".into(),
            mode,
            dealer_seat,
            players: (0..seat_count)
                .map(|seat| Player {
                    id: format!("p{seat}"),
                    name: format!("P{seat}"),
                    seat,
                    hand: vec![],
                    connected: true,
                })
                .collect(),
            center_pile: vec![],
            scores: vec![0; seat_count],
            games_played: 0,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            expires_at: None,
            phase,
            version: 0,
        }
    }

    fn bidding_game(mode: Mode, dealer_seat: usize) -> (Game, BiddingState) {
        let state = start_bidding(dealer_seat, mode.seat_count());
        let g = game(mode, dealer_seat, GamePhase::Bidding(state.clone()));
        (g, state)
    }

    #[test]
    fn s1_four_seat_all_pass_forces_dealer_to_min_bid() {
        let (mut g, mut state) = bidding_game(Mode::Four, 0);
        // dealer=0, first bidder = seat 1
        for seat in [1usize, 2, 3, 0] {
            assert_eq!(state.bid_turn_seat, seat);
            validate_bid(&g, &state, seat, None).unwrap();
            match place_bid(&g, &mut state, seat, None) {
                BidOutcome::NextBidder { seat: next } if seat != 0 => {
                    assert_eq!(state.bid_turn_seat, next);
                }
                BidOutcome::Concluded(ts) => {
                    assert_eq!(seat, 0, "conclusion should happen after seat 0 passes");
                    assert_eq!(ts.trumper_seat, g.dealer_seat);
                    assert_eq!(ts.bid_amount, MIN_BID);
                    g.phase = GamePhase::TrumpSelection(ts);
                }
                _ => {}
            }
        }
        assert!(matches!(g.phase, GamePhase::TrumpSelection(_)));
    }

    #[test]
    fn bid_must_strictly_exceed_current_highest() {
        let (g, mut state) = bidding_game(Mode::Four, 0);
        place_bid(&g, &mut state, 1, Some(150));
        let err = validate_bid(&g, &state, 2, Some(150)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationKind::BidTooLow, _)));
    }

    #[test]
    fn rebid_without_200_plus_is_rejected() {
        let (g, mut state) = bidding_game(Mode::Four, 0);
        place_bid(&g, &mut state, 1, Some(150));
        place_bid(&g, &mut state, 2, None);
        place_bid(&g, &mut state, 3, None);
        // seat 1 tries to bid again below 200
        state.bid_turn_seat = 1;
        let err = validate_bid(&g, &state, 1, Some(160)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::RebidNotAllowed, _)
        ));
    }

    #[test]
    fn self_overbid_is_rejected_unless_someone_else_overbid() {
        let (g, mut state) = bidding_game(Mode::Four, 0);
        place_bid(&g, &mut state, 1, Some(200));
        state.bid_turn_seat = 1;
        let err = validate_bid(&g, &state, 1, Some(210)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationKind::SelfOverbid, _)));
    }

    #[test]
    fn partner_overbid_rejected_in_mode_four() {
        let (g, mut state) = bidding_game(Mode::Four, 0);
        // seat 1 and seat 3 are partners (offset 2)
        place_bid(&g, &mut state, 1, Some(200));
        state.bid_turn_seat = 2;
        place_bid(&g, &mut state, 2, None);
        state.bid_turn_seat = 3;
        let err = validate_bid(&g, &state, 3, Some(210)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::PartnerOverbid, _)
        ));
    }

    #[test]
    fn scoring_tokens_table() {
        assert_eq!(scoring_tokens(304), (10, 7));
        assert_eq!(scoring_tokens(250), (6, 5));
        assert_eq!(scoring_tokens(200), (6, 5));
        assert_eq!(scoring_tokens(150), (5, 3));
    }
}

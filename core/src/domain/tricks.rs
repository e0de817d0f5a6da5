//! Trick play, cutting, draws, and end-of-game scoring (C5).

use std::collections::HashSet;

use super::bidding::scoring_tokens;
use super::cards::{beats, points, Card, Suit};
use super::state::{Game, GamePhase, Mode, PlayingState, ScoringState, TrickCard};
use crate::errors::{DomainError, ValidationKind};

/// Always 8 in every mode; mode 2's extra length comes from draws, not
/// extra tricks.
const TOTAL_TRICKS: u32 = 8;

/// Suit of the first card played this trick, or `None` if the trick is
/// empty and whoever is on turn is leading.
pub fn calling_suit(ps: &PlayingState) -> Option<Suit> {
    ps.current_trick.first().map(|tc| tc.card.suit)
}

/// Cards `seat` may legally play. Leading (or holding none of the calling
/// suit) means the whole hand is fair game; cut-intent validation happens
/// separately in [`validate_play`].
pub fn legal_cards(game: &Game, ps: &PlayingState, seat: usize) -> Vec<Card> {
    let hand = match game.player_at(seat) {
        Some(p) => &p.hand,
        None => return Vec::new(),
    };
    match calling_suit(ps) {
        None => hand.clone(),
        Some(suit) => {
            let same_suit: Vec<Card> = hand.iter().copied().filter(|c| c.suit == suit).collect();
            if same_suit.is_empty() {
                hand.clone()
            } else {
                same_suit
            }
        }
    }
}

fn team_seats(game: &Game, trumper_seat: usize) -> Vec<usize> {
    match game.mode {
        Mode::Four => {
            let partner = (trumper_seat + 2) % 4;
            let mut seats = vec![trumper_seat, partner];
            seats.sort_unstable();
            seats
        }
        Mode::Two | Mode::Three => vec![trumper_seat],
    }
}

fn opposing_team_seats(game: &Game, trumper_seat: usize) -> Vec<usize> {
    let team: HashSet<usize> = team_seats(game, trumper_seat).into_iter().collect();
    (0..game.seat_count()).filter(|s| !team.contains(s)).collect()
}

/// Validates a prospective card play without mutating anything.
///
/// `wants_to_cut` mirrors the reference action layer's distinct "ask to
/// reveal, then cut" affordance: a concealed-trump cut is only legal once
/// the trumper has revealed, whether the trumper or an opponent is
/// cutting.
pub fn validate_play(
    game: &Game,
    ps: &PlayingState,
    seat: usize,
    card: Card,
    wants_to_cut: bool,
) -> Result<(), DomainError> {
    if !matches!(game.phase, GamePhase::Playing(_)) {
        return Err(DomainError::validation(
            ValidationKind::WrongPhase,
            "not in playing phase",
        ));
    }
    if ps.turn_seat != seat {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            "not your turn",
        ));
    }
    let player = game
        .player_at(seat)
        .ok_or_else(|| DomainError::not_found(crate::errors::NotFoundKind::Seat, "no such seat"))?;
    if !player.hand.contains(&card) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "you don't have that card",
        ));
    }
    let valid = legal_cards(game, ps, seat);
    if !valid.contains(&card) {
        return Err(DomainError::validation(
            ValidationKind::MustFollowSuit,
            "you must follow suit",
        ));
    }

    if let Some(lead) = calling_suit(ps) {
        if card.suit != lead && wants_to_cut && card.suit == ps.trump_suit && !ps.trump_revealed {
            return Err(DomainError::validation(
                ValidationKind::MustRevealBeforeCut,
                "trump must be revealed before cutting",
            ));
        }
    }

    Ok(())
}

pub struct PlayResult {
    pub is_cut: bool,
    pub trick: Option<TrickResolution>,
}

pub struct TrickResolution {
    pub winner_seat: usize,
    pub trick_points: u32,
    pub draws: Vec<(usize, Card)>,
    pub game_over: bool,
    pub trump_revealed_on_last_trick: bool,
    pub scoring: Option<ScoringState>,
}

/// Plays `card` from `seat`'s hand into the current trick. Resolves the
/// trick (and, if the round just ended, scores the game) when this is the
/// last card of the round.
pub fn play_card(game: &mut Game, seat: usize, card: Card) -> Result<PlayResult, DomainError> {
    let lead = {
        let ps = match &game.phase {
            GamePhase::Playing(ps) => ps,
            _ => {
                return Err(DomainError::validation(
                    ValidationKind::WrongPhase,
                    "not in playing phase",
                ))
            }
        };
        calling_suit(ps)
    };

    let player = game
        .player_at_mut(seat)
        .expect("seat validated by caller via validate_play");
    let pos = player
        .hand
        .iter()
        .position(|c| *c == card)
        .ok_or_else(|| DomainError::validation(ValidationKind::CardNotInHand, "you don't have that card"))?;
    player.hand.remove(pos);

    let ps = match &mut game.phase {
        GamePhase::Playing(ps) => ps,
        _ => unreachable!("checked above"),
    };

    let is_cut = match lead {
        Some(suit) if card.suit != suit => ps.trump_revealed && card.suit == ps.trump_suit,
        _ => false,
    };

    ps.current_trick.push(TrickCard { seat, card });

    if ps.current_trick.len() < game.seat_count() {
        let next = game.next_seat(seat);
        if let GamePhase::Playing(ps) = &mut game.phase {
            ps.turn_seat = next;
        }
        return Ok(PlayResult { is_cut, trick: None });
    }

    let resolution = resolve_trick(game)?;
    Ok(PlayResult {
        is_cut,
        trick: Some(resolution),
    })
}

fn resolve_trick(game: &mut Game) -> Result<TrickResolution, DomainError> {
    let (winner_seat, trick_points, trick_cards) = {
        let ps = match &game.phase {
            GamePhase::Playing(ps) => ps,
            _ => unreachable!("resolve_trick only called from play_card"),
        };
        let lead = ps.current_trick[0].card.suit;
        let mut winner = ps.current_trick[0];
        for tc in &ps.current_trick[1..] {
            if beats(tc.card, winner.card, ps.trump_suit, ps.trump_revealed, lead) {
                winner = *tc;
            }
        }
        let trick_points: u32 = ps.current_trick.iter().map(|tc| points(tc.card.rank)).sum();
        let trick_cards: Vec<Card> = ps.current_trick.iter().map(|tc| tc.card).collect();
        (winner.seat, trick_points, trick_cards)
    };

    let ps = match &mut game.phase {
        GamePhase::Playing(ps) => ps,
        _ => unreachable!(),
    };
    ps.tricks_won[winner_seat].extend(trick_cards);
    ps.current_trick.clear();
    ps.trick_number += 1;

    let mut draws = Vec::new();
    if game.mode == Mode::Two && !game.center_pile.is_empty() {
        draws = draw_cards_two_player(game, winner_seat);
    }

    // Empty-hands is the authoritative end-of-game signal in every mode;
    // the 8-trick cap in modes 3/4 is a secondary safety net that also
    // forces a reveal if trump was never played.
    let all_hands_empty = game.players.iter().all(|p| p.hand.is_empty());
    let hit_trick_cap = game.mode != Mode::Two && {
        let ps = match &game.phase {
            GamePhase::Playing(ps) => ps,
            _ => unreachable!(),
        };
        ps.trick_number > TOTAL_TRICKS
    };
    let game_over = all_hands_empty || hit_trick_cap;

    let mut trump_revealed_on_last_trick = false;
    if game_over {
        if hit_trick_cap {
            let ps = match &mut game.phase {
                GamePhase::Playing(ps) => ps,
                _ => unreachable!(),
            };
            if !ps.trump_revealed {
                ps.trump_revealed = true;
                if let Some(card) = ps.trump_card.take() {
                    let trumper_seat = ps.trumper_seat;
                    game.player_at_mut(trumper_seat)
                        .expect("trumper is seated")
                        .hand
                        .push(card);
                }
                trump_revealed_on_last_trick = true;
            }
        }
    } else {
        let ps = match &mut game.phase {
            GamePhase::Playing(ps) => ps,
            _ => unreachable!(),
        };
        ps.turn_seat = winner_seat;
        ps.lead_seat = winner_seat;
    }

    let scoring = if game_over { Some(score_game(game)?) } else { None };

    Ok(TrickResolution {
        winner_seat,
        trick_points,
        draws,
        game_over,
        trump_revealed_on_last_trick,
        scoring,
    })
}

/// Two-player draw: trick winner draws first, then the other seat, one
/// card each from the top of the center pile, until it runs dry.
fn draw_cards_two_player(game: &mut Game, winner_seat: usize) -> Vec<(usize, Card)> {
    let mut draws = Vec::new();
    let seats = [winner_seat, game.next_seat(winner_seat)];
    for seat in seats {
        if game.center_pile.is_empty() {
            break;
        }
        let card = game.center_pile.remove(0);
        game.player_at_mut(seat)
            .expect("seat is seated")
            .hand
            .push(card);
        draws.push((seat, card));
    }
    draws
}

/// Picks a legal card for `seat` at random, steering away from an
/// accidental trump cut while the trump is still concealed.
pub fn auto_play(
    game: &mut Game,
    seat: usize,
    rng: &super::rng::EngineRng,
) -> Result<PlayResult, DomainError> {
    let ps = match &game.phase {
        GamePhase::Playing(ps) => ps,
        _ => {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "not in playing phase",
            ))
        }
    };
    let valid = legal_cards(game, ps, seat);
    if valid.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "no valid cards to play",
        ));
    }

    let lead = calling_suit(ps);
    let trump_suit = ps.trump_suit;
    let trump_revealed = ps.trump_revealed;

    let chosen = if let Some(lead_suit) = lead {
        let would_cut = |c: &Card| c.suit != lead_suit && !trump_revealed;
        if valid.iter().any(would_cut) {
            let non_trump: Vec<Card> = valid.iter().copied().filter(|c| c.suit != trump_suit).collect();
            if !non_trump.is_empty() {
                *rng.choose(&non_trump).expect("non-empty")
            } else {
                *rng.choose(&valid).expect("non-empty")
            }
        } else {
            *rng.choose(&valid).expect("non-empty")
        }
    } else {
        *rng.choose(&valid).expect("non-empty")
    };

    play_card(game, seat, chosen)
}

/// A non-trumper's request to reveal trump before attempting to cut.
/// Only granted when the asker holds no card of the calling suit;
/// the trumper has no use for this action (they cut by revealing
/// themselves).
pub fn ask_trump(game: &mut Game, seat: usize) -> Result<(), DomainError> {
    let ps = match &game.phase {
        GamePhase::Playing(ps) => ps,
        _ => {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "trump can only be asked for during play",
            ))
        }
    };
    if seat == ps.trumper_seat {
        return Err(DomainError::validation(
            ValidationKind::NotTrumper,
            "the trumper reveals trump via reveal_trump, not ask_trump",
        ));
    }
    if let Some(lead) = calling_suit(ps) {
        let player = game
            .player_at(seat)
            .ok_or_else(|| DomainError::not_found(crate::errors::NotFoundKind::Seat, "no such seat"))?;
        if player.hand.iter().any(|c| c.suit == lead) {
            return Err(DomainError::validation(
                ValidationKind::CallingSuitInHand,
                "you still hold the calling suit",
            ));
        }
    }
    super::trump::reveal_trump(game)
}

/// Sum of card points won by each side, per spec §4.5.6. The concealed
/// trump card, if never revealed, counts for the trumper's side; the
/// mode-3 exchange discards count for the opposing side once the
/// exchange has happened.
pub fn calculate_team_points(game: &Game, ps: &PlayingState) -> (u32, u32) {
    let trumper_team: HashSet<usize> = team_seats(game, ps.trumper_seat).into_iter().collect();

    let mut trumper_points = 0u32;
    let mut opposing_points = 0u32;
    for (seat, cards) in ps.tricks_won.iter().enumerate() {
        let total: u32 = cards.iter().map(|c| points(c.rank)).sum();
        if trumper_team.contains(&seat) {
            trumper_points += total;
        } else {
            opposing_points += total;
        }
    }

    if game.mode == Mode::Three && ps.exchange_done && !game.center_pile.is_empty() {
        opposing_points += game.center_pile.iter().map(|c| points(c.rank)).sum::<u32>();
    }

    if let Some(trump_card) = ps.trump_card {
        if !ps.trump_revealed {
            trumper_points += points(trump_card.rank);
        }
    }

    (trumper_points, opposing_points)
}

/// A spoilt game: all 8 trump-suit cards ended up with the trumper's own
/// team, including the concealed trump card and any still sitting in
/// hand at the time the round ends.
pub fn check_spoilt_trump(game: &Game, ps: &PlayingState) -> bool {
    let trumper_team: HashSet<usize> = team_seats(game, ps.trumper_seat).into_iter().collect();
    let mut count = 0u32;

    for (seat, cards) in ps.tricks_won.iter().enumerate() {
        if trumper_team.contains(&seat) {
            count += cards.iter().filter(|c| c.suit == ps.trump_suit).count() as u32;
        }
    }
    if let Some(trump_card) = ps.trump_card {
        if !ps.trump_revealed && trump_card.suit == ps.trump_suit {
            count += 1;
        }
    }
    for seat in &trumper_team {
        if let Some(p) = game.player_at(*seat) {
            count += p.hand.iter().filter(|c| c.suit == ps.trump_suit).count() as u32;
        }
    }

    count == 8
}

/// Scores a completed round and folds the result into cumulative
/// scoring tokens. A spoilt game awards nothing to either side.
pub fn score_game(game: &mut Game) -> Result<ScoringState, DomainError> {
    let (trumper_seat, bid_amount, trump_suit, spoilt, trumper_team_points) = match &game.phase {
        GamePhase::Playing(ps) => {
            let spoilt = check_spoilt_trump(game, ps);
            let (trumper_points, _) = calculate_team_points(game, ps);
            (ps.trumper_seat, ps.bid_amount, ps.trump_suit, spoilt, trumper_points)
        }
        _ => {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "can only score a game that is playing",
            ))
        }
    };

    if !spoilt {
        let trumper_won = trumper_team_points >= bid_amount as u32;
        let (win_points, lose_points) = scoring_tokens(bid_amount);
        let trumper_team = team_seats(game, trumper_seat);
        let opposing_team = opposing_team_seats(game, trumper_seat);
        if trumper_won {
            for seat in trumper_team {
                game.scores[seat] += win_points;
            }
        } else {
            for seat in opposing_team {
                game.scores[seat] += lose_points;
            }
        }
    }

    game.games_played += 1;

    let scoring = ScoringState {
        trumper_seat,
        bid_amount,
        trump_suit,
        spoilt,
        trumper_team_points,
    };
    game.phase = GamePhase::Scoring(scoring.clone());
    Ok(scoring)
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::tests::*;
    use super::*;
    use crate::domain::test_gens;

    proptest! {
        /// Whatever `legal_cards` returns is always a non-empty subset of
        /// the seat's hand; if the hand holds the calling suit, every
        /// returned card is of that suit (invariant 6, follow-suit rule).
        #[test]
        fn legal_cards_is_a_nonempty_suit_respecting_subset(
            hand in test_gens::unique_hand(5),
            lead in test_gens::card(),
        ) {
            let mut g = playing_game(Mode::Four, 0, lead.suit);
            g.players[1].hand = hand.clone();
            let mut ps = match &g.phase {
                GamePhase::Playing(ps) => ps.clone(),
                _ => unreachable!(),
            };
            ps.current_trick.push(TrickCard { seat: 0, card: lead });

            let legal = legal_cards(&g, &ps, 1);

            prop_assert!(!legal.is_empty());
            prop_assert!(legal.iter().all(|c| hand.contains(c)));
            if hand.iter().any(|c| c.suit == lead.suit) {
                prop_assert!(legal.iter().all(|c| c.suit == lead.suit));
            } else {
                prop_assert_eq!(legal.len(), hand.len());
            }
        }
    }
}

//! Per-seat projection of a `Game` (C6 view projection).
//!
//! Mirrors the shape of a decision-point view: everything a seat is
//! allowed to see, plus the legal-card set when it is that seat's turn.
//! Unlike a database-backed projection, this is built directly off the
//! in-memory `Game` — no I/O, no caching concerns.

use super::cards::{Card, Suit};
use super::state::{Bid, Game, GamePhase, Mode, TrickCard};
use super::tricks::legal_cards;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPlayer {
    pub id: String,
    pub name: String,
    pub seat: usize,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub game_code: String,
    pub mode: Mode,
    pub phase_name: &'static str,
    pub players: Vec<PublicPlayer>,
    pub dealer_seat: usize,
    pub your_seat: usize,
    pub your_hand: Vec<Card>,
    pub bids: Vec<Bid>,
    pub current_bid: Option<Bid>,
    pub bid_turn_seat: Option<usize>,
    pub trumper_seat: Option<usize>,
    pub trump_revealed: bool,
    /// `None` when hidden: the phase carries no trump yet, or it is
    /// concealed and the viewer isn't the trumper.
    pub trump_suit: Option<Suit>,
    pub trump_card: Option<Card>,
    pub current_trick: Vec<TrickCard>,
    pub turn_seat: Option<usize>,
    pub trick_number: Option<u32>,
    pub scores: Vec<i32>,
    pub games_played: u32,
    pub team_tricks_points: TeamTricksPoints,
    /// Contents never exposed, only in modes 2 and 3.
    pub center_pile_count: Option<usize>,
    /// Populated iff it's `your_seat`'s turn in `PLAYING`.
    pub valid_cards: Option<Vec<Card>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TeamTricksPoints {
    pub trumper: u32,
    pub opposing: u32,
}

/// Builds the view of `game` visible to `seat`. Hides opponent hands and
/// the trump suit/card unless revealed or the viewer is the trumper
/// (invariant 8, "view safety").
pub fn get_player_view(game: &Game, seat: usize) -> PlayerView {
    let players = game
        .players
        .iter()
        .map(|p| PublicPlayer {
            id: p.id.clone(),
            name: p.name.clone(),
            seat: p.seat,
            connected: p.connected,
        })
        .collect();

    let your_hand = game.player_at(seat).map(|p| p.hand.clone()).unwrap_or_default();

    let mut view = PlayerView {
        game_code: game.game_code.clone(),
        mode: game.mode,
        phase_name: game.phase.name(),
        players,
        dealer_seat: game.dealer_seat,
        your_seat: seat,
        your_hand,
        bids: Vec::new(),
        current_bid: None,
        bid_turn_seat: None,
        trumper_seat: None,
        trump_revealed: false,
        trump_suit: None,
        trump_card: None,
        current_trick: Vec::new(),
        turn_seat: None,
        trick_number: None,
        scores: game.scores.clone(),
        games_played: game.games_played,
        team_tricks_points: TeamTricksPoints::default(),
        center_pile_count: None,
        valid_cards: None,
    };

    match &game.phase {
        GamePhase::Bidding(b) => {
            view.bids = b.bids.clone();
            view.current_bid = b.current_bid;
            view.bid_turn_seat = Some(b.bid_turn_seat);
        }
        GamePhase::TrumpSelection(ts) => {
            view.trumper_seat = Some(ts.trumper_seat);
        }
        GamePhase::CardExchange(ce) => {
            view.trumper_seat = Some(ce.trumper_seat);
            if seat == ce.trumper_seat {
                view.trump_suit = Some(ce.trump_suit);
                view.trump_card = Some(ce.trump_card);
            }
        }
        GamePhase::Playing(ps) => {
            view.trumper_seat = Some(ps.trumper_seat);
            view.trump_revealed = ps.trump_revealed;
            view.current_trick = ps.current_trick.clone();
            view.turn_seat = Some(ps.turn_seat);
            view.trick_number = Some(ps.trick_number);

            if ps.trump_revealed || seat == ps.trumper_seat {
                view.trump_suit = Some(ps.trump_suit);
                view.trump_card = ps.trump_card;
            }

            if ps.turn_seat == seat {
                view.valid_cards = Some(legal_cards(game, ps, seat));
            }

            let trumper_team_seats: Vec<usize> = match game.mode {
                Mode::Four => {
                    let partner = (ps.trumper_seat + 2) % 4;
                    let mut seats = vec![ps.trumper_seat, partner];
                    seats.sort_unstable();
                    seats
                }
                Mode::Two | Mode::Three => vec![ps.trumper_seat],
            };
            for (s, cards) in ps.tricks_won.iter().enumerate() {
                let total: u32 = cards.iter().map(|c| super::cards::points(c.rank)).sum();
                if trumper_team_seats.contains(&s) {
                    view.team_tricks_points.trumper += total;
                } else {
                    view.team_tricks_points.opposing += total;
                }
            }
        }
        GamePhase::Scoring(s) => {
            // The round is over; there is nothing left to hide.
            view.trumper_seat = Some(s.trumper_seat);
            view.trump_revealed = true;
            view.trump_suit = Some(s.trump_suit);
        }
        GamePhase::Waiting => {}
    }

    if matches!(game.mode, Mode::Two | Mode::Three) {
        view.center_pile_count = Some(game.center_pile.len());
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::Rank;
    use crate::domain::state::{Player, PlayingState};

    fn base_game(mode: Mode) -> Game {
        let seat_count = mode.seat_count();
        let players: Vec<Player> = (0..seat_count)
            .map(|seat| Player {
                id: format!("p{seat}"),
                name: format!("P{seat}"),
                seat,
                hand: vec![],
                connected: true,
            })
            .collect();
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
            phase: GamePhase::Waiting,
            version: 0,
        }
    }

    #[test]
    fn non_trumper_cannot_see_concealed_trump() {
        let mut g = base_game(Mode::Four);
        g.phase = GamePhase::Playing(PlayingState {
            trumper_seat: 0,
            bid_amount: 150,
            trump_suit: Suit::Hearts,
            trump_card: Some(Card { suit: Suit::Hearts, rank: Rank::Jack }),
            trump_revealed: false,
            current_trick: vec![],
            tricks_won: vec![Vec::new(); 4],
            turn_seat: 1,
            turn_deadline: None,
            trick_number: 1,
            lead_seat: 1,
            exchange_done: false,
        });
        let view = get_player_view(&g, 1);
        assert!(view.trump_suit.is_none());
        assert!(view.trump_card.is_none());
    }

    #[test]
    fn trumper_sees_own_concealed_trump() {
        let mut g = base_game(Mode::Four);
        g.phase = GamePhase::Playing(PlayingState {
            trumper_seat: 0,
            bid_amount: 150,
            trump_suit: Suit::Hearts,
            trump_card: Some(Card { suit: Suit::Hearts, rank: Rank::Jack }),
            trump_revealed: false,
            current_trick: vec![],
            tricks_won: vec![Vec::new(); 4],
            turn_seat: 1,
            turn_deadline: None,
            trick_number: 1,
            lead_seat: 1,
            exchange_done: false,
        });
        let view = get_player_view(&g, 0);
        assert_eq!(view.trump_suit, Some(Suit::Hearts));
    }

    #[test]
    fn valid_cards_only_present_on_your_turn() {
        let mut g = base_game(Mode::Four);
        g.players[1].hand = vec![Card { suit: Suit::Clubs, rank: Rank::Nine }];
        g.phase = GamePhase::Playing(PlayingState {
            trumper_seat: 0,
            bid_amount: 150,
            trump_suit: Suit::Hearts,
            trump_card: None,
            trump_revealed: true,
            current_trick: vec![],
            tricks_won: vec![Vec::new(); 4],
            turn_seat: 1,
            turn_deadline: None,
            trick_number: 1,
            lead_seat: 1,
            exchange_done: false,
        });
        let viewer = get_player_view(&g, 1);
        assert!(viewer.valid_cards.is_some());
        let onlooker = get_player_view(&g, 2);
        assert!(onlooker.valid_cards.is_none());
    }

    #[test]
    fn center_pile_count_hidden_in_mode_four() {
        let g = base_game(Mode::Four);
        let view = get_player_view(&g, 0);
        assert!(view.center_pile_count.is_none());
    }

    #[test]
    fn center_pile_count_visible_but_contents_hidden_in_mode_two() {
        let mut g = base_game(Mode::Two);
        g.center_pile = vec![Card { suit: Suit::Clubs, rank: Rank::Nine }];
        let view = get_player_view(&g, 0);
        assert_eq!(view.center_pile_count, Some(1));
    }
}

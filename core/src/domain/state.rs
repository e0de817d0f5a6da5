//! The `Game` entity and its phase machine.
//!
//! The phase machine is modeled as a tagged enum, one variant per phase,
//! each carrying only the fields that are meaningful in that phase. This
//! replaces an "optional field valid only in some phases" struct, which
//! is easy to leave in an inconsistent state by accident.
//!
//! `DEALING` is not a separately persisted variant: dealing is always
//! immediately followed by entering `BIDDING` within the same action
//! (`start_game` / `next_game`), so no reachable snapshot ever observes a
//! mid-deal game. `phase_rank` still reserves the gap so the documented
//! ordering `WAITING < DEALING < BIDDING < ...` is visible in one place.

use time::OffsetDateTime;

use super::cards::{Card, Suit};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mode {
    Two,
    Three,
    Four,
}

impl Mode {
    pub fn seat_count(self) -> usize {
        match self {
            Mode::Two => 2,
            Mode::Three => 3,
            Mode::Four => 4,
        }
    }

    pub fn from_seat_count(n: usize) -> Option<Self> {
        match n {
            2 => Some(Mode::Two),
            3 => Some(Mode::Three),
            4 => Some(Mode::Four),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub seat: usize,
    pub hand: Vec<Card>,
    pub connected: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Bid {
    pub seat: usize,
    /// `None` denotes a pass.
    pub amount: Option<u16>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrickCard {
    pub seat: usize,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiddingState {
    pub bids: Vec<Bid>,
    pub current_bid: Option<Bid>,
    pub bid_turn_seat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrumpSelectionState {
    pub trumper_seat: usize,
    pub bid_amount: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardExchangeState {
    pub trumper_seat: usize,
    pub bid_amount: u16,
    pub trump_suit: Suit,
    /// Held by the engine, not in the trumper's hand, until reveal.
    pub trump_card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayingState {
    pub trumper_seat: usize,
    pub bid_amount: u16,
    pub trump_suit: Suit,
    /// `Some` while concealed (held by the engine); `None` once revealed,
    /// at which point the card has been moved back into the trumper's
    /// hand exactly once (invariant 5).
    pub trump_card: Option<Card>,
    pub trump_revealed: bool,
    pub current_trick: Vec<TrickCard>,
    /// Cards each seat has taken, in the order tricks were won.
    pub tricks_won: Vec<Vec<Card>>,
    pub turn_seat: usize,
    pub turn_deadline: Option<OffsetDateTime>,
    pub trick_number: u32,
    pub lead_seat: usize,
    pub exchange_done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringState {
    pub trumper_seat: usize,
    pub bid_amount: u16,
    pub trump_suit: Suit,
    pub spoilt: bool,
    pub trumper_team_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    Waiting,
    Bidding(BiddingState),
    TrumpSelection(TrumpSelectionState),
    /// Mode 3 only.
    CardExchange(CardExchangeState),
    Playing(PlayingState),
    Scoring(ScoringState),
}

impl GamePhase {
    pub fn rank(&self) -> u8 {
        match self {
            GamePhase::Waiting => 0,
            GamePhase::Bidding(_) => 2,
            GamePhase::TrumpSelection(_) => 3,
            GamePhase::CardExchange(_) => 4,
            GamePhase::Playing(_) => 5,
            GamePhase::Scoring(_) => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Waiting => "WAITING",
            GamePhase::Bidding(_) => "BIDDING",
            GamePhase::TrumpSelection(_) => "TRUMP_SELECTION",
            GamePhase::CardExchange(_) => "CARD_EXCHANGE",
            GamePhase::Playing(_) => "PLAYING",
            GamePhase::Scoring(_) => "SCORING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub game_code: String,
    pub mode: Mode,
    pub dealer_seat: usize,
    pub players: Vec<Player>,
    /// Mode 2's draw pile, mode 3's pre/post-exchange center cards. Always
    /// empty in mode 4. Dealt once and carried across phases until the
    /// trick engine or the exchange consumes it.
    pub center_pile: Vec<Card>,
    /// Cumulative score tokens per seat, across games played at this table.
    pub scores: Vec<i32>,
    pub games_played: u32,
    pub created_at: OffsetDateTime,
    pub expires_at: Option<OffsetDateTime>,
    pub phase: GamePhase,
    /// Optimistic-concurrency version; bumped by every accepted mutation.
    pub version: u64,
}

impl Game {
    pub fn seat_count(&self) -> usize {
        self.mode.seat_count()
    }

    pub fn player_at(&self, seat: usize) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }

    pub fn player_at_mut(&mut self, seat: usize) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.seat == seat)
    }

    pub fn next_seat(&self, seat: usize) -> usize {
        (seat + 1) % self.seat_count()
    }

    /// Partner seat in mode 4 (two positions away); `None` otherwise.
    pub fn partner_seat(&self, seat: usize) -> Option<usize> {
        match self.mode {
            Mode::Four => Some((seat + 2) % 4),
            _ => None,
        }
    }

    /// All cards currently accounted for anywhere in the game, used to
    /// check invariants 1 and 2 after a transition.
    pub fn all_live_cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(32);
        for player in &self.players {
            cards.extend(player.hand.iter().copied());
        }
        cards.extend(self.center_pile.iter().copied());
        match &self.phase {
            GamePhase::CardExchange(s) => {
                cards.push(s.trump_card);
            }
            GamePhase::Playing(s) => {
                cards.extend(s.current_trick.iter().map(|tc| tc.card));
                for won in &s.tricks_won {
                    cards.extend(won.iter().copied());
                }
                if let Some(trump_card) = s.trump_card {
                    cards.push(trump_card);
                }
            }
            GamePhase::Waiting | GamePhase::Bidding(_) | GamePhase::TrumpSelection(_) => {}
            GamePhase::Scoring(_) => {
                // tricks_won/center_pile aren't retained past Playing; card
                // accounting only applies through the end of a round.
            }
        }
        cards
    }
}

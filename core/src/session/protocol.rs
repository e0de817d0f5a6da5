//! Wire shapes for the channel surface (§6). One tagged `ClientAction`
//! enum for everything inbound, one tagged `ServerEvent` enum for
//! everything outbound — mirrors the request/response split the REST
//! surface also uses, just folded into a single bidirectional channel.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};
use crate::domain::player_view::PlayerView;
use crate::domain::state::Mode;

/// One inbound message. `code` is omitted from `CreateGame` (the caller
/// doesn't have one yet) and from nothing else — every other action is
/// scoped to an existing game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientAction {
    CreateGame { mode: u8, player_name: String },
    JoinGame { code: String, player_name: String },
    StartGame { code: String },
    Bid { code: String, seat: usize, amount: Option<u16> },
    SelectTrump { code: String, seat: usize, suit: Suit, card: Card },
    ExchangeCards { code: String, seat: usize, cards: Vec<Card> },
    SkipExchange { code: String, seat: usize },
    PlayCard { code: String, seat: usize, card: Card, wants_to_cut: bool },
    AskTrump { code: String, seat: usize },
    RevealTrump { code: String, seat: usize },
    NextGame { code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidWire {
    pub seat: usize,
    pub amount: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickCardWire {
    pub seat: usize,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayerWire {
    pub id: String,
    pub name: String,
    pub seat: usize,
    pub connected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamTricksPointsWire {
    pub trumper: u32,
    pub opposing: u32,
}

/// The per-seat wire projection: same fields as [`PlayerView`], shaped
/// so every field round-trips through JSON without touching the domain
/// view struct itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerViewWire {
    pub game_code: String,
    pub mode: u8,
    pub phase: String,
    pub players: Vec<PublicPlayerWire>,
    pub dealer_seat: usize,
    pub your_seat: usize,
    pub your_hand: Vec<Card>,
    pub bids: Vec<BidWire>,
    pub current_bid: Option<BidWire>,
    pub bid_turn_seat: Option<usize>,
    pub trumper_seat: Option<usize>,
    pub trump_revealed: bool,
    pub trump_suit: Option<Suit>,
    pub trump_card: Option<Card>,
    pub current_trick: Vec<TrickCardWire>,
    pub turn_seat: Option<usize>,
    pub trick_number: Option<u32>,
    pub scores: Vec<i32>,
    pub games_played: u32,
    pub team_tricks_points: TeamTricksPointsWire,
    pub center_pile_count: Option<usize>,
    pub valid_cards: Option<Vec<Card>>,
}

impl From<&PlayerView> for PlayerViewWire {
    fn from(v: &PlayerView) -> Self {
        PlayerViewWire {
            game_code: v.game_code.clone(),
            mode: mode_seats(v.mode),
            phase: v.phase_name.to_string(),
            players: v
                .players
                .iter()
                .map(|p| PublicPlayerWire {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    seat: p.seat,
                    connected: p.connected,
                })
                .collect(),
            dealer_seat: v.dealer_seat,
            your_seat: v.your_seat,
            your_hand: v.your_hand.clone(),
            bids: v.bids.iter().map(|b| BidWire { seat: b.seat, amount: b.amount }).collect(),
            current_bid: v.current_bid.map(|b| BidWire { seat: b.seat, amount: b.amount }),
            bid_turn_seat: v.bid_turn_seat,
            trumper_seat: v.trumper_seat,
            trump_revealed: v.trump_revealed,
            trump_suit: v.trump_suit,
            trump_card: v.trump_card,
            current_trick: v
                .current_trick
                .iter()
                .map(|tc| TrickCardWire { seat: tc.seat, card: tc.card })
                .collect(),
            turn_seat: v.turn_seat,
            trick_number: v.trick_number,
            scores: v.scores.clone(),
            games_played: v.games_played,
            team_tricks_points: TeamTricksPointsWire {
                trumper: v.team_tricks_points.trumper,
                opposing: v.team_tricks_points.opposing,
            },
            center_pile_count: v.center_pile_count,
            valid_cards: v.valid_cards.clone(),
        }
    }
}

fn mode_seats(mode: Mode) -> u8 {
    mode.seat_count() as u8
}

/// One outbound message. `GameState` is always sent personalized, one
/// per recipient; everything else is the same payload fanned out to
/// every seat at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    GameCreated { game_code: String, player_id: String, seat: usize, mode: u8 },
    PlayerJoined { game_code: String, player_id: String, seat: usize },
    GameStarted { game_code: String },
    GameState { view: PlayerViewWire },
    BidPlaced { seat: usize, amount: Option<u16> },
    BiddingConcluded { trumper_seat: usize, bid_amount: u16 },
    TrumpSelected { seat: usize, suit: Suit },
    EnteredCardExchange,
    CardsExchanged { seat: usize },
    ExchangeSkipped { seat: usize },
    TrumpRevealed { by_seat: usize },
    CardPlayed { seat: usize, card: Card, is_cut: bool },
    TrickResolved { winner_seat: usize, trick_points: u32 },
    DrawsAfterTrick { draws: Vec<TrickCardWire> },
    GameScored { spoilt: bool, trumper_team_points: u32 },
    TurnBecame { seat: usize },
    TurnTimeout { seat: usize, trick_number: u32 },
    NextGameStarted { game_code: String },
}

impl From<crate::domain::orchestrator::GameEvent> for ServerEvent {
    fn from(e: crate::domain::orchestrator::GameEvent) -> Self {
        use crate::domain::orchestrator::GameEvent as GE;
        match e {
            GE::BidPlaced { seat, amount } => ServerEvent::BidPlaced { seat, amount },
            GE::BiddingConcluded { trumper_seat, bid_amount } => {
                ServerEvent::BiddingConcluded { trumper_seat, bid_amount }
            }
            GE::TrumpSelected { seat, suit } => ServerEvent::TrumpSelected { seat, suit },
            GE::EnteredCardExchange => ServerEvent::EnteredCardExchange,
            GE::CardsExchanged { seat } => ServerEvent::CardsExchanged { seat },
            GE::ExchangeSkipped { seat } => ServerEvent::ExchangeSkipped { seat },
            GE::TrumpRevealed { by_seat } => ServerEvent::TrumpRevealed { by_seat },
            GE::CardPlayed { seat, card, is_cut } => ServerEvent::CardPlayed { seat, card, is_cut },
            GE::TrickResolved { winner_seat, trick_points } => {
                ServerEvent::TrickResolved { winner_seat, trick_points }
            }
            GE::DrawsAfterTrick { draws } => ServerEvent::DrawsAfterTrick {
                draws: draws.into_iter().map(|(seat, card)| TrickCardWire { seat, card }).collect(),
            },
            GE::GameScored { spoilt, trumper_team_points } => {
                ServerEvent::GameScored { spoilt, trumper_team_points }
            }
            GE::TurnBecame { seat } => ServerEvent::TurnBecame { seat },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_action_tag_is_snake_case() {
        let json = serde_json::to_string(&ClientAction::PlayCard {
            code: "ABC123".into(),
            seat: 1,
            card: Card { suit: Suit::Hearts, rank: crate::domain::cards::Rank::Jack },
            wants_to_cut: true,
        })
        .unwrap();
        assert!(json.contains("\"action\":\"play_card\""));
        assert!(json.contains("\"card\":\"J_hearts\""));
    }

    #[test]
    fn server_event_tag_is_snake_case() {
        let json = serde_json::to_string(&ServerEvent::TurnBecame { seat: 2 }).unwrap();
        assert_eq!(json, "{\"event\":\"turn_became\",\"seat\":2}");
    }
}

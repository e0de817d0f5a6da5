//! Snapshot codec (C7): a bidirectional mapping between the live `Game`
//! and a flat, store-friendly record — scalars, lists of card ids, and a
//! handful of sub-records, with seats as string map keys on the wire
//! (§4.7). `deserialize(serialize(g)) == g` structurally for every
//! reachable `g` (invariant 7).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::cards::{Card, Suit};
use super::state::{
    Bid, BiddingState, CardExchangeState, Game, GamePhase, Mode, Player, PlayingState,
    ScoringState, TrickCard, TrumpSelectionState,
};
use crate::errors::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub seat: usize,
    pub hand: Vec<String>,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub seat: usize,
    pub amount: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickCardRecord {
    pub seat: usize,
    pub card: String,
}

/// The flat, store-ready mirror of a [`Game`]. Every field is a scalar,
/// a list of scalars, or one of the small sub-records above — nothing
/// here requires the reader to understand the phase tagged-union to
/// deserialize it; [`deserialize`] is what reconstructs the union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub game_code: String,
    pub mode: u8,
    pub phase: String,
    pub dealer_seat: usize,
    pub players: Vec<PlayerRecord>,
    pub center_pile: Vec<String>,
    pub scores: BTreeMap<String, i32>,
    pub games_played: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
    pub version: u64,

    pub bids: Vec<BidRecord>,
    pub current_bid: Option<BidRecord>,
    pub bid_turn_seat: Option<usize>,

    pub trumper_seat: Option<usize>,
    pub bid_amount: Option<u16>,
    pub trump_suit: Option<String>,
    pub trump_card: Option<String>,
    pub trump_revealed: Option<bool>,
    pub exchange_done: Option<bool>,

    pub current_trick: Vec<TrickCardRecord>,
    pub tricks_won: BTreeMap<String, Vec<String>>,
    pub turn_seat: Option<usize>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub turn_deadline: Option<OffsetDateTime>,
    pub trick_number: Option<u32>,
    pub lead_seat: Option<usize>,

    pub spoilt: Option<bool>,
    pub trumper_team_points: Option<u32>,
}

fn suit_token(suit: Suit) -> &'static str {
    match suit {
        Suit::Clubs => "clubs",
        Suit::Diamonds => "diamonds",
        Suit::Hearts => "hearts",
        Suit::Spades => "spades",
    }
}

fn suit_from_token(tok: &str) -> Result<Suit, DomainError> {
    match tok {
        "clubs" => Ok(Suit::Clubs),
        "diamonds" => Ok(Suit::Diamonds),
        "hearts" => Ok(Suit::Hearts),
        "spades" => Ok(Suit::Spades),
        other => Err(DomainError::validation(
            ValidationKind::InvalidSuit,
            format!("invalid stored suit: {other}"),
        )),
    }
}

fn parse_card(tok: &str) -> Result<Card, DomainError> {
    tok.parse()
}

fn cards_to_strings(cards: &[Card]) -> Vec<String> {
    cards.iter().map(|c| c.to_string()).collect()
}

fn strings_to_cards(toks: &[String]) -> Result<Vec<Card>, DomainError> {
    toks.iter().map(|t| parse_card(t)).collect()
}

/// Serializes `game` into its flat persistence form.
pub fn serialize(game: &Game) -> SnapshotRecord {
    let players = game
        .players
        .iter()
        .map(|p: &Player| PlayerRecord {
            id: p.id.clone(),
            name: p.name.clone(),
            seat: p.seat,
            hand: cards_to_strings(&p.hand),
            connected: p.connected,
        })
        .collect();

    let scores = game
        .scores
        .iter()
        .enumerate()
        .map(|(seat, amount)| (seat.to_string(), *amount))
        .collect();

    let mut record = SnapshotRecord {
        game_code: game.game_code.clone(),
        mode: game.seat_count() as u8,
        phase: game.phase.name().to_string(),
        dealer_seat: game.dealer_seat,
        players,
        center_pile: cards_to_strings(&game.center_pile),
        scores,
        games_played: game.games_played,
        created_at: game.created_at,
        expires_at: game.expires_at,
        version: game.version,
        bids: Vec::new(),
        current_bid: None,
        bid_turn_seat: None,
        trumper_seat: None,
        bid_amount: None,
        trump_suit: None,
        trump_card: None,
        trump_revealed: None,
        exchange_done: None,
        current_trick: Vec::new(),
        tricks_won: BTreeMap::new(),
        turn_seat: None,
        turn_deadline: None,
        trick_number: None,
        lead_seat: None,
        spoilt: None,
        trumper_team_points: None,
    };

    match &game.phase {
        GamePhase::Waiting => {}
        GamePhase::Bidding(b) => {
            record.bids = b
                .bids
                .iter()
                .map(|bid| BidRecord { seat: bid.seat, amount: bid.amount })
                .collect();
            record.current_bid = b
                .current_bid
                .map(|bid| BidRecord { seat: bid.seat, amount: bid.amount });
            record.bid_turn_seat = Some(b.bid_turn_seat);
        }
        GamePhase::TrumpSelection(ts) => {
            record.trumper_seat = Some(ts.trumper_seat);
            record.bid_amount = Some(ts.bid_amount);
        }
        GamePhase::CardExchange(ce) => {
            record.trumper_seat = Some(ce.trumper_seat);
            record.bid_amount = Some(ce.bid_amount);
            record.trump_suit = Some(suit_token(ce.trump_suit).to_string());
            record.trump_card = Some(ce.trump_card.to_string());
        }
        GamePhase::Playing(ps) => {
            record.trumper_seat = Some(ps.trumper_seat);
            record.bid_amount = Some(ps.bid_amount);
            record.trump_suit = Some(suit_token(ps.trump_suit).to_string());
            record.trump_card = ps.trump_card.map(|c| c.to_string());
            record.trump_revealed = Some(ps.trump_revealed);
            record.exchange_done = Some(ps.exchange_done);
            record.current_trick = ps
                .current_trick
                .iter()
                .map(|tc: &TrickCard| TrickCardRecord { seat: tc.seat, card: tc.card.to_string() })
                .collect();
            record.tricks_won = ps
                .tricks_won
                .iter()
                .enumerate()
                .map(|(seat, cards)| (seat.to_string(), cards_to_strings(cards)))
                .collect();
            record.turn_seat = Some(ps.turn_seat);
            record.turn_deadline = ps.turn_deadline;
            record.trick_number = Some(ps.trick_number);
            record.lead_seat = Some(ps.lead_seat);
        }
        GamePhase::Scoring(s) => {
            record.trumper_seat = Some(s.trumper_seat);
            record.bid_amount = Some(s.bid_amount);
            record.trump_suit = Some(suit_token(s.trump_suit).to_string());
            record.spoilt = Some(s.spoilt);
            record.trumper_team_points = Some(s.trumper_team_points);
        }
    }

    record
}

fn missing(field: &str) -> DomainError {
    DomainError::validation(ValidationKind::MissingField, format!("snapshot missing field: {field}"))
}

fn seat_map_to_cards(map: &BTreeMap<String, Vec<String>>, seat_count: usize) -> Result<Vec<Vec<Card>>, DomainError> {
    let mut out = vec![Vec::new(); seat_count];
    for (seat_str, cards) in map {
        let seat: usize = seat_str
            .parse()
            .map_err(|_| DomainError::validation(ValidationKind::MissingField, "non-integer seat key"))?;
        if seat >= seat_count {
            return Err(DomainError::validation(
                ValidationKind::MissingField,
                format!("seat {seat} out of range"),
            ));
        }
        out[seat] = strings_to_cards(cards)?;
    }
    Ok(out)
}

/// Reconstructs a [`Game`] from its flat persistence form, round-trip
/// exact with [`serialize`].
pub fn deserialize(record: &SnapshotRecord) -> Result<Game, DomainError> {
    let mode = Mode::from_seat_count(record.mode as usize)
        .ok_or_else(|| DomainError::validation(ValidationKind::InvalidMode, "invalid stored mode"))?;
    let seat_count = mode.seat_count();

    let mut scores = vec![0i32; seat_count];
    for (seat_str, amount) in &record.scores {
        let seat: usize = seat_str
            .parse()
            .map_err(|_| DomainError::validation(ValidationKind::MissingField, "non-integer score key"))?;
        if seat >= seat_count {
            return Err(DomainError::validation(
                ValidationKind::MissingField,
                format!("score seat {seat} out of range"),
            ));
        }
        scores[seat] = *amount;
    }

    let players = record
        .players
        .iter()
        .map(|p| -> Result<Player, DomainError> {
            Ok(Player {
                id: p.id.clone(),
                name: p.name.clone(),
                seat: p.seat,
                hand: strings_to_cards(&p.hand)?,
                connected: p.connected,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let center_pile = strings_to_cards(&record.center_pile)?;

    let phase = match record.phase.as_str() {
        "WAITING" => GamePhase::Waiting,
        "BIDDING" => GamePhase::Bidding(BiddingState {
            bids: record
                .bids
                .iter()
                .map(|b| Bid { seat: b.seat, amount: b.amount })
                .collect(),
            current_bid: record.current_bid.as_ref().map(|b| Bid { seat: b.seat, amount: b.amount }),
            bid_turn_seat: record.bid_turn_seat.ok_or_else(|| missing("bid_turn_seat"))?,
        }),
        "TRUMP_SELECTION" => GamePhase::TrumpSelection(TrumpSelectionState {
            trumper_seat: record.trumper_seat.ok_or_else(|| missing("trumper_seat"))?,
            bid_amount: record.bid_amount.ok_or_else(|| missing("bid_amount"))?,
        }),
        "CARD_EXCHANGE" => GamePhase::CardExchange(CardExchangeState {
            trumper_seat: record.trumper_seat.ok_or_else(|| missing("trumper_seat"))?,
            bid_amount: record.bid_amount.ok_or_else(|| missing("bid_amount"))?,
            trump_suit: suit_from_token(record.trump_suit.as_deref().ok_or_else(|| missing("trump_suit"))?)?,
            trump_card: parse_card(record.trump_card.as_deref().ok_or_else(|| missing("trump_card"))?)?,
        }),
        "PLAYING" => GamePhase::Playing(PlayingState {
            trumper_seat: record.trumper_seat.ok_or_else(|| missing("trumper_seat"))?,
            bid_amount: record.bid_amount.ok_or_else(|| missing("bid_amount"))?,
            trump_suit: suit_from_token(record.trump_suit.as_deref().ok_or_else(|| missing("trump_suit"))?)?,
            trump_card: record.trump_card.as_deref().map(parse_card).transpose()?,
            trump_revealed: record.trump_revealed.ok_or_else(|| missing("trump_revealed"))?,
            current_trick: record
                .current_trick
                .iter()
                .map(|tc| -> Result<TrickCard, DomainError> {
                    Ok(TrickCard { seat: tc.seat, card: parse_card(&tc.card)? })
                })
                .collect::<Result<Vec<_>, _>>()?,
            tricks_won: seat_map_to_cards(&record.tricks_won, seat_count)?,
            turn_seat: record.turn_seat.ok_or_else(|| missing("turn_seat"))?,
            turn_deadline: record.turn_deadline,
            trick_number: record.trick_number.ok_or_else(|| missing("trick_number"))?,
            lead_seat: record.lead_seat.ok_or_else(|| missing("lead_seat"))?,
            exchange_done: record.exchange_done.ok_or_else(|| missing("exchange_done"))?,
        }),
        "SCORING" => GamePhase::Scoring(ScoringState {
            trumper_seat: record.trumper_seat.ok_or_else(|| missing("trumper_seat"))?,
            bid_amount: record.bid_amount.ok_or_else(|| missing("bid_amount"))?,
            trump_suit: suit_from_token(record.trump_suit.as_deref().ok_or_else(|| missing("trump_suit"))?)?,
            spoilt: record.spoilt.ok_or_else(|| missing("spoilt"))?,
            trumper_team_points: record.trumper_team_points.ok_or_else(|| missing("trumper_team_points"))?,
        }),
        other => {
            return Err(DomainError::validation(
                ValidationKind::Other("UnknownPhase".into()),
                format!("unknown stored phase: {other}"),
            ))
        }
    };

    Ok(Game {
        game_code: record.game_code.clone(),
        mode,
        dealer_seat: record.dealer_seat,
        players,
        center_pile,
        scores,
        games_played: record.games_played,
        created_at: record.created_at,
        expires_at: record.expires_at,
        phase,
        version: record.version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::Rank;

    fn sample_players(seat_count: usize) -> Vec<Player> {
        (0..seat_count)
            .map(|seat| Player {
                id: format!("p{seat}"),
                name: format!("P{seat}"),
                seat,
                hand: vec![Card { suit: Suit::Hearts, rank: Rank::Seven }],
                connected: seat % 2 == 0,
            })
            .collect()
    }

    pub(super) fn base_game(mode: Mode, phase: GamePhase) -> Game {
        let seat_count = mode.seat_count();
        Game {
            game_code: "ABC123".into(),
            mode,
            dealer_seat: 1,
            players: sample_players(seat_count),
            center_pile: vec![Card { suit: Suit::Clubs, rank: Rank::Nine }],
            scores: (0..seat_count).map(|s| s as i32 * 5).collect(),
            games_played: 3,
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            expires_at: Some(OffsetDateTime::from_unix_timestamp(1_700_086_400).unwrap()),
            phase,
            version: 7,
        }
    }

    #[test]
    fn round_trips_waiting_phase() {
        let game = base_game(Mode::Four, GamePhase::Waiting);
        let record = serialize(&game);
        assert_eq!(deserialize(&record).unwrap(), game);
    }

    #[test]
    fn round_trips_bidding_phase() {
        let game = base_game(
            Mode::Four,
            GamePhase::Bidding(BiddingState {
                bids: vec![Bid { seat: 1, amount: Some(150) }, Bid { seat: 2, amount: None }],
                current_bid: Some(Bid { seat: 1, amount: Some(150) }),
                bid_turn_seat: 3,
            }),
        );
        let record = serialize(&game);
        assert_eq!(deserialize(&record).unwrap(), game);
    }

    #[test]
    fn round_trips_playing_phase_with_concealed_trump() {
        let seat_count = 4;
        let mut game = base_game(
            Mode::Four,
            GamePhase::Playing(PlayingState {
                trumper_seat: 1,
                bid_amount: 200,
                trump_suit: Suit::Spades,
                trump_card: Some(Card { suit: Suit::Spades, rank: Rank::Jack }),
                trump_revealed: false,
                current_trick: vec![TrickCard { seat: 1, card: Card { suit: Suit::Diamonds, rank: Rank::King } }],
                tricks_won: vec![
                    vec![Card { suit: Suit::Hearts, rank: Rank::Ace }],
                    vec![],
                    vec![Card { suit: Suit::Clubs, rank: Rank::Queen }],
                    vec![],
                ],
                turn_seat: 2,
                turn_deadline: Some(OffsetDateTime::from_unix_timestamp(1_700_000_100).unwrap()),
                trick_number: 3,
                lead_seat: 1,
                exchange_done: false,
            }),
        );
        game.mode = Mode::from_seat_count(seat_count).unwrap();
        let record = serialize(&game);
        assert_eq!(deserialize(&record).unwrap(), game);
    }

    #[test]
    fn round_trips_scoring_phase() {
        let game = base_game(
            Mode::Three,
            GamePhase::Scoring(ScoringState {
                trumper_seat: 0,
                bid_amount: 304,
                trump_suit: Suit::Hearts,
                spoilt: true,
                trumper_team_points: 0,
            }),
        );
        let record = serialize(&game);
        assert_eq!(deserialize(&record).unwrap(), game);
    }

    #[test]
    fn card_ids_use_the_documented_wire_format() {
        let game = base_game(Mode::Four, GamePhase::Waiting);
        let record = serialize(&game);
        assert_eq!(record.players[0].hand, vec!["7_hearts".to_string()]);
        assert_eq!(record.center_pile, vec!["9_clubs".to_string()]);
    }

    #[test]
    fn json_round_trip_through_serde() {
        let game = base_game(Mode::Four, GamePhase::Waiting);
        let record = serialize(&game);
        let json = serde_json::to_string(&record).unwrap();
        let back: SnapshotRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(deserialize(&back).unwrap(), game);
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::tests::base_game;
    use super::*;
    use crate::domain::test_gens;

    proptest! {
        /// `serialize`/`deserialize` is the identity on any hand dealt
        /// into a waiting game, for every card-id round through the wire
        /// format (invariant 7).
        #[test]
        fn waiting_phase_round_trips_for_any_dealt_hand(
            hand in test_gens::unique_hand(4),
        ) {
            let mut game = base_game(Mode::Four, GamePhase::Waiting);
            game.players[0].hand = hand;
            let record = serialize(&game);
            prop_assert_eq!(deserialize(&record).unwrap(), game);
        }

        /// The concealed trump card survives a round trip exactly,
        /// whether or not it has been revealed back into the trumper's
        /// hand (invariant 5 persisted correctly, invariant 7 overall).
        #[test]
        fn playing_phase_round_trips_with_and_without_concealed_trump(
            trump_card in test_gens::card(),
            trump_revealed in any::<bool>(),
        ) {
            let game = base_game(
                Mode::Four,
                GamePhase::Playing(PlayingState {
                    trumper_seat: 1,
                    bid_amount: 200,
                    trump_suit: trump_card.suit,
                    trump_card: if trump_revealed { None } else { Some(trump_card) },
                    trump_revealed,
                    current_trick: vec![],
                    tricks_won: vec![Vec::new(); 4],
                    turn_seat: 2,
                    turn_deadline: None,
                    trick_number: 1,
                    lead_seat: 1,
                    exchange_done: false,
                }),
            );
            let record = serialize(&game);
            prop_assert_eq!(deserialize(&record).unwrap(), game);
        }
    }
}

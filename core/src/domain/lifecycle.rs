//! Game entity lifecycle: creation, joining, starting, and the
//! `next_game` rotation back into a fresh deal. Pure logic only — no
//! store access, no wire concerns. The session dispatcher (C8) is the
//! one thing that calls these and persists the result.

use std::collections::HashSet;

use time::{Duration, OffsetDateTime};

use super::bidding::start_bidding;
use super::deck::deal;
use super::rng::EngineRng;
use super::state::{Game, GamePhase, Mode, Player};
use crate::errors::{DomainError, ValidationKind};

const GAME_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const GAME_CODE_LEN: usize = 6;
/// Turn-timeout window, measured from the moment a `PLAYING` turn
/// becomes another seat's (§5, "Cancellation / timeouts").
pub const TURN_TIMEOUT: Duration = Duration::seconds(30);

/// Generates a random 6-char A-Z/0-9 game code. Uniqueness against
/// already-active games is the store's job (§8.8's create-with-retry
/// loop lives in the session dispatcher, not here).
pub fn generate_game_code(rng: &EngineRng) -> String {
    (0..GAME_CODE_LEN)
        .map(|_| *rng.choose(GAME_CODE_ALPHABET).expect("alphabet is non-empty") as char)
        .collect()
}

/// Creates a new game in `WAITING` with the creator seated at seat 0.
pub fn create_game(
    mode_seats: usize,
    game_code: String,
    creator_id: impl Into<String>,
    creator_name: impl Into<String>,
) -> Result<Game, DomainError> {
    let mode = Mode::from_seat_count(mode_seats).ok_or_else(|| {
        DomainError::validation(ValidationKind::InvalidMode, "mode must be 2, 3, or 4")
    })?;
    let creator = Player {
        id: creator_id.into(),
        name: creator_name.into(),
        seat: 0,
        hand: Vec::new(),
        connected: true,
    };
    Ok(Game {
        game_code,
        mode,
        dealer_seat: 0,
        players: vec![creator],
        center_pile: Vec::new(),
        scores: vec![0; mode.seat_count()],
        games_played: 0,
        created_at: OffsetDateTime::now_utc(),
        expires_at: None,
        phase: GamePhase::Waiting,
        version: 0,
    })
}

/// Seats a new player at the lowest free seat. Only legal while
/// `WAITING` and while seats remain.
pub fn join_game(
    game: &mut Game,
    player_id: impl Into<String>,
    name: impl Into<String>,
) -> Result<usize, DomainError> {
    if !matches!(game.phase, GamePhase::Waiting) {
        return Err(DomainError::validation(
            ValidationKind::GameNotWaiting,
            "game has already started",
        ));
    }
    let seat_count = game.seat_count();
    let taken: HashSet<usize> = game.players.iter().map(|p| p.seat).collect();
    let seat = (0..seat_count)
        .find(|s| !taken.contains(s))
        .ok_or_else(|| DomainError::validation(ValidationKind::GameFull, "game is full"))?;
    game.players.push(Player {
        id: player_id.into(),
        name: name.into(),
        seat,
        hand: Vec::new(),
        connected: true,
    });
    game.players.sort_by_key(|p| p.seat);
    Ok(seat)
}

fn deal_and_start_bidding(game: &mut Game, rng: &EngineRng) {
    let d = deal(game.seat_count(), game.dealer_seat, rng);
    for (seat, hand) in d.hands.into_iter().enumerate() {
        if let Some(p) = game.player_at_mut(seat) {
            p.hand = hand;
        }
    }
    game.center_pile = d.center_pile;
    game.phase = GamePhase::Bidding(start_bidding(game.dealer_seat, game.seat_count()));
}

/// Starts the game: needs a full table, picks a random dealer, deals,
/// and opens bidding.
pub fn start_game(game: &mut Game, rng: &EngineRng) -> Result<(), DomainError> {
    if !matches!(game.phase, GamePhase::Waiting) {
        return Err(DomainError::validation(
            ValidationKind::GameNotWaiting,
            "game has already started",
        ));
    }
    let seat_count = game.seat_count();
    if game.players.len() != seat_count {
        return Err(DomainError::validation(
            ValidationKind::IncompleteSeats,
            format!("need {seat_count} seated players to start"),
        ));
    }
    let seats: Vec<usize> = (0..seat_count).collect();
    game.dealer_seat = *rng.choose(&seats).expect("seats is non-empty");
    deal_and_start_bidding(game, rng);
    Ok(())
}

/// Rotates the dealer clockwise, clears all per-round state, and
/// re-deals into a fresh bidding phase. Only legal from `SCORING`.
pub fn next_game(game: &mut Game, rng: &EngineRng) -> Result<(), DomainError> {
    if !matches!(game.phase, GamePhase::Scoring(_)) {
        return Err(DomainError::validation(
            ValidationKind::WrongPhase,
            "can only start the next game from the scoring phase",
        ));
    }
    game.dealer_seat = game.next_seat(game.dealer_seat);
    for player in &mut game.players {
        player.hand.clear();
    }
    game.center_pile.clear();
    deal_and_start_bidding(game, rng);
    Ok(())
}

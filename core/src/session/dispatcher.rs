//! The session dispatcher (C8): the one place that turns a validated
//! action into a read-modify-write against the games store, a fan-out of
//! what happened, and — when a `PLAYING` turn is left pending — a
//! scheduled turn-timeout callback.
//!
//! Every public method here is `GameFlowService::run_mutation`'s shape
//! ported away from a SQL transaction: load the snapshot, check its
//! version, run the pure mutation, write it back under that same
//! version, then fan out. Unlike that transaction-scoped original, our
//! "before/after" comparison is free — the engine already tells us what
//! happened via its event list, so there's nothing to diff.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::capabilities::{schedule_name, Broadcaster, ConnectionsStore, GamesStore, TimerPayload, TurnTimerScheduler};
use super::protocol::{ClientAction, PlayerViewWire, ServerEvent};
use crate::domain::lifecycle::{self, generate_game_code};
use crate::domain::orchestrator::{self, PlayerAction};
use crate::domain::player_view::get_player_view;
use crate::domain::rng::EngineRng;
use crate::domain::state::{Game, GamePhase};
use crate::error::AppError;
use crate::errors::DomainError;

const GAME_CODE_ALLOCATION_ATTEMPTS: usize = 10;

pub struct GameDispatcher {
    games: Arc<dyn GamesStore>,
    connections: Arc<dyn ConnectionsStore>,
    broadcaster: Arc<dyn Broadcaster>,
    timers: Arc<dyn TurnTimerScheduler>,
    rng: EngineRng,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGameResult {
    pub game_code: String,
    pub player_id: String,
    pub seat: usize,
    pub mode: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGameResult {
    pub game_code: String,
    pub player_id: String,
    pub seat: usize,
    pub mode: u8,
}

impl GameDispatcher {
    pub fn new(
        games: Arc<dyn GamesStore>,
        connections: Arc<dyn ConnectionsStore>,
        broadcaster: Arc<dyn Broadcaster>,
        timers: Arc<dyn TurnTimerScheduler>,
    ) -> Self {
        Self {
            games,
            connections,
            broadcaster,
            timers,
            rng: EngineRng::from_entropy(),
        }
    }

    /// Builds a dispatcher around a fixed rng, for deterministic tests.
    pub fn with_rng(
        games: Arc<dyn GamesStore>,
        connections: Arc<dyn ConnectionsStore>,
        broadcaster: Arc<dyn Broadcaster>,
        timers: Arc<dyn TurnTimerScheduler>,
        rng: EngineRng,
    ) -> Self {
        Self { games, connections, broadcaster, timers, rng }
    }

    /// Routes one parsed inbound message to the matching handler. The
    /// REST-only actions (`create_game`, `join_game`, `start_game`)
    /// are just as reachable over the channel as the in-round actions —
    /// the dispatch table (§4.8) doesn't distinguish transports.
    pub async fn handle_client_action(&self, action: ClientAction) -> Result<(), AppError> {
        match action {
            ClientAction::CreateGame { mode, player_name } => {
                self.create_game(mode as usize, &player_name).await?;
            }
            ClientAction::JoinGame { code, player_name } => {
                self.join_game(&code, &player_name).await?;
            }
            ClientAction::StartGame { code } => self.start_game(&code).await?,
            ClientAction::Bid { code, seat, amount } => {
                self.dispatch_action(&code, PlayerAction::Bid { seat, amount }).await?
            }
            ClientAction::SelectTrump { code, seat, suit, card } => {
                self.dispatch_action(&code, PlayerAction::SelectTrump { seat, suit, card }).await?
            }
            ClientAction::ExchangeCards { code, seat, cards } => {
                self.dispatch_action(&code, PlayerAction::ExchangeCards { seat, cards }).await?
            }
            ClientAction::SkipExchange { code, seat } => {
                self.dispatch_action(&code, PlayerAction::SkipExchange { seat }).await?
            }
            ClientAction::PlayCard { code, seat, card, wants_to_cut } => {
                self.dispatch_action(&code, PlayerAction::PlayCard { seat, card, wants_to_cut }).await?
            }
            ClientAction::AskTrump { code, seat } => {
                self.dispatch_action(&code, PlayerAction::AskTrump { seat }).await?
            }
            ClientAction::RevealTrump { code, seat } => {
                self.dispatch_action(&code, PlayerAction::RevealTrump { seat }).await?
            }
            ClientAction::NextGame { code } => self.next_game(&code).await?,
        }
        Ok(())
    }

    /// Creates a new game, retrying with a fresh code on collision —
    /// mirrors the reference REST handler's save-and-retry loop against
    /// its store's conditional-write failure.
    pub async fn create_game(&self, mode_seats: usize, creator_name: &str) -> Result<CreateGameResult, AppError> {
        let creator_id = Uuid::new_v4().to_string();
        for attempt in 0..GAME_CODE_ALLOCATION_ATTEMPTS {
            let code = generate_game_code(&self.rng);
            let game = lifecycle::create_game(mode_seats, code.clone(), creator_id.clone(), creator_name.to_string())?;
            match self.games.create(&game).await {
                Ok(()) => {
                    info!(game_code = %code, mode_seats, "game created");
                    self.fan_out(
                        &game,
                        vec![ServerEvent::GameCreated {
                            game_code: code.clone(),
                            player_id: creator_id.clone(),
                            seat: 0,
                            mode: mode_seats as u8,
                        }],
                    )
                    .await?;
                    return Ok(CreateGameResult {
                        game_code: code,
                        player_id: creator_id,
                        seat: 0,
                        mode: mode_seats as u8,
                    });
                }
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "game code collision, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal("failed to allocate a unique game code"))
    }

    pub async fn join_game(&self, code: &str, player_name: &str) -> Result<JoinGameResult, AppError> {
        let player_id = Uuid::new_v4().to_string();
        let seat = self
            .run_mutation(code, |game| {
                let seat = lifecycle::join_game(game, player_id.clone(), player_name.to_string())?;
                Ok((
                    seat,
                    vec![ServerEvent::PlayerJoined {
                        game_code: game.game_code.clone(),
                        player_id: player_id.clone(),
                        seat,
                    }],
                ))
            })
            .await?;
        Ok(JoinGameResult {
            game_code: code.to_string(),
            player_id,
            seat,
            mode: 0, // filled in by the caller from the broadcasted game_state if needed
        })
    }

    pub async fn start_game(&self, code: &str) -> Result<(), AppError> {
        let rng = &self.rng;
        self.run_mutation(code, |game| {
            lifecycle::start_game(game, rng)?;
            Ok(((), vec![ServerEvent::GameStarted { game_code: game.game_code.clone() }]))
        })
        .await
    }

    pub async fn dispatch_action(&self, code: &str, action: PlayerAction) -> Result<(), AppError> {
        self.run_mutation(code, |game| {
            let events = orchestrator::apply_action(game, action.clone())?;
            Ok(((), events.into_iter().map(ServerEvent::from).collect()))
        })
        .await
    }

    pub async fn next_game(&self, code: &str) -> Result<(), AppError> {
        let rng = &self.rng;
        self.run_mutation(code, |game| {
            lifecycle::next_game(game, rng)?;
            Ok(((), vec![ServerEvent::NextGameStarted { game_code: game.game_code.clone() }]))
        })
        .await
    }

    /// Loads the snapshot, runs `mutate` over it, writes it back under
    /// the version it was loaded at, then fans out events and the
    /// per-seat `game_state`. On any error the write never happens.
    async fn run_mutation<T, F>(&self, code: &str, mutate: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Game) -> Result<(T, Vec<ServerEvent>), DomainError>,
    {
        let mut game = self.games.load(code).await?;
        let expected_version = game.version;
        let (value, events) = mutate(&mut game).map_err(AppError::from)?;
        game.version += 1;
        self.games.save(&game, expected_version).await?;
        self.fan_out(&game, events).await?;
        self.schedule_pending_turn_timer(&game).await?;
        Ok(value)
    }

    async fn fan_out(&self, game: &Game, events: Vec<ServerEvent>) -> Result<(), AppError> {
        let connections = self.connections.connections_for_game(&game.game_code).await?;

        for event in &events {
            let payload = serde_json::to_string(event).map_err(|e| AppError::internal(e.to_string()))?;
            for conn in &connections {
                if let Err(e) = self.broadcaster.send(&conn.connection_id, &payload).await {
                    warn!(connection_id = %conn.connection_id, error = %e, "event send failed, dropping");
                }
            }
        }

        for conn in &connections {
            let view = get_player_view(game, conn.seat);
            let wire = ServerEvent::GameState { view: PlayerViewWire::from(&view) };
            let payload = serde_json::to_string(&wire).map_err(|e| AppError::internal(e.to_string()))?;
            if let Err(e) = self.broadcaster.send(&conn.connection_id, &payload).await {
                warn!(connection_id = %conn.connection_id, error = %e, "game_state send failed, dropping");
            }
        }
        Ok(())
    }

    async fn schedule_pending_turn_timer(&self, game: &Game) -> Result<(), AppError> {
        if let GamePhase::Playing(ps) = &game.phase {
            if let Some(deadline) = ps.turn_deadline {
                let name = schedule_name(&game.game_code, ps.trick_number, ps.turn_seat);
                self.timers
                    .create_schedule(
                        &name,
                        deadline,
                        TimerPayload {
                            game_code: game.game_code.clone(),
                            seat: ps.turn_seat,
                            trick_number: ps.trick_number,
                        },
                    )
                    .await?;
            }
        }
        Ok(())
    }
}

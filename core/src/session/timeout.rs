//! Turn-timeout handler (C9), ported from the reference implementation's
//! timer Lambda: reload, check the timer is still live, auto-play, save,
//! broadcast. A stale timer — the turn already moved on by the time it
//! fires — is silently a no-op (§4.9, §7 "stale timer: not surfaced").

use std::sync::Arc;

use tracing::info;

use super::capabilities::{schedule_name, Broadcaster, ConnectionsStore, GamesStore, TimerPayload, TurnTimerScheduler};
use super::protocol::{PlayerViewWire, ServerEvent};
use crate::domain::player_view::get_player_view;
use crate::domain::rng::EngineRng;
use crate::domain::state::{Game, GamePhase};
use crate::domain::tricks::auto_play;
use crate::error::AppError;

pub struct TimeoutHandler {
    games: Arc<dyn GamesStore>,
    connections: Arc<dyn ConnectionsStore>,
    broadcaster: Arc<dyn Broadcaster>,
    timers: Arc<dyn TurnTimerScheduler>,
    rng: EngineRng,
}

impl TimeoutHandler {
    pub fn new(
        games: Arc<dyn GamesStore>,
        connections: Arc<dyn ConnectionsStore>,
        broadcaster: Arc<dyn Broadcaster>,
        timers: Arc<dyn TurnTimerScheduler>,
    ) -> Self {
        Self { games, connections, broadcaster, timers, rng: EngineRng::from_entropy() }
    }

    pub fn with_rng(
        games: Arc<dyn GamesStore>,
        connections: Arc<dyn ConnectionsStore>,
        broadcaster: Arc<dyn Broadcaster>,
        timers: Arc<dyn TurnTimerScheduler>,
        rng: EngineRng,
    ) -> Self {
        Self { games, connections, broadcaster, timers, rng }
    }

    /// Handles one fired `(game_code, seat, trick_number)` timer.
    /// Returns `true` if an auto-play actually happened, `false` if the
    /// timer was stale and ignored.
    pub async fn handle(&self, payload: TimerPayload) -> Result<bool, AppError> {
        let name = schedule_name(&payload.game_code, payload.trick_number, payload.seat);
        self.timers.delete_schedule(&name).await?;

        let mut game = self.games.load(&payload.game_code).await?;
        let expected_version = game.version;

        let ps = match &game.phase {
            GamePhase::Playing(ps) => ps,
            _ => {
                info!(game_code = %payload.game_code, "timeout fired outside playing phase, ignoring");
                return Ok(false);
            }
        };
        if ps.turn_seat != payload.seat || ps.trick_number != payload.trick_number {
            info!(
                game_code = %payload.game_code,
                expected_seat = payload.seat,
                actual_seat = ps.turn_seat,
                "stale turn timer, ignoring"
            );
            return Ok(false);
        }

        let result = auto_play(&mut game, payload.seat, &self.rng)?;
        game.version += 1;
        self.games.save(&game, expected_version).await?;

        let mut events = vec![ServerEvent::TurnTimeout { seat: payload.seat, trick_number: payload.trick_number }];
        if let Some(resolution) = result.trick {
            events.push(ServerEvent::TrickResolved {
                winner_seat: resolution.winner_seat,
                trick_points: resolution.trick_points,
            });
            if let Some(scoring) = resolution.scoring {
                events.push(ServerEvent::GameScored {
                    spoilt: scoring.spoilt,
                    trumper_team_points: scoring.trumper_team_points,
                });
            }
        }
        self.fan_out(&game, events).await?;
        self.schedule_pending_turn_timer(&game).await?;
        Ok(true)
    }

    async fn fan_out(&self, game: &Game, events: Vec<ServerEvent>) -> Result<(), AppError> {
        let connections = self.connections.connections_for_game(&game.game_code).await?;
        for event in &events {
            let payload = serde_json::to_string(event).map_err(|e| AppError::internal(e.to_string()))?;
            for conn in &connections {
                let _ = self.broadcaster.send(&conn.connection_id, &payload).await;
            }
        }
        for conn in &connections {
            let view = get_player_view(game, conn.seat);
            let wire = ServerEvent::GameState { view: PlayerViewWire::from(&view) };
            let payload = serde_json::to_string(&wire).map_err(|e| AppError::internal(e.to_string()))?;
            let _ = self.broadcaster.send(&conn.connection_id, &payload).await;
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

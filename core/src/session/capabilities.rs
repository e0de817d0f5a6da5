//! External capability traits (§6). Every one of these is transport- and
//! storage-agnostic: the dispatcher (C8) only ever calls through these
//! traits, never a concrete database or queue client, so swapping a
//! DynamoDB-backed implementation for an in-memory one used in tests
//! changes nothing about how a game is played.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::state::Game;
use crate::error::AppError;

/// Primary-key `game_code` store for the serialized game record, with an
/// optimistic version check on write (§5, "single-writer-per-game
/// discipline").
#[async_trait]
pub trait GamesStore: Send + Sync {
    /// Loads the current game, or `NotFound` if `game_code` is unknown.
    async fn load(&self, game_code: &str) -> Result<Game, AppError>;

    /// Inserts a brand-new game, failing with a `Conflict` if the code is
    /// already taken. Callers retry with a freshly generated code (§4.8,
    /// `create_game`).
    async fn create(&self, game: &Game) -> Result<(), AppError>;

    /// Writes `game` back, conditioned on the store's current version
    /// still matching `expected_version`. Implementations map a failed
    /// condition to `AppError::Conflict` with `ErrorCode::OptimisticLock`.
    async fn save(&self, game: &Game, expected_version: u64) -> Result<(), AppError>;
}

/// One row of the connections index: which live connection belongs to
/// which seat at which table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub connection_id: String,
    pub game_code: String,
    pub player_id: String,
    pub seat: usize,
}

/// Primary-key `connection_id` store, secondary-indexed by `game_code`
/// for fan-out (§6, "Persistence layout").
#[async_trait]
pub trait ConnectionsStore: Send + Sync {
    async fn upsert(&self, record: ConnectionRecord) -> Result<(), AppError>;

    /// Clears the row for a dropped connection. The owning game is left
    /// untouched — reconnection under the same `player_id` is allowed.
    async fn remove(&self, connection_id: &str) -> Result<(), AppError>;

    async fn connections_for_game(&self, game_code: &str) -> Result<Vec<ConnectionRecord>, AppError>;
}

/// The bidirectional channel transport. Sends are at-most-once per
/// connection and never block the engine (§9): a dropped connection is
/// the adapter's problem to clean up via [`ConnectionsStore::remove`],
/// not the dispatcher's.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn send(&self, connection_id: &str, payload: &str) -> Result<(), AppError>;
}

/// Payload handed back to the timeout handler (C9) when a schedule fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerPayload {
    pub game_code: String,
    pub seat: usize,
    pub trick_number: u32,
}

/// `create_schedule` / `delete_schedule` turn-timer adapter (§6). The
/// dispatcher names every schedule `turn-<code>-<trick_number>-<seat>`
/// so re-scheduling the same triple is naturally idempotent — creating
/// under the same name just replaces the prior fire time.
#[async_trait]
pub trait TurnTimerScheduler: Send + Sync {
    async fn create_schedule(
        &self,
        name: &str,
        fire_at: OffsetDateTime,
        payload: TimerPayload,
    ) -> Result<(), AppError>;

    async fn delete_schedule(&self, name: &str) -> Result<(), AppError>;
}

/// Builds the schedule name the turn-timer adapter is keyed by.
pub fn schedule_name(game_code: &str, trick_number: u32, seat: usize) -> String {
    format!("turn-{game_code}-{trick_number}-{seat}")
}

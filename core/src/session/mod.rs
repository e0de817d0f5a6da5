//! Session layer (C8-C9): the glue between the pure domain engine and
//! the outside world. Nothing in `domain` knows a connection or a timer
//! exists; everything here does, strictly through the capability traits
//! so the engine itself stays testable without any real store or
//! transport.

pub mod capabilities;
pub mod dispatcher;
pub mod protocol;
pub mod timeout;

pub use capabilities::{
    schedule_name, Broadcaster, ConnectionRecord, ConnectionsStore, GamesStore, TimerPayload,
    TurnTimerScheduler,
};
pub use dispatcher::{CreateGameResult, GameDispatcher, JoinGameResult};
pub use protocol::{ClientAction, PlayerViewWire, ServerEvent};
pub use timeout::TimeoutHandler;

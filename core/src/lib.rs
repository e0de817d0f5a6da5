//! trump304-core: the pure game engine and session glue for a real-time,
//! multi-seat trick-taking card game server.
//!
//! `domain` (C1-C7) is allocation-only and I/O-free: every transition is a
//! synchronous function over a `Game` value. `session` (C8-C9) is the
//! thin async layer that turns those transitions into a read-modify-write
//! against an external store, a fan-out over a channel transport, and a
//! scheduled turn-timeout callback — all three expressed as capability
//! traits so this crate never depends on a concrete database, queue, or
//! socket implementation.

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod session;
pub mod telemetry;

pub use config::AdapterConfig;
pub use domain::{Card, Game, GamePhase, Mode, Player, Rank, Suit};
pub use error::AppError;
pub use session::{ClientAction, GameDispatcher, ServerEvent, TimeoutHandler};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}

//! Adapter configuration.
//!
//! The engine itself never reads the environment; everything here backs
//! the opaque strings the external adapters (games store, connections
//! store, channel transport, turn-timer) are handed at construction time.
//! Values are read once and passed down explicitly rather than queried
//! ad hoc, so a dispatcher can swap in test values without touching env
//! state at all.

use std::env;

use crate::error::AppError;

/// The five adapter-facing configuration values this core is built
/// around. None of these are interpreted by the engine; they are
/// opaque strings forwarded to whichever adapter implements the
/// corresponding capability trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub games_table: String,
    pub connections_table: String,
    pub channel_endpoint: String,
    pub timer_target: String,
    pub timer_role: String,
}

impl AdapterConfig {
    /// Loads configuration from the environment, failing fast if any key
    /// is missing.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            games_table: must_var("GAMES_TABLE")?,
            connections_table: must_var("CONNECTIONS_TABLE")?,
            channel_endpoint: must_var("CHANNEL_ENDPOINT")?,
            timer_target: must_var("TIMER_TARGET")?,
            timer_role: must_var("TIMER_ROLE")?,
        })
    }
}

fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| {
        AppError::config(format!(
            "required environment variable '{name}' is not set"
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use serial_test::serial;

    fn set_all() {
        env::set_var("GAMES_TABLE", "games");
        env::set_var("CONNECTIONS_TABLE", "connections");
        env::set_var("CHANNEL_ENDPOINT", "wss://example.test/ws");
        env::set_var("TIMER_TARGET", "arn:aws:lambda:timeout");
        env::set_var("TIMER_ROLE", "arn:aws:iam:timer-role");
    }

    fn clear_all() {
        for key in [
            "GAMES_TABLE",
            "CONNECTIONS_TABLE",
            "CHANNEL_ENDPOINT",
            "TIMER_TARGET",
            "TIMER_ROLE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn loads_all_five_keys() {
        clear_all();
        set_all();
        let cfg = AdapterConfig::from_env().unwrap();
        assert_eq!(cfg.games_table, "games");
        assert_eq!(cfg.timer_role, "arn:aws:iam:timer-role");
        clear_all();
    }

    #[test]
    #[serial]
    fn missing_key_fails_fast() {
        clear_all();
        set_all();
        env::remove_var("TIMER_TARGET");
        let err = AdapterConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("TIMER_TARGET"));
        clear_all();
    }
}

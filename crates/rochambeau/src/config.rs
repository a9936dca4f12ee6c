//! Server configuration.

use rochambeau_room::RoomConfig;
use serde::{Deserialize, Serialize};

/// Environment variable holding the listen address.
pub const ENV_BIND: &str = "ROCHAMBEAU_BIND";
/// Environment variable holding the room cap.
pub const ENV_MAX_ROOMS: &str = "ROCHAMBEAU_MAX_ROOMS";
/// Environment variable holding the rounds per match.
pub const ENV_ROUNDS: &str = "ROCHAMBEAU_ROUNDS";

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8765";

/// A configuration value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

/// Everything needed to start a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// Settings handed to the room registry.
    pub room: RoomConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            room: RoomConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Builds a config from the process environment, falling back to the
    /// defaults for anything unset.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a numeric variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup` instead of the process environment.
    pub fn from_vars(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_BIND) {
            config.bind_addr = addr;
        }
        if let Some(value) = lookup(ENV_MAX_ROOMS) {
            config.room.max_rooms = parse_var(ENV_MAX_ROOMS, value)?;
        }
        if let Some(value) = lookup(ENV_ROUNDS) {
            config.room.rounds = parse_var(ENV_ROUNDS, value)?;
        }
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError { var, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_from_vars_empty_uses_defaults() {
        let config = ServerConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr, "127.0.0.1:8765");
        assert_eq!(config.room.rounds, 3);
        assert_eq!(config.room.max_rooms, 50);
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = ServerConfig::from_vars(vars(&[
            (ENV_BIND, "0.0.0.0:9000"),
            (ENV_MAX_ROOMS, "4"),
            (ENV_ROUNDS, " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.room.max_rooms, 4);
        assert_eq!(config.room.rounds, 5);
        assert_eq!(config.room.command_buffer, 64);
    }

    #[test]
    fn test_from_vars_zero_values_accepted() {
        let config = ServerConfig::from_vars(vars(&[
            (ENV_MAX_ROOMS, "0"),
            (ENV_ROUNDS, "0"),
        ]))
        .unwrap();
        assert_eq!(config.room.max_rooms, 0);
        assert_eq!(config.room.rounds, 0);
    }

    #[test]
    fn test_from_vars_malformed_number() {
        let err =
            ServerConfig::from_vars(vars(&[(ENV_ROUNDS, "three")])).unwrap_err();
        assert_eq!(err.var, ENV_ROUNDS);
        assert_eq!(err.value, "three");
        assert!(err.to_string().contains("ROCHAMBEAU_ROUNDS"));
    }

    #[test]
    fn test_from_vars_negative_cap_rejected() {
        let err =
            ServerConfig::from_vars(vars(&[(ENV_MAX_ROOMS, "-1")])).unwrap_err();
        assert_eq!(err.var, ENV_MAX_ROOMS);
    }
}

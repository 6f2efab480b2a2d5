//! WebSocket server configuration

use palaver_core::config::{get_env_or_default, AppConfigTrait, ConfigError};
use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for the WebSocket transport binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Maximum inbound message size in bytes, `None` for unlimited
    pub max_message_size: Option<usize>,
    /// Reply to ping frames automatically
    pub auto_pong: bool,
    /// Ping interval in seconds, `None` to disable keepalive pings
    pub ping_interval: Option<u64>,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_message_size: Some(16 * 1024 * 1024), // 16MB
            auto_pong: true,
            ping_interval: Some(30),
        }
    }
}

impl AppConfigTrait for WsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = get_env_or_default("PALAVER_HOST", "127.0.0.1");

        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "port".to_string(),
                value: env::var("PORT").unwrap_or_default(),
                expected: "valid port number".to_string(),
            })?;

        let max_message_size = get_env_or_default("PALAVER_MAX_MESSAGE_SIZE", "16777216")
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "max_message_size".to_string(),
                value: env::var("PALAVER_MAX_MESSAGE_SIZE").unwrap_or_default(),
                expected: "valid number of bytes".to_string(),
            })?;

        let auto_pong = get_env_or_default("PALAVER_AUTO_PONG", "true")
            .parse::<bool>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "auto_pong".to_string(),
                value: env::var("PALAVER_AUTO_PONG").unwrap_or_default(),
                expected: "true or false".to_string(),
            })?;

        // 0 disables keepalive pings
        let ping_interval = get_env_or_default("PALAVER_PING_INTERVAL", "30")
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "ping_interval".to_string(),
                value: env::var("PALAVER_PING_INTERVAL").unwrap_or_default(),
                expected: "valid number of seconds".to_string(),
            })?;

        let config = WsConfig {
            host,
            port,
            max_message_size: (max_message_size > 0).then_some(max_message_size),
            auto_pong,
            ping_interval: (ping_interval > 0).then_some(ping_interval),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::MissingValue {
                field: "host".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_port() {
        let config = WsConfig::default();
        assert_eq!(config.port, 3000);
        assert!(config.auto_pong);
    }

    #[test]
    fn empty_host_fails_validation() {
        let config = WsConfig {
            host: String::new(),
            ..WsConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

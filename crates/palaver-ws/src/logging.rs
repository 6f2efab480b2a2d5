//! Structured logging setup
//!
//! Tracing-based logging for embedding hosts. Library code only emits
//! `tracing` events; hosts call [`init_logging`] once at startup.

use palaver_core::CoreError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "warn")
    pub level: String,
    /// Emit JSON structured logs instead of plain text
    pub json_format: bool,
    /// Environment filter overriding `level` (e.g. "palaver=debug,tokio=info")
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Production configuration: JSON output, info level
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            env_filter: Some("palaver=info".to_string()),
        }
    }

    /// Development configuration: plain text, debug level
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            env_filter: Some("palaver=debug".to_string()),
        }
    }
}

/// Install the global tracing subscriber
///
/// Fails if a subscriber is already installed for this process.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CoreError> {
    let directives = config.env_filter.as_deref().unwrap_or(&config.level);
    let filter = EnvFilter::try_new(directives)
        .map_err(|e| CoreError::configuration(format!("invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_format {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    result.map_err(|e| CoreError::configuration(format!("failed to install subscriber: {e}")))
}

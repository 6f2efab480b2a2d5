//! # palaver-core
//!
//! Core foundation for the palaver WebSocket messaging framework:
//! configuration loading and the base error types shared by the other
//! palaver crates.

pub mod config;
pub mod errors;

pub use config::{AppConfigTrait, ConfigError, Environment};
pub use errors::CoreError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Framework information
pub const FRAMEWORK_NAME: &str = "palaver";

/// Get framework version
pub fn version() -> &'static str {
    VERSION
}

/// Get framework name
pub fn name() -> &'static str {
    FRAMEWORK_NAME
}

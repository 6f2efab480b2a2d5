//! # palaver-ws
//!
//! WebSocket protocol core for the palaver messaging framework:
//! - a frame classifier turning raw payloads into header blocks or opaque
//!   binary
//! - a binary response envelope for outbound messages
//! - an ordered, predicate-gated endpoint dispatcher with first-match-wins
//!   message routing and fan-out connect/close events
//! - named rooms with publish/subscribe broadcast and membership lifecycle
//! - built-in account and room endpoints, plus a tokio-tungstenite transport
//!   binding to drive it all

// Core modules
pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod endpoints;
pub mod logging;
pub mod protocol;
pub mod rooms;
pub mod server;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_support;

// Main API
pub use config::WsConfig;
pub use dispatch::{DispatcherBuilder, DispatcherService};
pub use endpoint::Endpoint;
pub use server::WsServer;

// Re-export protocol types
pub use protocol::{classify, Body, Frame, HeaderBlock, Response};

// Re-export session and room types
pub use rooms::{Room, RoomRegistry, DEFAULT_ROOM};
pub use session::Session;
pub use types::{CloseFrame, SessionId, WsError, WsMessage, WsResult};

// Re-export built-in endpoints
pub use endpoints::{AccountsEndpoint, RoomsEndpoint, ACCOUNTS_VERSION, ROOMS_VERSION};

// Re-export logging setup
pub use logging::{init_logging, LoggingConfig};

//! The application-level message protocol
//!
//! Clients exchange HTTP-like header blocks inside WebSocket frames. This
//! module holds the header block model, the classifier that decides whether
//! a raw payload is such a block or opaque binary, and the binary response
//! envelope sent back to clients.

pub mod classify;
pub mod header;
pub mod response;

pub use classify::{classify, Frame};
pub use header::HeaderBlock;
pub use response::{Body, Response};

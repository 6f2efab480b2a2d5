//! Named broadcast groups built on the session model
//!
//! Rooms track members by session id only; the live-session map owned by the
//! dispatcher resolves ids to sessions at delivery time, so membership never
//! keeps a closed session alive.

pub mod registry;
pub mod room;

pub use registry::{RoomRegistry, DEFAULT_ROOM};
pub use room::Room;

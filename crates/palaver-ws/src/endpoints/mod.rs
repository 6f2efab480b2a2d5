//! Built-in protocol endpoints

pub mod accounts;
pub mod rooms;

pub use accounts::{AccountsEndpoint, ACCOUNTS_VERSION};
pub use rooms::{RoomsEndpoint, ROOMS_VERSION};

use crate::protocol::Response;
use crate::session::Session;
use crate::types::WsResult;

/// Validate the request line's trailing version segment
///
/// `HTTP/1.0` and `Version/1.0` both carry their version after the final
/// slash. A mismatch produces a 400 naming the expected version and returns
/// `false`; the caller treats the message as handled either way.
pub(crate) fn check_version(
    session: &Session,
    version: Option<&str>,
    expected: &str,
) -> WsResult<bool> {
    let supplied = version.and_then(|token| token.split('/').next_back());
    if supplied == Some(expected) {
        return Ok(true);
    }
    session.send_response(
        &Response::new(400, format!("Invalid Version.\nUse {expected}"))
            .set("Content-Type", "application/text"),
    )?;
    Ok(false)
}

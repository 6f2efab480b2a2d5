//! The endpoint capability interface
//!
//! Feature modules (accounts, rooms) implement this trait and register with
//! the dispatcher once at startup. Every callback has a default, so an
//! endpoint only implements the events it cares about.

use crate::protocol::Frame;
use crate::session::Session;
use crate::types::WsResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A registered handler bundle governing eligibility and reactions to
/// connect/message/close events
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Eligibility predicate consulted before every callback
    fn check(&self, _session: &Session) -> bool {
        true
    }

    /// React to a classified message
    ///
    /// Returning `Ok(true)` marks the message handled and stops dispatch;
    /// `Ok(false)` passes it to the next endpoint in registration order.
    async fn on_message(&self, _session: &Arc<Session>, _frame: &Frame) -> WsResult<bool> {
        Ok(false)
    }

    /// Observe a newly accepted connection
    async fn on_connected(&self, _session: &Arc<Session>) {}

    /// Observe a closing connection
    async fn on_closed(&self, _session: &Arc<Session>) {}
}

//! Per-connection session state

use crate::protocol::Response;
use crate::types::{SessionId, WsError, WsMessage, WsResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Map from session id to live session, owned by the dispatcher and shared
/// with the room registry for broadcast delivery
pub type SessionMap = RwLock<HashMap<SessionId, Arc<Session>>>;

/// State attached to one live connection
///
/// The transport layer owns the session's lifetime; endpoint handlers only
/// ever see an `Arc` reference. Outbound messages go through an unbounded
/// queue drained by the connection's pump task.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    authenticated: AtomicBool,
    metadata: RwLock<HashMap<String, serde_json::Value>>,
    outbound: mpsc::UnboundedSender<WsMessage>,
}

impl Session {
    pub fn new(outbound: mpsc::UnboundedSender<WsMessage>) -> Self {
        Self {
            id: SessionId::new(),
            authenticated: AtomicBool::new(false),
            metadata: RwLock::new(HashMap::new()),
            outbound,
        }
    }

    /// Create a session together with the receiving end of its outbound
    /// queue, for hosts (and tests) that drive delivery themselves
    pub fn pair() -> (Arc<Self>, mpsc::UnboundedReceiver<WsMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self::new(sender)), receiver)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn set_authenticated(&self, value: bool) {
        self.authenticated.store(value, Ordering::SeqCst);
    }

    /// Store a metadata value under the given key
    pub async fn set_metadata(&self, key: impl Into<String>, value: serde_json::Value) {
        let mut metadata = self.metadata.write().await;
        metadata.insert(key.into(), value);
    }

    /// Copy of the metadata value stored under the given key
    pub async fn metadata(&self, key: &str) -> Option<serde_json::Value> {
        let metadata = self.metadata.read().await;
        metadata.get(key).cloned()
    }

    /// Queue a message for delivery to this connection
    pub fn send(&self, message: WsMessage) -> WsResult<()> {
        self.outbound
            .send(message)
            .map_err(|_| WsError::ConnectionClosed)
    }

    /// Serialize a response envelope and queue it as a binary message
    pub fn send_response(&self, response: &Response) -> WsResult<()> {
        self.send(WsMessage::Binary(response.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_are_queued_as_binary() {
        let (session, mut receiver) = Session::pair();

        session
            .send_response(&Response::new(200, "ok"))
            .unwrap();

        let message = receiver.recv().await.unwrap();
        assert!(message.is_binary());
    }

    #[tokio::test]
    async fn authentication_flag_defaults_off() {
        let (session, _receiver) = Session::pair();
        assert!(!session.is_authenticated());

        session.set_authenticated(true);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn metadata_round_trips() {
        let (session, _receiver) = Session::pair();
        session
            .set_metadata("user", serde_json::json!({"username": "frosty"}))
            .await;

        let value = session.metadata("user").await.unwrap();
        assert_eq!(value["username"], "frosty");
        assert!(session.metadata("missing").await.is_none());
    }

    #[tokio::test]
    async fn send_fails_once_receiver_is_dropped() {
        let (session, receiver) = Session::pair();
        drop(receiver);

        assert!(session.send(WsMessage::text("hi")).is_err());
    }
}

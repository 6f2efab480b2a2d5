//! Endpoint registry and event dispatch
//!
//! The dispatcher owns the ordered endpoint list, the live-session map, and
//! the room registry. Endpoints are registered once through the builder;
//! after `build()` the list is immutable, so message dispatch reads it
//! without locking.

use crate::endpoint::Endpoint;
use crate::protocol::{classify, Response};
use crate::rooms::RoomRegistry;
use crate::session::{Session, SessionMap};
use crate::types::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Builder collecting endpoints before the transport starts accepting
pub struct DispatcherBuilder {
    endpoints: Vec<Arc<dyn Endpoint>>,
    sessions: Arc<SessionMap>,
    rooms: Arc<RoomRegistry>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        let sessions: Arc<SessionMap> = Arc::new(RwLock::new(HashMap::new()));
        let rooms = Arc::new(RoomRegistry::new(sessions.clone()));
        Self {
            endpoints: Vec::new(),
            sessions,
            rooms,
        }
    }

    /// Room registry shared with the dispatcher under construction, for
    /// endpoints that need it
    pub fn rooms(&self) -> Arc<RoomRegistry> {
        self.rooms.clone()
    }

    /// Register an endpoint; registration order is dispatch order
    pub fn endpoint(mut self, endpoint: impl Endpoint + 'static) -> Self {
        self.endpoints.push(Arc::new(endpoint));
        self
    }

    pub fn build(self) -> DispatcherService {
        info!(endpoints = self.endpoints.len(), "registered endpoints");
        DispatcherService {
            endpoints: self.endpoints,
            sessions: self.sessions,
            rooms: self.rooms,
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes connect/message/close events to the ordered set of eligible
/// endpoints
pub struct DispatcherService {
    endpoints: Vec<Arc<dyn Endpoint>>,
    sessions: Arc<SessionMap>,
    rooms: Arc<RoomRegistry>,
}

impl DispatcherService {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn rooms(&self) -> &Arc<RoomRegistry> {
        &self.rooms
    }

    pub async fn session(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Fan a new connection out to every eligible endpoint, in registration
    /// order, then track the session
    pub async fn client_connected(&self, session: Arc<Session>) {
        for endpoint in &self.endpoints {
            if endpoint.check(&session) {
                endpoint.on_connected(&session).await;
            }
        }
        self.sessions
            .write()
            .await
            .insert(session.id(), session.clone());
        info!(session = %session.id(), "client connected");
    }

    /// Classify the payload once, then offer it to eligible endpoints in
    /// registration order until one claims it
    ///
    /// An unclaimed message is dropped without a reply. A failing endpoint
    /// ends dispatch with a generic server error to the sender.
    pub async fn client_message(&self, session: &Arc<Session>, payload: Vec<u8>) {
        let frame = classify(payload);
        for endpoint in &self.endpoints {
            if !endpoint.check(session) {
                continue;
            }
            match endpoint.on_message(session, &frame).await {
                Ok(true) => return,
                Ok(false) => {}
                Err(error) => {
                    warn!(session = %session.id(), %error, "endpoint failed while handling message");
                    let _ = session.send_response(&Response::new(500, "Internal Server Error."));
                    return;
                }
            }
        }
        debug!(session = %session.id(), "message not claimed by any endpoint");
    }

    /// Fan the close out to every eligible endpoint, remove the session from
    /// any room it belongs to, and stop tracking it
    pub async fn client_closed(&self, session: &Arc<Session>) {
        for endpoint in &self.endpoints {
            if endpoint.check(session) {
                endpoint.on_closed(session).await;
            }
        }
        self.rooms.leave_all(session.id()).await;
        self.sessions.write().await.remove(&session.id());
        info!(session = %session.id(), "client closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Frame;
    use crate::types::WsResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Endpoint that records every callback it observes
    struct Recorder {
        name: &'static str,
        eligible: bool,
        handles: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn new(
            name: &'static str,
            eligible: bool,
            handles: bool,
            log: &Arc<Mutex<Vec<String>>>,
        ) -> Self {
            Self {
                name,
                eligible,
                handles,
                log: log.clone(),
            }
        }

        fn record(&self, event: &str) {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, event));
        }
    }

    #[async_trait]
    impl Endpoint for Recorder {
        fn check(&self, _session: &Session) -> bool {
            self.eligible
        }

        async fn on_message(&self, _session: &Arc<Session>, _frame: &Frame) -> WsResult<bool> {
            self.record("message");
            Ok(self.handles)
        }

        async fn on_connected(&self, _session: &Arc<Session>) {
            self.record("connected");
        }

        async fn on_closed(&self, _session: &Arc<Session>) {
            self.record("closed");
        }
    }

    struct Failing;

    #[async_trait]
    impl Endpoint for Failing {
        async fn on_message(&self, _session: &Arc<Session>, _frame: &Frame) -> WsResult<bool> {
            Err(crate::types::WsError::Connection("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn first_claim_stops_message_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = DispatcherService::builder()
            .endpoint(Recorder::new("e1", true, false, &log))
            .endpoint(Recorder::new("e2", true, true, &log))
            .endpoint(Recorder::new("e3", true, true, &log))
            .build();
        let (session, _rx) = Session::pair();

        dispatcher.client_message(&session, b"hello".to_vec()).await;

        assert_eq!(*log.lock().unwrap(), vec!["e1:message", "e2:message"]);
    }

    #[tokio::test]
    async fn connect_fans_out_to_all_eligible_endpoints_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = DispatcherService::builder()
            .endpoint(Recorder::new("e1", true, true, &log))
            .endpoint(Recorder::new("e2", false, true, &log))
            .endpoint(Recorder::new("e3", true, true, &log))
            .build();
        let (session, _rx) = Session::pair();

        dispatcher.client_connected(session.clone()).await;

        assert_eq!(*log.lock().unwrap(), vec!["e1:connected", "e3:connected"]);
        assert_eq!(dispatcher.session_count().await, 1);
        assert!(dispatcher.session(session.id()).await.is_some());
    }

    #[tokio::test]
    async fn ineligible_endpoints_never_see_messages() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = DispatcherService::builder()
            .endpoint(Recorder::new("e1", false, true, &log))
            .endpoint(Recorder::new("e2", true, true, &log))
            .build();
        let (session, _rx) = Session::pair();

        dispatcher.client_message(&session, b"hello".to_vec()).await;

        assert_eq!(*log.lock().unwrap(), vec!["e2:message"]);
    }

    #[tokio::test]
    async fn unclaimed_messages_are_dropped_silently() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = DispatcherService::builder()
            .endpoint(Recorder::new("e1", true, false, &log))
            .build();
        let (session, mut rx) = Session::pair();

        dispatcher.client_message(&session, b"hello".to_vec()).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn endpoint_errors_produce_a_server_error_reply() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = DispatcherService::builder()
            .endpoint(Failing)
            .endpoint(Recorder::new("e2", true, true, &log))
            .build();
        let (session, mut rx) = Session::pair();

        dispatcher.client_message(&session, b"hello".to_vec()).await;

        // dispatch stopped at the failing endpoint
        assert!(log.lock().unwrap().is_empty());
        let Some(crate::types::WsMessage::Binary(bytes)) = rx.try_recv().ok() else {
            panic!("expected a binary error reply");
        };
        let status = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(status, 500);
    }

    #[tokio::test]
    async fn close_fans_out_and_sweeps_room_membership() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = DispatcherService::builder()
            .endpoint(Recorder::new("e1", true, true, &log))
            .endpoint(Recorder::new("e2", true, true, &log))
            .build();
        let (session, _rx) = Session::pair();
        dispatcher.client_connected(session.clone()).await;

        let room = dispatcher
            .rooms()
            .create("den", Some(&session), false)
            .await
            .unwrap();
        assert_eq!(room.member_count().await, 1);

        dispatcher.client_closed(&session).await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["e1:connected", "e2:connected", "e1:closed", "e2:closed"]
        );
        assert!(dispatcher.rooms().get("den").await.is_none());
        assert_eq!(dispatcher.session_count().await, 0);
    }
}

//! Room registry and broadcast lifecycle

use super::room::Room;
use crate::protocol::Response;
use crate::session::{Session, SessionMap};
use crate::types::{SessionId, WsError, WsMessage, WsResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Room that exists from process start
pub const DEFAULT_ROOM: &str = "Global Chat Room";

/// Registry of live rooms, indexed by name with an auxiliary owner index
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Room>>>,
    owners: RwLock<HashMap<SessionId, String>>,
    sessions: Arc<SessionMap>,
}

impl RoomRegistry {
    /// Create a registry sharing the dispatcher's live-session map
    ///
    /// The default room starts out with zero members; only a join/leave
    /// cycle can disband it.
    pub fn new(sessions: Arc<SessionMap>) -> Self {
        let mut rooms = HashMap::new();
        rooms.insert(
            DEFAULT_ROOM.to_string(),
            Arc::new(Room::new(DEFAULT_ROOM, None, false)),
        );
        Self {
            rooms: RwLock::new(rooms),
            owners: RwLock::new(HashMap::new()),
            sessions,
        }
    }

    /// Create a room, rejecting duplicate names
    ///
    /// The owner, when given, becomes the first member.
    pub async fn create(
        &self,
        name: &str,
        owner: Option<&Arc<Session>>,
        is_private: bool,
    ) -> WsResult<Arc<Room>> {
        let room = {
            let mut rooms = self.rooms.write().await;
            if rooms.contains_key(name) {
                return Err(WsError::RoomExists(name.to_string()));
            }
            let room = Arc::new(Room::new(name, owner.map(|s| s.id()), is_private));
            rooms.insert(name.to_string(), room.clone());
            room
        };

        if let Some(owner) = owner {
            self.owners.write().await.insert(owner.id(), name.to_string());
            self.add_member(&room, owner.id()).await;
        }

        info!(room = name, is_private, "created room");
        Ok(room)
    }

    pub async fn get(&self, name: &str) -> Option<Arc<Room>> {
        self.rooms.read().await.get(name).cloned()
    }

    /// Room owned by the given session, if any
    pub async fn find_by_owner(&self, session_id: SessionId) -> Option<Arc<Room>> {
        let name = self.owners.read().await.get(&session_id).cloned()?;
        self.get(&name).await
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Names of rooms visible for discovery
    pub async fn public_room_names(&self) -> Vec<String> {
        let rooms = self.rooms.read().await;
        let mut names: Vec<String> = rooms
            .values()
            .filter(|room| !room.is_private())
            .map(|room| room.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Add a session to a room
    ///
    /// Idempotent: re-adding an existing member is a no-op and produces no
    /// duplicate notification. The join notification reaches the members
    /// present before the join, never the joiner itself; any pending invite
    /// for the session is consumed.
    pub async fn add_member(&self, room: &Arc<Room>, session_id: SessionId) {
        if room.has_member(session_id).await {
            return;
        }

        let joined =
            Response::new(200, "User Joined Room").set("User-UUID", session_id.to_string());
        self.broadcast(room, joined).await;

        room.insert_member(session_id).await;
        room.take_invite(session_id).await;
        info!(room = room.name(), session = %session_id, "member joined");
    }

    /// Remove a session from a room
    ///
    /// No-op for non-members. The leave notification reaches the remaining
    /// members; a room emptied by this call is disbanded.
    pub async fn remove_member(&self, room: &Arc<Room>, session_id: SessionId) {
        if !room.remove_member_id(session_id).await {
            return;
        }

        let left = Response::new(200, "User Left Room").set("User-UUID", session_id.to_string());
        self.broadcast(room, left).await;
        info!(room = room.name(), session = %session_id, "member left");

        if room.is_empty().await {
            self.disband(room.name()).await;
        }
    }

    /// Deliver an envelope to every current member of the room
    ///
    /// The envelope is stamped with the room's identity and privacy flag
    /// before serialization.
    pub async fn broadcast(&self, room: &Room, response: Response) {
        let response = response
            .set("Endpoint", "/rooms")
            .set("Room", room.name())
            .set("Is-Private", room.is_private().to_string());
        let bytes = response.to_bytes();

        let sessions = self.sessions.read().await;
        for member_id in room.member_ids().await {
            let Some(session) = sessions.get(&member_id) else {
                debug!(room = room.name(), session = %member_id, "skipping stale member");
                continue;
            };
            if session.send(WsMessage::Binary(bytes.clone())).is_err() {
                warn!(room = room.name(), session = %member_id, "failed to deliver broadcast");
            }
        }
    }

    /// Remove a room regardless of member count
    pub async fn disband(&self, name: &str) -> bool {
        let removed = self.rooms.write().await.remove(name);
        let Some(room) = removed else {
            return false;
        };

        if let Some(owner) = room.owner() {
            let mut owners = self.owners.write().await;
            if owners.get(&owner).map(String::as_str) == Some(name) {
                owners.remove(&owner);
            }
        }
        info!(room = name, "disbanded room");
        true
    }

    /// Remove a session from every room it belongs to
    ///
    /// Close-path helper: the transport owns session lifetime, so closing a
    /// connection drives removal from any room.
    pub async fn leave_all(&self, session_id: SessionId) {
        let rooms: Vec<Arc<Room>> = self.rooms.read().await.values().cloned().collect();
        for room in rooms {
            self.remove_member(&room, session_id).await;
        }
    }
}

//! The room entity

use crate::types::SessionId;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// A named group of sessions with an optional owner
#[derive(Debug)]
pub struct Room {
    name: String,
    owner: Option<SessionId>,
    is_private: bool,
    members: RwLock<HashSet<SessionId>>,
    pending_invites: RwLock<HashSet<SessionId>>,
}

impl Room {
    pub(crate) fn new(name: impl Into<String>, owner: Option<SessionId>, is_private: bool) -> Self {
        Self {
            name: name.into(),
            owner,
            is_private,
            members: RwLock::new(HashSet::new()),
            pending_invites: RwLock::new(HashSet::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> Option<SessionId> {
        self.owner
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub async fn has_member(&self, session_id: SessionId) -> bool {
        self.members.read().await.contains(&session_id)
    }

    pub async fn member_ids(&self) -> Vec<SessionId> {
        self.members.read().await.iter().copied().collect()
    }

    pub async fn member_count(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }

    /// Record a pending invite for the given session
    pub async fn invite(&self, session_id: SessionId) {
        self.pending_invites.write().await.insert(session_id);
    }

    pub async fn has_invite(&self, session_id: SessionId) -> bool {
        self.pending_invites.read().await.contains(&session_id)
    }

    pub(crate) async fn insert_member(&self, session_id: SessionId) -> bool {
        self.members.write().await.insert(session_id)
    }

    pub(crate) async fn remove_member_id(&self, session_id: SessionId) -> bool {
        self.members.write().await.remove(&session_id)
    }

    /// Consume a pending invite, if one exists
    pub(crate) async fn take_invite(&self, session_id: SessionId) -> bool {
        self.pending_invites.write().await.remove(&session_id)
    }
}

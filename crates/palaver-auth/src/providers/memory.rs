//! In-memory account store
//!
//! Backing store for tests and hosts that run without a database. Accounts
//! live in a `RwLock<HashMap>` keyed by email and are lost on drop.

use crate::error::AuthResult;
use crate::traits::UserStore;
use crate::user::User;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory [`UserStore`] implementation
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn create_or_update(&self, user: User) -> AuthResult<bool> {
        let mut users = self.users.write().await;
        let created = users.insert(user.email.clone(), user).is_none();
        debug!(created, "stored account");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_find() {
        let store = MemoryUserStore::new();
        let user = User::new("frosty", "frosty@example.com", "hash");

        assert!(store.create_or_update(user.clone()).await.unwrap());
        assert!(store.exists("frosty@example.com").await.unwrap());

        let found = store.find_by_email("frosty@example.com").await.unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn update_replaces_existing_account() {
        let store = MemoryUserStore::new();
        store
            .create_or_update(User::new("old", "a@b.com", "hash1"))
            .await
            .unwrap();

        let created = store
            .create_or_update(User::new("new", "a@b.com", "hash2"))
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(store.len().await, 1);
        let found = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(found.username, "new");
    }

    #[tokio::test]
    async fn unknown_email_is_none() {
        let store = MemoryUserStore::new();
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(!store.exists("nobody@example.com").await.unwrap());
    }
}

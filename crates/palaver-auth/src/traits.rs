//! The account store capability

use crate::error::AuthResult;
use crate::user::User;
use async_trait::async_trait;

/// Lookup and persistence capability consumed by protocol endpoints
///
/// Implementations are free to back this with any persistence layer; the
/// protocol core only ever sees this interface. All methods key accounts by
/// email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by email
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Check whether an account exists under the given email
    async fn exists(&self, email: &str) -> AuthResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Insert the account, or replace the stored account with the same email
    ///
    /// Returns `true` when a new account was created, `false` when an
    /// existing one was updated.
    async fn create_or_update(&self, user: User) -> AuthResult<bool>;
}

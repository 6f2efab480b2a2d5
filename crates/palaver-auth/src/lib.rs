//! # palaver-auth
//!
//! Account storage capability for the palaver messaging framework:
//! the [`UserStore`] trait consumed by protocol endpoints, the [`User`]
//! model with credential validation, Argon2 password hashing, and an
//! in-memory store implementation for tests and database-less hosts.

pub mod error;
pub mod providers;
pub mod traits;
pub mod user;
pub mod utils;

pub use error::{AuthError, AuthResult};
pub use providers::MemoryUserStore;
pub use traits::UserStore;
pub use user::{validate_email, validate_password, User};
pub use utils::Argon2Hasher;

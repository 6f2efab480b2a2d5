//! The account model and credential validation rules

use crate::error::{AuthError, AuthResult};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_MAX_LEN: usize = 32;

/// A stored account
///
/// `password_hash` always holds an Argon2 PHC string, never a plaintext
/// password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password_hash: String,

    pub discord_id: Option<String>,
    pub discord_name: Option<String>,

    #[serde(default)]
    pub friends: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            discord_id: None,
            discord_name: None,
            friends: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Public summary of the account, safe to cache in session metadata
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "email": self.email,
            "discord_id": self.discord_id,
            "discord_name": self.discord_name,
        })
    }
}

/// Check that an email has the expected `local@domain.tld` shape
pub fn validate_email(email: &str) -> AuthResult<()> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(AuthError::validation("Invalid email"))
    }
}

/// Check password strength: 6-32 characters with at least one capital
/// letter, one digit, and one symbol
pub fn validate_password(password: &str) -> AuthResult<()> {
    let length = password.chars().count();
    let strong = (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&length)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric());
    if strong {
        Ok(())
    } else {
        Err(AuthError::validation(
            "Password must be 6-32 characters long and contain a number, \
             a capital letter, and a symbol",
        ))
    }
}

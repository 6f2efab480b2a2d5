//! Authentication error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication and account-store errors
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthError {
    /// Invalid credentials provided
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// A user already exists under the given email
    #[error("Account already exists: {email}")]
    AccountExists { email: String },

    /// Credential validation errors (email shape, password strength)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Cryptographic errors
    #[error("Cryptographic error: {message}")]
    Cryptographic { message: String },

    /// Backing store errors
    #[error("Store error: {message}")]
    Store { message: String },
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Cryptographic {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::AccountExists { .. } => "ACCOUNT_EXISTS",
            AuthError::Validation { .. } => "VALIDATION_ERROR",
            AuthError::Cryptographic { .. } => "CRYPTOGRAPHIC_ERROR",
            AuthError::Store { .. } => "STORE_ERROR",
        }
    }

    /// Get the HTTP-style status code for the error
    pub fn status_code(&self) -> u32 {
        match self {
            AuthError::InvalidCredentials => 401,
            AuthError::UserNotFound => 404,
            AuthError::AccountExists { .. } => 409,
            AuthError::Validation { .. } => 400,
            AuthError::Cryptographic { .. } => 500,
            AuthError::Store { .. } => 500,
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

//! Password hashing utilities
//!
//! Argon2id via the `argon2` crate, with the PHC string format for storage.
//! Hashing cost is tunable per environment; verification reads its
//! parameters out of the stored hash, so it needs no configuration.

use crate::error::{AuthError, AuthResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use palaver_core::Environment;

/// Argon2id password hasher
#[derive(Debug, Clone, Copy)]
pub struct Argon2Hasher {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Hasher {
    /// Create a hasher with custom parameters
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// Parameters suitable for production hosts
    pub fn production() -> Self {
        Self::new(65536, 4, 4)
    }

    /// Cheaper parameters for development and test runs
    pub fn development() -> Self {
        Self::new(4096, 2, 2)
    }

    /// Pick parameters matching the given environment
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Development | Environment::Testing => Self::development(),
        }
    }

    fn argon2(&self) -> AuthResult<Argon2<'static>> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| AuthError::crypto(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::crypto(e.to_string()))?;

        Ok(password_hash.to_string())
    }

    /// Verify a plaintext password against a stored PHC hash string
    ///
    /// Returns `Ok(false)` for a wrong password; only malformed hashes or
    /// backend failures produce an error. Hash parameters come from the
    /// stored string itself.
    pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|_| AuthError::crypto("invalid password hash"))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::crypto(e.to_string())),
        }
    }
}

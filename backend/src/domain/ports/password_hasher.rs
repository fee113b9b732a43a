//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing failed, for example because parameters were rejected.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Salted adaptive hashing of user passwords.
///
/// Implementations are CPU bound and must keep that work off the async
/// executor threads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against `hash`. A mismatch is `Ok(false)`.
    async fn verify(&self, password: &str, hash: &PasswordHash)
    -> Result<bool, PasswordHashError>;
}

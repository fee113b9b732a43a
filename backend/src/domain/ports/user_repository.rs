//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, NewUser, User, UserAccount, UserName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail => "email address is already registered",
        /// Another account already uses the name.
        DuplicateName => "user name is already taken",
        /// A lookup expected to match one row matched several.
        Ambiguous { message: String } => "user lookup was ambiguous: {message}",
    }
}

/// Port for reading and creating user accounts.
///
/// Uniqueness of email and name is enforced by the store; adapters report the
/// violated constraint through the matching `Duplicate*` variant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return the stored user.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch the account registered under `email`, including its password hash.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch the user called `name`.
    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError>;

    /// Every registered user ordered by id.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}

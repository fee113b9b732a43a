//! Registration and login service.
//!
//! Implements [`AccountService`] on top of the user repository, the password
//! hasher and the session token issuer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    AccountService, PasswordHashError, PasswordHasher, SessionTokenError, SessionTokens,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, NewUser, PasswordHash, Registration, SessionGrant, User,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Well-formed Argon2id hash with default parameters that matches no password.
///
/// Logins for unknown emails are verified against it so both failure paths
/// pay for one hash computation.
pub(crate) const DECOY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$omd2HU7vQhkCRfHj+XiVeg$4rZhOFIFugS/oLmuqEeF+GiEFVBLv4GOwF7KfY5OYYo";

/// Account service implementing the registration and login driving port.
#[derive(Clone)]
pub struct CredentialAccountService<U: ?Sized, H: ?Sized, T: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U: ?Sized, H: ?Sized, T: ?Sized> CredentialAccountService<U, H, T> {
    /// Create a new service with the given collaborators.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

/// Map user repository failures onto domain errors.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => Error::conflict("email already registered")
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
        UserPersistenceError::DuplicateName => Error::conflict("name already taken")
            .with_details(json!({ "field": "name", "code": "duplicate_name" })),
        UserPersistenceError::Ambiguous { message } => {
            Error::internal(format!("ambiguous user lookup: {message}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: SessionTokenError) -> Error {
    Error::internal(error.to_string())
}

impl<U, H, T> CredentialAccountService<U, H, T>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: SessionTokens + ?Sized,
{
    fn grant(&self, user: User) -> Result<SessionGrant, Error> {
        let token = self.tokens.issue(&user).map_err(map_token_error)?;
        Ok(SessionGrant { user, token })
    }
}

#[async_trait]
impl<U, H, T> AccountService for CredentialAccountService<U, H, T>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: SessionTokens + ?Sized,
{
    async fn register(&self, registration: &Registration) -> Result<SessionGrant, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let new_user = NewUser {
            name: registration.name().clone(),
            email: registration.email().clone(),
            age: registration.age(),
            password_hash,
        };
        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_user_persistence_error)?;
        self.grant(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionGrant, Error> {
        let Some(account) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
        else {
            // The outcome is discarded; only the elapsed time matters here.
            let _ = self
                .hasher
                .verify(credentials.password(), &PasswordHash::new(DECOY_PASSWORD_HASH))
                .await;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.grant(account.user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;

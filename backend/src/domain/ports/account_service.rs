//! Driving port for registration and login use-cases.
//!
//! Inbound adapters call this port to create accounts and exchange
//! credentials for a session without importing persistence or crypto
//! infrastructure, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, SessionGrant};

/// Domain use-case port for account creation and authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account and open a session for it.
    async fn register(&self, registration: &Registration) -> Result<SessionGrant, Error>;

    /// Validate credentials and open a session.
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// [`crate::domain::ErrorCode::Unauthorized`].
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionGrant, Error>;
}

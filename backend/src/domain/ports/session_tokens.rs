//! Port for signing and verifying session tokens.

use crate::domain::{SessionClaims, SessionToken, User};

use super::define_port_error;

define_port_error! {
    /// Failures raised while issuing or verifying a session token.
    pub enum SessionTokenError {
        /// The signature does not match the server secret.
        InvalidSignature => "session token signature is invalid",
        /// The token lifetime has elapsed.
        Expired => "session token has expired",
        /// The token could not be decoded.
        Malformed { message: String } => "session token is malformed: {message}",
        /// Encoding a new token failed.
        Signing { message: String } => "session token could not be signed: {message}",
    }
}

impl SessionTokenError {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::Malformed { .. } => "malformed",
            Self::Signing { .. } => "signing",
        }
    }
}

/// Issues and verifies signed session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Mint a token for `user` that expires one session lifetime from now.
    fn issue(&self, user: &User) -> Result<SessionToken, SessionTokenError>;

    /// Verify the signature and expiry of `token` and return its claims.
    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError>;
}

//! HS256 JWT implementation of the [`SessionTokens`] port.
//!
//! Expiry is checked against the injected [`Clock`] rather than the system
//! time, with no leeway. Issuer and audience are not used.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{SessionTokenError, SessionTokens};
use crate::domain::{Email, SessionClaims, SessionToken, User, UserId, UserName};

/// Claims as they appear inside the token.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    #[serde(rename = "userID")]
    user_id: i32,
    username: String,
    email: String,
    iat: i64,
    exp: i64,
}

impl From<&SessionClaims> for WireClaims {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            user_id: claims.user_id.get(),
            username: claims.username.as_ref().to_owned(),
            email: claims.email.as_ref().to_owned(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        }
    }
}

impl TryFrom<WireClaims> for SessionClaims {
    type Error = SessionTokenError;

    fn try_from(wire: WireClaims) -> Result<Self, Self::Error> {
        let malformed = |err: crate::domain::UserValidationError| {
            SessionTokenError::malformed(err.to_string())
        };
        let timestamp = |secs: i64, claim: &str| {
            DateTime::<Utc>::from_timestamp(secs, 0)
                .ok_or_else(|| SessionTokenError::malformed(format!("{claim} out of range")))
        };
        Ok(Self {
            user_id: UserId::new(wire.user_id).map_err(malformed)?,
            username: UserName::new(&wire.username).map_err(malformed)?,
            email: Email::new(&wire.email).map_err(malformed)?,
            issued_at: timestamp(wire.iat, "iat")?,
            expires_at: timestamp(wire.exp, "exp")?,
        })
    }
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtSessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl JwtSessionTokens {
    /// Build a codec for `secret`, reading the current time from `clock`.
    pub fn new(secret: &Zeroizing<Vec<u8>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue(&self, user: &User) -> Result<SessionToken, SessionTokenError> {
        let claims = SessionClaims::for_user(user, self.clock.utc());
        let value = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &WireClaims::from(&claims),
            &self.encoding,
        )
        .map_err(|err| SessionTokenError::signing(err.to_string()))?;
        Ok(SessionToken::new(value, claims.expires_at))
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &Self::validation())
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => SessionTokenError::invalid_signature(),
                ErrorKind::ExpiredSignature => SessionTokenError::expired(),
                _ => SessionTokenError::malformed(err.to_string()),
            })?;

        let claims = SessionClaims::try_from(data.claims)?;
        if claims.is_expired_at(self.clock.utc()) {
            return Err(SessionTokenError::expired());
        }
        Ok(claims)
    }
}

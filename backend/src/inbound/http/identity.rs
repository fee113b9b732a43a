//! Authenticated caller identity for protected handlers.
//!
//! The session middleware stores an [`Identity`] in the request extensions
//! once the `jwt` cookie verifies. Handlers take `Identity` as an argument to
//! require a session; extraction fails with `401 Unauthorized` otherwise.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{Email, Error, SessionClaims, UserId, UserName};

/// Verified caller, derived from session claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    username: UserName,
    email: Email,
}

impl Identity {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &UserName {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            email: claims.email,
        }
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<Identity>().cloned();
        ready(identity.ok_or_else(|| Error::unauthorized("login required").into()))
    }
}

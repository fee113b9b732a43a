//! Session claims minted at login and re-verified on every request.

use chrono::{DateTime, Duration, Utc};

use super::{Email, User, UserId, UserName};

/// Lifetime of a session token and its cookie, in seconds.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Lifetime of a session token and its cookie.
pub fn session_ttl() -> Duration {
    Duration::seconds(SESSION_TTL_SECS)
}

/// Identity facts carried inside a signed session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: UserId,
    pub username: UserName,
    pub email: Email,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Claims for `user` issued at `now`, expiring one session lifetime later.
    pub fn for_user(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id(),
            username: user.name().clone(),
            email: user.email().clone(),
            issued_at: now,
            expires_at: now + session_ttl(),
        }
    }

    /// Whether the claims have lapsed at `now`. No leeway is applied.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Encoded session token ready to be delivered to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub user: User,
    pub token: SessionToken,
}

//! Session cookie helpers to keep HTTP handlers free of cookie plumbing.
//!
//! The signed session token travels in an HTTP-only `jwt` cookie. Handlers
//! only ask for "the cookie carrying this token" or "the cookie that clears the
//! session"; attribute choices live here.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};

use crate::domain::{SESSION_TTL_SECS, SessionToken};

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE_NAME: &str = "jwt";

/// Build the cookie delivering a freshly issued session token.
///
/// The cookie is HTTP-only, `SameSite=Lax`, scoped to `/` and lives as long as
/// the token itself.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use todo_backend::domain::SessionToken;
/// use todo_backend::inbound::http::session::session_cookie;
///
/// let expires_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
/// let cookie = session_cookie(&SessionToken::new("header.claims.sig", expires_at), false);
/// assert_eq!(cookie.name(), "jwt");
/// assert_eq!(cookie.http_only(), Some(true));
/// ```
pub fn session_cookie(token: &SessionToken, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE_NAME, token.value().to_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(SESSION_TTL_SECS))
        .finish()
}

/// Build the cookie that removes the session on the client.
///
/// Empty value, zero max-age and an expiry in the past.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE_NAME, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish();
    cookie.make_removal();
    cookie
}

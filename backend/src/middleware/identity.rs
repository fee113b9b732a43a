//! Session identity middleware.
//!
//! Reads the `jwt` cookie, verifies it through the [`SessionTokens`] port and
//! stores the resulting [`Identity`] in the request extensions. Requests with
//! a missing or invalid cookie pass through unauthenticated; protected
//! handlers reject them through the `Identity` extractor.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::HttpMessage;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::SessionTokens;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::session::SESSION_COOKIE_NAME;

/// Middleware factory attaching verified session identities.
#[derive(Clone)]
pub struct SessionIdentity {
    tokens: Arc<dyn SessionTokens>,
}

impl SessionIdentity {
    pub fn new(tokens: Arc<dyn SessionTokens>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionIdentityMiddleware {
            service,
            tokens: Arc::clone(&self.tokens),
        }))
    }
}

/// Service wrapper produced by [`SessionIdentity`].
pub struct SessionIdentityMiddleware<S> {
    service: S,
    tokens: Arc<dyn SessionTokens>,
}

impl<S> SessionIdentityMiddleware<S> {
    fn identify(&self, req: &ServiceRequest) -> Option<Identity> {
        let cookie = req.cookie(SESSION_COOKIE_NAME)?;
        if cookie.value().is_empty() {
            return None;
        }
        match self.tokens.verify(cookie.value()) {
            Ok(claims) => Some(Identity::from(claims)),
            Err(error) => {
                debug!(kind = error.kind(), path = %req.path(), "ignoring invalid session token");
                None
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for SessionIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(identity) = self.identify(&req) {
            req.extensions_mut().insert(identity);
        }
        self.service.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockSessionTokens, SessionTokenError};
    use crate::domain::{Age, Email, SessionClaims, User, UserId, UserName};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn claims() -> SessionClaims {
        let user = User::new(
            UserId::new(11).expect("valid id"),
            UserName::new("ada").expect("valid name"),
            Email::new("ada@example.com").expect("valid email"),
            Age::new(36).expect("valid age"),
        );
        let now = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        SessionClaims::for_user(&user, now)
    }

    fn tokens() -> Arc<dyn SessionTokens> {
        let mut tokens = MockSessionTokens::new();
        tokens.expect_verify().returning(|token| match token {
            "good" => Ok(claims()),
            "stale" => Err(SessionTokenError::Expired),
            _ => Err(SessionTokenError::InvalidSignature),
        });
        Arc::new(tokens)
    }

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().body(identity.user_id().to_string())
    }

    async fn call_with(cookie: Option<&'static str>) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .wrap(SessionIdentity::new(tokens()))
                .route("/me", web::get().to(whoami)),
        )
        .await;
        let mut req = test::TestRequest::get().uri("/me");
        if let Some(value) = cookie {
            req = req.cookie(Cookie::new(SESSION_COOKIE_NAME, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[actix_web::test]
    async fn valid_cookie_attaches_identity() {
        let (status, body) = call_with(Some("good")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "11");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("stale"))]
    #[case(Some("tampered"))]
    #[actix_web::test]
    async fn missing_or_invalid_cookie_leaves_request_anonymous(
        #[case] cookie: Option<&'static str>,
    ) {
        let (status, _) = call_with(cookie).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn public_routes_ignore_bad_cookies() {
        let app = test::init_service(
            App::new()
                .wrap(SessionIdentity::new(tokens()))
                .route("/open", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/open")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, "tampered"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

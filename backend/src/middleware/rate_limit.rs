//! Fixed-window rate limiting keyed by peer address.
//!
//! Two tiers share one window: every request counts against the global limit
//! and requests to the credential endpoints also count against the tighter
//! auth limit. Counters live in a process-local table that is cleared when the
//! window rolls over.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderValue, RETRY_AFTER};
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use tracing::warn;

use crate::domain::Error as ApiError;

/// Paths that count against the auth tier.
pub const AUTH_PATHS: [&str; 2] = ["/register", "/login"];

/// Limits applied per peer address and window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub global_limit: u32,
    pub auth_limit: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_limit: 300,
            auth_limit: 10,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Tier {
    Global,
    Auth,
}

impl Tier {
    fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Auth => "auth",
        }
    }
}

#[derive(Debug)]
struct Rejection {
    tier: Tier,
    retry_after: Duration,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    counts: HashMap<(Tier, Option<IpAddr>), u32>,
}

/// Shared counter table.
#[derive(Debug)]
struct Limiter {
    config: RateLimitConfig,
    window: Mutex<Window>,
}

impl Limiter {
    fn new(config: RateLimitConfig, now: Instant) -> Self {
        Self {
            config,
            window: Mutex::new(Window {
                started: now,
                counts: HashMap::new(),
            }),
        }
    }

    fn admit(&self, peer: Option<IpAddr>, auth: bool, now: Instant) -> Result<(), Rejection> {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        if now.saturating_duration_since(window.started) >= self.config.window {
            window.started = now;
            window.counts.clear();
        }
        let retry_after = self
            .config
            .window
            .saturating_sub(now.saturating_duration_since(window.started));

        let mut tiers = vec![(Tier::Global, self.config.global_limit)];
        if auth {
            tiers.push((Tier::Auth, self.config.auth_limit));
        }
        for (tier, limit) in tiers {
            let count = window.counts.entry((tier, peer)).or_insert(0);
            *count = count.saturating_add(1);
            if *count > limit {
                return Err(Rejection { tier, retry_after });
            }
        }
        Ok(())
    }
}

/// Rate limiting middleware factory.
///
/// Clones share one counter table, so build it once outside the
/// `HttpServer` factory closure.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<Limiter>,
}

impl RateLimit {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            limiter: Arc::new(Limiter::new(config, Instant::now())),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<Limiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let peer = req.peer_addr().map(|addr| addr.ip());
        let auth = AUTH_PATHS.contains(&req.path());

        match self.limiter.admit(peer, auth, Instant::now()) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => Box::pin(async move {
                // Whole seconds, rounded up.
                let retry_secs = rejection.retry_after.as_secs()
                    + u64::from(rejection.retry_after.subsec_nanos() > 0);
                warn!(
                    tier = rejection.tier.as_str(),
                    peer = ?peer,
                    path = %req.path(),
                    "rate limit exceeded"
                );
                let error = ApiError::too_many_requests("rate limit exceeded").with_details(json!({
                    "tier": rejection.tier.as_str(),
                    "retryAfterSecs": retry_secs,
                }));
                let mut response = error.error_response();
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(retry_secs));
                Ok(req.into_response(response).map_into_right_body())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, web};
    use rstest::{fixture, rstest};
    use serde_json::Value;

    const PEER_A: &str = "10.0.0.1";
    const PEER_B: &str = "10.0.0.2";

    #[fixture]
    fn config() -> RateLimitConfig {
        RateLimitConfig {
            global_limit: 3,
            auth_limit: 1,
            window: Duration::from_secs(60),
        }
    }

    fn ip(raw: &str) -> Option<IpAddr> {
        raw.parse().ok()
    }

    #[rstest]
    fn global_limit_applies_per_peer(config: RateLimitConfig) {
        let now = Instant::now();
        let limiter = Limiter::new(config, now);
        for _ in 0..3 {
            assert!(limiter.admit(ip(PEER_A), false, now).is_ok());
        }
        let rejection = limiter
            .admit(ip(PEER_A), false, now)
            .expect_err("fourth request rejected");
        assert_eq!(rejection.tier, Tier::Global);
        assert!(limiter.admit(ip(PEER_B), false, now).is_ok());
    }

    #[rstest]
    fn auth_limit_is_tighter(config: RateLimitConfig) {
        let now = Instant::now();
        let limiter = Limiter::new(config, now);
        assert!(limiter.admit(ip(PEER_A), true, now).is_ok());
        let rejection = limiter
            .admit(ip(PEER_A), true, now)
            .expect_err("second auth request rejected");
        assert_eq!(rejection.tier, Tier::Auth);
        assert!(limiter.admit(ip(PEER_A), false, now).is_ok());
    }

    #[rstest]
    fn window_rollover_resets_counters(config: RateLimitConfig) {
        let start = Instant::now();
        let limiter = Limiter::new(config, start);
        assert!(limiter.admit(ip(PEER_A), true, start).is_ok());
        assert!(limiter.admit(ip(PEER_A), true, start).is_err());

        let later = start + Duration::from_secs(60);
        assert!(limiter.admit(ip(PEER_A), true, later).is_ok());
        let window = limiter.window.lock().expect("lock");
        assert_eq!(window.started, later);
        assert_eq!(window.counts.len(), 2);
    }

    #[rstest]
    fn retry_after_counts_down(config: RateLimitConfig) {
        let start = Instant::now();
        let limiter = Limiter::new(config, start);
        let now = start + Duration::from_secs(45);
        assert!(limiter.admit(ip(PEER_A), true, now).is_ok());
        let rejection = limiter
            .admit(ip(PEER_A), true, now)
            .expect_err("rejected");
        assert_eq!(rejection.retry_after, Duration::from_secs(15));
    }

    #[rstest]
    #[actix_web::test]
    async fn exceeding_auth_limit_returns_429(config: RateLimitConfig) {
        let app = actix_test::init_service(
            App::new()
                .wrap(RateLimit::new(config))
                .route("/login", web::post().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let request = || {
            actix_test::TestRequest::post()
                .uri("/login")
                .peer_addr("10.0.0.1:4000".parse().expect("socket address"))
                .to_request()
        };

        let first = actix_test::call_service(&app, request()).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = actix_test::call_service(&app, request()).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key(RETRY_AFTER));
        let body: Value = actix_test::read_body_json(second).await;
        assert_eq!(body["code"], "too_many_requests");
        assert_eq!(body["details"]["tier"], "auth");
    }
}

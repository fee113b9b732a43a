//! Uniform per-request deadline.
//!
//! Requests still running when the deadline passes are dropped and answered
//! with `504 gateway_timeout`.

use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::Error as ApiError;

/// Request timeout middleware factory.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout {
    limit: Duration,
}

impl RequestTimeout {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutMiddleware {
            service,
            limit: self.limit,
        }))
    }
}

/// Service wrapper produced by [`RequestTimeout`].
pub struct RequestTimeoutMiddleware<S> {
    service: S,
    limit: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimeoutMiddleware<S>
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
        let limit = self.limit;
        let http_req = req.request().clone();
        let fut = self.service.call(req);
        Box::pin(async move {
            match tokio::time::timeout(limit, fut).await {
                Ok(result) => result.map(ServiceResponse::map_into_left_body),
                Err(_) => {
                    warn!(
                        path = %http_req.path(),
                        limit_ms = limit.as_millis() as u64,
                        "request timed out"
                    );
                    let response = ApiError::gateway_timeout("request timed out").error_response();
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
            }
        })
    }
}

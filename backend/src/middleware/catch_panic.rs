//! Panic recovery for request handling.
//!
//! A panic inside an inner service or handler is logged with its payload and
//! answered with a redacted `500 internal_error` instead of tearing down the
//! connection.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpRequest, ResponseError};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain::Error as ApiError;

/// Panic recovery middleware factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatchPanic;

impl<S, B> Transform<S, ServiceRequest> for CatchPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CatchPanicMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CatchPanicMiddleware { service }))
    }
}

/// Service wrapper produced by [`CatchPanic`].
pub struct CatchPanicMiddleware<S> {
    service: S,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

fn recovered<B>(http_req: HttpRequest, payload: &(dyn Any + Send)) -> ServiceResponse<EitherBody<B>> {
    error!(
        panic = panic_message(payload),
        path = %http_req.path(),
        "request handler panicked"
    );
    let response = ApiError::internal("request handler panicked").error_response();
    ServiceResponse::new(http_req, response).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for CatchPanicMiddleware<S>
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
        let http_req = req.request().clone();
        let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => {
                return Box::pin(async move { Ok(recovered(http_req, payload.as_ref())) });
            }
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result.map(ServiceResponse::map_into_left_body),
                Err(payload) => Ok(recovered(http_req, payload.as_ref())),
            }
        })
    }
}

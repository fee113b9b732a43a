//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers and extractors to turn failures into consistent JSON responses and
//! status codes.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = %self.message(), trace_id = ?self.trace_id(), "internal error");
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Convert JSON extractor failures into `400 invalid_request` payloads.
///
/// Registered through `web::JsonConfig::error_handler` so malformed bodies,
/// wrong content types and missing fields share the API error schema.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected JSON payload");
    let (message, code) = match &err {
        JsonPayloadError::ContentType => ("expected an application/json body", "content_type"),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            ("request body is too large", "payload_too_large")
        }
        JsonPayloadError::Deserialize(inner) if inner.is_data() => {
            ("request body has missing or mistyped fields", "invalid_fields")
        }
        _ => ("request body is not valid JSON", "invalid_json"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": code }))
        .into()
}

/// Convert path extractor failures, such as a non-numeric todo id, into
/// `400 invalid_request` payloads.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected path parameters");
    Error::invalid_request("invalid path parameter")
        .with_details(json!({ "code": "invalid_path" }))
        .into()
}

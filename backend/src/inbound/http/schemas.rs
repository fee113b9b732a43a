//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the JSON produced by their domain counterparts
//! but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist or belongs to another user.
    #[schema(rename = "not_found")]
    NotFound,
    /// A uniqueness constraint rejected the request.
    #[schema(rename = "conflict")]
    Conflict,
    /// The caller exceeded a rate limit.
    #[schema(rename = "too_many_requests")]
    TooManyRequests,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The request exceeded the server deadline.
    #[schema(rename = "gateway_timeout")]
    GatewayTimeout,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be empty")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "5f0c8a1e-7d4b-4b8e-9a51-2f0e4c3d1a9b")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
///
/// Password hashes are never part of this payload.
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = 1)]
    id: i32,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = 36)]
    age: i32,
}

/// OpenAPI schema for [`crate::domain::TodoStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TodoStatus)]
pub enum TodoStatusSchema {
    #[schema(rename = "incomplete")]
    Incomplete,
    #[schema(rename = "complete")]
    Complete,
}

/// OpenAPI schema for [`crate::domain::Todo`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Todo, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TodoSchema {
    #[schema(example = 7)]
    id: i32,
    #[schema(example = "buy milk")]
    title: String,
    status: TodoStatusSchema,
    /// Identifier of the owning user.
    #[schema(example = 1)]
    owner_id: i32,
}

//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters and the services that implement the driving ports. Types are
//! immutable once validated and document their serde contracts in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserId, UserName, Email, Age: account identity.
//! - Todo, TodoId, TodoTitle, TodoStatus: owner-scoped work items.
//! - LoginCredentials, Registration: validated authentication inputs.
//! - SessionClaims, SessionToken, SessionGrant: signed session state.
//! - CredentialAccountService, UserDirectory, TodoService: port implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod session;
pub mod todo;
pub mod todo_service;
pub mod trace_id;
pub mod user;
pub mod user_directory;

pub use self::account_service::CredentialAccountService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::session::{
    SESSION_TTL_SECS, SessionClaims, SessionGrant, SessionToken, session_ttl,
};
pub use self::todo::{
    NewTodo, TODO_TITLE_MAX, Todo, TodoId, TodoStatus, TodoTitle, TodoValidationError,
};
pub use self::todo_service::TodoService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Age, Email, NewUser, PasswordHash, User, UserAccount, UserId, UserName, UserValidationError,
};
pub use self::user_directory::UserDirectory;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use todo_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("todo not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

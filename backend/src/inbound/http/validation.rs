//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors report *what* is wrong; these helpers turn that into
//! `400 invalid_request` payloads with `{ "field", "code" }` details.

use serde_json::json;

use crate::domain::{CredentialsValidationError, Error, TodoValidationError, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    EmptyName,
    NameTooLong,
    EmptyEmail,
    EmailTooLong,
    InvalidEmail,
    AgeOutOfRange,
    EmptyPassword,
    EmptyTitle,
    TitleTooLong,
    UnknownStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::EmptyName => "empty_name",
            ErrorCode::NameTooLong => "name_too_long",
            ErrorCode::EmptyEmail => "empty_email",
            ErrorCode::EmailTooLong => "email_too_long",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::AgeOutOfRange => "age_out_of_range",
            ErrorCode::EmptyPassword => "empty_password",
            ErrorCode::EmptyTitle => "empty_title",
            ErrorCode::TitleTooLong => "title_too_long",
            ErrorCode::UnknownStatus => "unknown_status",
        }
    }
}

fn field_error(field: &str, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

fn user_code(err: &UserValidationError) -> ErrorCode {
    match err {
        UserValidationError::InvalidId => ErrorCode::InvalidId,
        UserValidationError::EmptyName => ErrorCode::EmptyName,
        UserValidationError::NameTooLong { .. } => ErrorCode::NameTooLong,
        UserValidationError::EmptyEmail => ErrorCode::EmptyEmail,
        UserValidationError::EmailTooLong { .. } => ErrorCode::EmailTooLong,
        UserValidationError::InvalidEmail => ErrorCode::InvalidEmail,
        UserValidationError::AgeOutOfRange { .. } => ErrorCode::AgeOutOfRange,
    }
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    field_error(err.field(), err.to_string(), user_code(&err))
}

pub(crate) fn credentials_validation_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyPassword => {
            field_error("password", err.to_string(), ErrorCode::EmptyPassword)
        }
        CredentialsValidationError::User(inner) => user_validation_error(inner),
    }
}

pub(crate) fn todo_validation_error(err: TodoValidationError) -> Error {
    let (field, code) = match &err {
        TodoValidationError::InvalidId => ("id", ErrorCode::InvalidId),
        TodoValidationError::EmptyTitle => ("title", ErrorCode::EmptyTitle),
        TodoValidationError::TitleTooLong { .. } => ("title", ErrorCode::TitleTooLong),
        TodoValidationError::UnknownStatus(_) => ("status", ErrorCode::UnknownStatus),
    };
    field_error(field, err.to_string(), code)
}

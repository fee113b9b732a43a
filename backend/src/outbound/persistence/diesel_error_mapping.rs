//! Translation of pool and Diesel failures into repository port errors.
//!
//! Unique and foreign-key violations are recognised by constraint name; the
//! names come from the PostgreSQL defaults produced by the migrations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{TodoPersistenceError, UserPersistenceError};

use super::pool::PoolError;

pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
pub(crate) const USERS_NAME_KEY: &str = "users_name_key";
pub(crate) const TODOS_TITLE_KEY: &str = "todos_title_key";

/// Coarse classification shared by every repository.
enum Failure {
    Unique(Option<String>),
    ForeignKey,
    Connection(&'static str),
    Query(&'static str),
}

fn classify(error: DieselError) -> Failure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Failure::Unique(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Failure::ForeignKey
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            Failure::Connection("database connection error")
        }
        DieselError::NotFound => Failure::Query("record not found"),
        DieselError::QueryBuilderError(_) => Failure::Query("database query error"),
        _ => Failure::Query("database error"),
    }
}

pub(crate) fn map_user_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

pub(crate) fn map_todo_pool_error(error: PoolError) -> TodoPersistenceError {
    TodoPersistenceError::connection(error.into_message())
}

pub(crate) fn map_user_diesel_error(error: DieselError) -> UserPersistenceError {
    match classify(error) {
        Failure::Unique(Some(name)) if name == USERS_EMAIL_KEY => {
            UserPersistenceError::duplicate_email()
        }
        Failure::Unique(Some(name)) if name == USERS_NAME_KEY => {
            UserPersistenceError::duplicate_name()
        }
        Failure::Unique(_) => UserPersistenceError::query("unexpected unique violation"),
        Failure::ForeignKey => UserPersistenceError::query("unexpected foreign key violation"),
        Failure::Connection(message) => UserPersistenceError::connection(message),
        Failure::Query(message) => UserPersistenceError::query(message),
    }
}

pub(crate) fn map_todo_diesel_error(error: DieselError) -> TodoPersistenceError {
    match classify(error) {
        Failure::Unique(Some(name)) if name == TODOS_TITLE_KEY => {
            TodoPersistenceError::duplicate_title()
        }
        Failure::Unique(_) => TodoPersistenceError::query("unexpected unique violation"),
        Failure::ForeignKey => TodoPersistenceError::unknown_owner(),
        Failure::Connection(message) => TodoPersistenceError::connection(message),
        Failure::Query(message) => TodoPersistenceError::query(message),
    }
}

//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! reach the domain. Conversion into domain types re-runs validation, so a row
//! that violates a domain invariant surfaces as a query error.

use diesel::prelude::*;

use crate::domain::{
    Age, Email, PasswordHash, Todo, TodoId, TodoStatus, TodoTitle, User, UserAccount, UserId,
    UserName,
};

use super::schema::{todos, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: i32,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub age: i32,
}

impl UserRow {
    /// Convert into a domain account, keeping the password hash.
    pub fn into_account(self) -> Result<UserAccount, String> {
        let password_hash = PasswordHash::new(self.password_hash.clone());
        let user = self.into_user()?;
        Ok(UserAccount {
            user,
            password_hash,
        })
    }

    /// Convert into a domain user, dropping the password hash.
    pub fn into_user(self) -> Result<User, String> {
        let invalid = |err: crate::domain::UserValidationError| {
            format!("invalid user row {}: {err}", self.id)
        };
        Ok(User::new(
            UserId::new(self.id).map_err(invalid)?,
            UserName::new(&self.name).map_err(invalid)?,
            Email::new(&self.email).map_err(invalid)?,
            Age::new(self.age).map_err(invalid)?,
        ))
    }
}

/// Row struct for reading from the todos table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TodoRow {
    pub id: i32,
    pub title: String,
    pub status: String,
    pub user_id: i32,
}

/// Insertable struct for creating todo records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub(crate) struct NewTodoRow<'a> {
    pub title: &'a str,
    pub status: &'a str,
    pub user_id: i32,
}

impl TryFrom<TodoRow> for Todo {
    type Error = String;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let invalid = |err: crate::domain::TodoValidationError| {
            format!("invalid todo row {}: {err}", row.id)
        };
        Ok(Todo::new(
            TodoId::new(row.id).map_err(invalid)?,
            TodoTitle::new(&row.title).map_err(invalid)?,
            row.status.parse::<TodoStatus>().map_err(invalid)?,
            UserId::new(row.user_id)
                .map_err(|err| format!("invalid todo row {}: {err}", row.id))?,
        ))
    }
}

//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, User, UserAccount, UserName};

use super::diesel_error_mapping::{map_user_diesel_error, map_user_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row.into_user().map_err(|message| {
        warn!(%message, "stored user failed validation");
        UserPersistenceError::query(message)
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let row = NewUserRow {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
            age: user.age.get(),
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;
        row_to_user(stored)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;

        row.map(|row| {
            row.into_account().map_err(|message| {
                warn!(%message, "stored user failed validation");
                UserPersistenceError::query(message)
            })
        })
        .transpose()
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        // Two rows are enough to detect a duplicate name.
        let mut rows: Vec<UserRow> = users::table
            .filter(users::name.eq(name.as_ref()))
            .select(UserRow::as_select())
            .order(users::id.asc())
            .limit(2)
            .load(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;

        if rows.len() > 1 {
            return Err(UserPersistenceError::ambiguous(format!(
                "more than one user named {name}"
            )));
        }
        rows.pop().map(row_to_user).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }
}

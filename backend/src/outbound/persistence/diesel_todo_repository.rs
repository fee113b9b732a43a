//! PostgreSQL-backed `TodoRepository` implementation using Diesel ORM.
//!
//! Ownership is part of every `WHERE` clause; completion is one
//! `UPDATE ... WHERE id = $1 AND user_id = $2 RETURNING ...` statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TodoPersistenceError, TodoRepository};
use crate::domain::{NewTodo, Todo, TodoId, TodoStatus, UserId};

use super::diesel_error_mapping::{map_todo_diesel_error, map_todo_pool_error};
use super::models::{NewTodoRow, TodoRow};
use super::pool::DbPool;
use super::schema::todos;

/// Diesel-backed implementation of the [`TodoRepository`] port.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
}

impl DieselTodoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_todo(row: TodoRow) -> Result<Todo, TodoPersistenceError> {
    Todo::try_from(row).map_err(|message| {
        warn!(%message, "stored todo failed validation");
        TodoPersistenceError::query(message)
    })
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_todo_pool_error)?;
        let row = NewTodoRow {
            title: todo.title.as_ref(),
            status: TodoStatus::Incomplete.as_str(),
            user_id: todo.owner_id.get(),
        };

        let stored: TodoRow = diesel::insert_into(todos::table)
            .values(&row)
            .returning(TodoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_todo_diesel_error)?;
        row_to_todo(stored)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_todo_pool_error)?;
        let rows: Vec<TodoRow> = todos::table
            .filter(todos::user_id.eq(owner.get()))
            .select(TodoRow::as_select())
            .order(todos::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_todo_diesel_error)?;

        rows.into_iter().map(row_to_todo).collect()
    }

    async fn mark_complete(
        &self,
        id: TodoId,
        owner: UserId,
    ) -> Result<Option<Todo>, TodoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_todo_pool_error)?;
        let row: Option<TodoRow> = diesel::update(
            todos::table
                .filter(todos::id.eq(id.get()))
                .filter(todos::user_id.eq(owner.get())),
        )
        .set(todos::status.eq(TodoStatus::Complete.as_str()))
        .returning(TodoRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_todo_diesel_error)?;

        row.map(row_to_todo).transpose()
    }
}

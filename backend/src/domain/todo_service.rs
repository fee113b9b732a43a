//! Todo domain service.
//!
//! Implements the todo driving ports. Ownership is enforced by passing the
//! caller's id down to every repository call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{TodoCommand, TodoPersistenceError, TodoQuery, TodoRepository};
use crate::domain::{Error, NewTodo, Todo, TodoId, TodoTitle, UserId};

/// Todo service implementing [`TodoCommand`] and [`TodoQuery`].
#[derive(Clone)]
pub struct TodoService<R: ?Sized> {
    todos: Arc<R>,
}

impl<R: ?Sized> TodoService<R> {
    pub fn new(todos: Arc<R>) -> Self {
        Self { todos }
    }
}

fn map_todo_error(error: TodoPersistenceError) -> Error {
    match error {
        TodoPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("todo repository unavailable: {message}"))
        }
        TodoPersistenceError::Query { message } => {
            Error::internal(format!("todo repository error: {message}"))
        }
        TodoPersistenceError::DuplicateTitle => Error::conflict("todo title already exists")
            .with_details(json!({ "field": "title", "code": "duplicate_title" })),
        // The owner comes from a verified session, so a missing row means the
        // account vanished after the token was issued.
        TodoPersistenceError::UnknownOwner => Error::unauthorized("session user no longer exists"),
    }
}

#[async_trait]
impl<R> TodoCommand for TodoService<R>
where
    R: TodoRepository + ?Sized,
{
    async fn create(&self, owner: UserId, title: TodoTitle) -> Result<Todo, Error> {
        let new_todo = NewTodo {
            title,
            owner_id: owner,
        };
        self.todos.insert(&new_todo).await.map_err(map_todo_error)
    }

    async fn mark_complete(&self, owner: UserId, id: TodoId) -> Result<Todo, Error> {
        self.todos
            .mark_complete(id, owner)
            .await
            .map_err(map_todo_error)?
            .ok_or_else(|| Error::not_found(format!("todo {id} not found")))
    }
}

#[async_trait]
impl<R> TodoQuery for TodoService<R>
where
    R: TodoRepository + ?Sized,
{
    async fn list_todos(&self, owner: UserId) -> Result<Vec<Todo>, Error> {
        self.todos.list_by_owner(owner).await.map_err(map_todo_error)
    }
}

//! Port for todo persistence.
//!
//! Every read and mutation is scoped by owner. Adapters must apply the owner
//! filter inside the same statement that touches the row so a caller can never
//! observe or change another user's todo.

use async_trait::async_trait;

use crate::domain::{NewTodo, Todo, TodoId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by todo repository adapters.
    pub enum TodoPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "todo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "todo repository query failed: {message}",
        /// Another todo already uses the title.
        DuplicateTitle => "todo title already exists",
        /// The owning user does not exist.
        UnknownOwner => "todo owner does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a todo with status `incomplete`.
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, TodoPersistenceError>;

    /// Todos owned by `owner`, ordered by id.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoPersistenceError>;

    /// Mark `id` complete when it belongs to `owner`.
    ///
    /// Returns `Ok(None)` when no todo matches both the id and the owner; the
    /// two cases are deliberately indistinguishable.
    async fn mark_complete(
        &self,
        id: TodoId,
        owner: UserId,
    ) -> Result<Option<Todo>, TodoPersistenceError>;
}

//! Driving port for todo mutations.

use async_trait::async_trait;

use crate::domain::{Error, Todo, TodoId, TodoTitle, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoCommand: Send + Sync {
    /// Create a todo owned by `owner`.
    async fn create(&self, owner: UserId, title: TodoTitle) -> Result<Todo, Error>;

    /// Mark the caller's todo complete.
    ///
    /// A todo owned by someone else is reported as not found.
    async fn mark_complete(&self, owner: UserId, id: TodoId) -> Result<Todo, Error>;
}

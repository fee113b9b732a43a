//! Driving port for todo reads.

use async_trait::async_trait;

use crate::domain::{Error, Todo, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoQuery: Send + Sync {
    /// Todos owned by `owner`, ordered by id.
    async fn list_todos(&self, owner: UserId) -> Result<Vec<Todo>, Error>;
}

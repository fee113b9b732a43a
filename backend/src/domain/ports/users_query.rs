//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, User, UserName};

/// Domain use-case port for reading users.
///
/// Every registered user is visible to every authenticated caller, so the
/// queries take no caller identity. Authentication is enforced at the edge.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return every registered user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Look a user up by name.
    async fn find_by_name(&self, name: &UserName) -> Result<User, Error>;
}

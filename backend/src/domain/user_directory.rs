//! Read-only user lookups backed by the user repository.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account_service::map_user_persistence_error;
use crate::domain::ports::{UserRepository, UsersQuery};
use crate::domain::{Error, User, UserName};

/// Implements [`UsersQuery`] for authenticated callers.
#[derive(Clone)]
pub struct UserDirectory<U: ?Sized> {
    users: Arc<U>,
}

impl<U: ?Sized> UserDirectory<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> UsersQuery for UserDirectory<U>
where
    U: UserRepository + ?Sized,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users
            .list_all()
            .await
            .map_err(map_user_persistence_error)
    }

    async fn find_by_name(&self, name: &UserName) -> Result<User, Error> {
        self.users
            .find_by_name(name)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {name} not found")))
    }
}

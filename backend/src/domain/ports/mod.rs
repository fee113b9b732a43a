//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`SessionTokens`]) are
//! implemented by outbound adapters. Driving ports ([`AccountService`],
//! [`UsersQuery`], [`TodoCommand`], [`TodoQuery`]) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod password_hasher;
mod session_tokens;
mod todo_command;
mod todo_query;
mod todo_repository;
mod user_repository;
mod users_query;

pub use account_service::AccountService;
#[cfg(test)]
pub use account_service::MockAccountService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::{SessionTokenError, SessionTokens};
#[cfg(test)]
pub use todo_command::MockTodoCommand;
pub use todo_command::TodoCommand;
#[cfg(test)]
pub use todo_query::MockTodoQuery;
pub use todo_query::TodoQuery;
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{TodoPersistenceError, TodoRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

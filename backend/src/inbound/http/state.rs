//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, TodoCommand, TodoQuery, UsersQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountService>,
    pub users: Arc<dyn UsersQuery>,
    pub todos: Arc<dyn TodoCommand>,
    pub todos_query: Arc<dyn TodoQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub users: Arc<dyn UsersQuery>,
    pub todos: Arc<dyn TodoCommand>,
    pub todos_query: Arc<dyn TodoQuery>,
    /// Whether the `jwt` cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// # fn ports(
    /// #     accounts: Arc<dyn todo_backend::domain::ports::AccountService>,
    /// #     users: Arc<dyn todo_backend::domain::ports::UsersQuery>,
    /// #     todos: Arc<dyn todo_backend::domain::ports::TodoCommand>,
    /// #     todos_query: Arc<dyn todo_backend::domain::ports::TodoQuery>,
    /// # ) {
    /// let state = HttpState::new(
    ///     HttpStatePorts { accounts, users, todos, todos_query },
    ///     true,
    /// );
    /// assert!(state.cookie_secure);
    /// # }
    /// ```
    pub fn new(ports: HttpStatePorts, cookie_secure: bool) -> Self {
        let HttpStatePorts {
            accounts,
            users,
            todos,
            todos_query,
        } = ports;
        Self {
            accounts,
            users,
            todos,
            todos_query,
            cookie_secure,
        }
    }
}

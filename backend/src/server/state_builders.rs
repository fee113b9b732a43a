//! Builders for HTTP state ports and the session token codec.

use std::sync::Arc;

use actix_web::web;

use todo_backend::domain::ports::{
    AccountService, PasswordHasher, SessionTokens, TodoCommand, TodoQuery, TodoRepository,
    UserRepository, UsersQuery,
};
use todo_backend::domain::{CredentialAccountService, TodoService, UserDirectory};
use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
use todo_backend::outbound::persistence::{DbPool, DieselTodoRepository, DieselUserRepository};
use todo_backend::outbound::security::{Argon2PasswordHasher, JwtSessionTokens};

use super::ServerConfig;

/// Shared state handed to every worker.
#[derive(Clone)]
pub(super) struct AppPorts {
    pub(super) http_state: web::Data<HttpState>,
    pub(super) session_tokens: Arc<dyn SessionTokens>,
}

/// Build a command/query pair backed by one service instance.
fn build_todo_pair<R>(todos: Arc<R>) -> (Arc<dyn TodoCommand>, Arc<dyn TodoQuery>)
where
    R: TodoRepository + ?Sized + 'static,
{
    let service = Arc::new(TodoService::new(todos));
    (
        service.clone() as Arc<dyn TodoCommand>,
        service as Arc<dyn TodoQuery>,
    )
}

/// Build the account service and user directory over one user repository.
fn build_account_pair<U>(
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn SessionTokens>,
) -> (Arc<dyn AccountService>, Arc<dyn UsersQuery>)
where
    U: UserRepository + ?Sized + 'static,
{
    let accounts = Arc::new(CredentialAccountService::new(users.clone(), hasher, tokens));
    let directory = Arc::new(UserDirectory::new(users));
    (
        accounts as Arc<dyn AccountService>,
        directory as Arc<dyn UsersQuery>,
    )
}

/// Wire driving ports over the given driven ports.
fn build_ports_with<U, R>(
    users: Arc<U>,
    todos: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn SessionTokens>,
    cookie_secure: bool,
) -> AppPorts
where
    U: UserRepository + ?Sized + 'static,
    R: TodoRepository + ?Sized + 'static,
{
    let (accounts, users) = build_account_pair(users, hasher, tokens.clone());
    let (todos, todos_query) = build_todo_pair(todos);

    AppPorts {
        http_state: web::Data::new(HttpState::new(
            HttpStatePorts {
                accounts,
                users,
                todos,
                todos_query,
            },
            cookie_secure,
        )),
        session_tokens: tokens,
    }
}

/// Build the shared state from the configured pool and secret.
pub(super) fn build_app_ports(config: &ServerConfig, pool: &DbPool) -> AppPorts {
    let tokens: Arc<dyn SessionTokens> = Arc::new(JwtSessionTokens::new(
        &config.jwt_secret,
        Arc::new(mockable::DefaultClock),
    ));
    build_ports_with(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselTodoRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::default()),
        tokens,
        config.cookie_secure,
    )
}

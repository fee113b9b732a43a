//! In-memory adapters and app assembly for end-to-end HTTP tests.
//!
//! The repositories mirror the database constraints: unique email, name and
//! todo title, and todos must reference an existing user.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use argon2::Params;
use async_trait::async_trait;
use zeroize::Zeroizing;

use todo_backend::Trace;
use todo_backend::domain::ports::{
    SessionTokens, TodoPersistenceError, TodoRepository, UserPersistenceError, UserRepository,
};
use todo_backend::domain::{
    CredentialAccountService, Email, NewTodo, NewUser, Todo, TodoId, TodoService, TodoStatus,
    User, UserAccount, UserDirectory, UserId, UserName,
};
use todo_backend::inbound::http::routes;
use todo_backend::inbound::http::session::SESSION_COOKIE_NAME;
use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
use todo_backend::middleware::{
    CatchPanic, RateLimit, RateLimitConfig, RequestTimeout, SessionIdentity,
};
use todo_backend::outbound::security::{Argon2PasswordHasher, JwtSessionTokens};

const TEST_SECRET: &[u8] = b"integration-secret-integration-secret";

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// User store keyed by insertion order.
#[derive(Default)]
pub struct InMemoryUsers {
    accounts: Mutex<Vec<UserAccount>>,
}

impl InMemoryUsers {
    fn exists(&self, id: UserId) -> bool {
        guard(&self.accounts)
            .iter()
            .any(|account| account.user.id() == id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut accounts = guard(&self.accounts);
        if accounts.iter().any(|a| a.user.email() == &user.email) {
            return Err(UserPersistenceError::DuplicateEmail);
        }
        if accounts.iter().any(|a| a.user.name() == &user.name) {
            return Err(UserPersistenceError::DuplicateName);
        }
        let next = i32::try_from(accounts.len() + 1)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let id = UserId::new(next).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let stored = User::new(id, user.name.clone(), user.email.clone(), user.age);
        accounts.push(UserAccount {
            user: stored.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(stored)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(guard(&self.accounts)
            .iter()
            .find(|account| account.user.email() == email)
            .cloned())
    }

    async fn find_by_name(&self, name: &UserName) -> Result<Option<User>, UserPersistenceError> {
        Ok(guard(&self.accounts)
            .iter()
            .find(|account| account.user.name() == name)
            .map(|account| account.user.clone()))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(guard(&self.accounts)
            .iter()
            .map(|account| account.user.clone())
            .collect())
    }
}

/// Todo store that checks owners against [`InMemoryUsers`].
pub struct InMemoryTodos {
    users: Arc<InMemoryUsers>,
    rows: Mutex<Vec<Todo>>,
}

impl InMemoryTodos {
    pub fn new(users: Arc<InMemoryUsers>) -> Self {
        Self {
            users,
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodos {
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, TodoPersistenceError> {
        if !self.users.exists(todo.owner_id) {
            return Err(TodoPersistenceError::UnknownOwner);
        }
        let mut rows = guard(&self.rows);
        if rows.iter().any(|row| row.title() == &todo.title) {
            return Err(TodoPersistenceError::DuplicateTitle);
        }
        let next = i32::try_from(rows.len() + 1)
            .map_err(|err| TodoPersistenceError::query(err.to_string()))?;
        let id = TodoId::new(next).map_err(|err| TodoPersistenceError::query(err.to_string()))?;
        let stored = Todo::new(id, todo.title.clone(), TodoStatus::Incomplete, todo.owner_id);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Todo>, TodoPersistenceError> {
        Ok(guard(&self.rows)
            .iter()
            .filter(|row| row.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn mark_complete(
        &self,
        id: TodoId,
        owner: UserId,
    ) -> Result<Option<Todo>, TodoPersistenceError> {
        let mut rows = guard(&self.rows);
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.id() == id && row.is_owned_by(owner))
        else {
            return Ok(None);
        };
        *row = Todo::new(row.id(), row.title().clone(), TodoStatus::Complete, owner);
        Ok(Some(row.clone()))
    }
}

/// Everything one app instance shares across requests.
#[derive(Clone)]
pub struct Harness {
    state: web::Data<HttpState>,
    tokens: Arc<dyn SessionTokens>,
    rate_limit: RateLimit,
}

impl Default for Harness {
    /// Harness with generous rate limits.
    fn default() -> Self {
        Self::with_rate_limit(RateLimitConfig {
            global_limit: 10_000,
            auth_limit: 10_000,
            ..RateLimitConfig::default()
        })
    }
}

impl Harness {
    pub fn with_rate_limit(config: RateLimitConfig) -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let todos = Arc::new(InMemoryTodos::new(users.clone()));
        let params = Params::new(Params::MIN_M_COST, 1, 1, None)
            .unwrap_or_else(|err| panic!("argon2 params: {err}"));
        let hasher = Arc::new(Argon2PasswordHasher::with_params(params));
        let tokens: Arc<dyn SessionTokens> = Arc::new(JwtSessionTokens::new(
            &Zeroizing::new(TEST_SECRET.to_vec()),
            Arc::new(mockable::DefaultClock),
        ));
        let todo_service = Arc::new(TodoService::new(todos));

        let state = HttpState::new(
            HttpStatePorts {
                accounts: Arc::new(CredentialAccountService::new(
                    users.clone(),
                    hasher,
                    tokens.clone(),
                )),
                users: Arc::new(UserDirectory::new(users)),
                todos: todo_service.clone(),
                todos_query: todo_service,
            },
            false,
        );

        Self {
            state: web::Data::new(state),
            tokens,
            rate_limit: RateLimit::new(config),
        }
    }

    /// Assemble the app with the production middleware order.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(SessionIdentity::new(self.tokens.clone()))
            .wrap(self.rate_limit.clone())
            .wrap(RequestTimeout::new(std::time::Duration::from_secs(30)))
            .wrap(CatchPanic)
            .wrap(Trace)
            .configure(routes::configure)
    }
}

/// Extract the `jwt` cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

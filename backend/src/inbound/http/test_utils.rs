//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, HttpMessage, web};
use chrono::{TimeZone, Utc};

use crate::domain::ports::{MockAccountService, MockTodoCommand, MockTodoQuery, MockUsersQuery};
use crate::domain::{Age, Email, SessionClaims, User, UserId, UserName};

use super::identity::Identity;
use super::routes;
use super::state::{HttpState, HttpStatePorts};

/// Mocked driving ports. Unset expectations panic when called.
pub struct MockPorts {
    pub accounts: MockAccountService,
    pub users: MockUsersQuery,
    pub todos: MockTodoCommand,
    pub todos_query: MockTodoQuery,
}

impl MockPorts {
    pub fn new() -> Self {
        Self {
            accounts: MockAccountService::new(),
            users: MockUsersQuery::new(),
            todos: MockTodoCommand::new(),
            todos_query: MockTodoQuery::new(),
        }
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            accounts: Arc::new(self.accounts),
            users: Arc::new(self.users),
            todos: Arc::new(self.todos),
            todos_query: Arc::new(self.todos_query),
        };
        web::Data::new(HttpState::new(ports, false))
    }
}

/// Build a valid user for handler tests.
pub fn sample_user(id: i32, name: &str) -> User {
    User::new(
        UserId::new(id).expect("valid id"),
        UserName::new(name).expect("valid name"),
        Email::new(format!("{name}@example.com")).expect("valid email"),
        Age::new(30).expect("valid age"),
    )
}

/// Identity the session middleware would attach for `user`.
pub fn identity_for(user: &User) -> Identity {
    let now = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    Identity::from(SessionClaims::for_user(user, now))
}

/// Attach an identity to a test request, bypassing cookie verification.
pub fn authenticated<R: HttpMessage>(req: R, user: &User) -> R {
    req.extensions_mut().insert(identity_for(user));
    req
}

/// App wired with the production route table and the given state.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(routes::configure)
}

//! Account and user directory handlers.
//!
//! ```text
//! POST /register {"email":"ada@example.com","password":"pw","name":"ada","age":36}
//! POST /login    {"email":"ada@example.com","password":"pw"}
//! POST /logout
//! GET  /users
//! GET  /users/{name}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    CredentialsValidationError, LoginCredentials, Registration, SessionGrant, User, UserName,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::{cleared_session_cookie, session_cookie};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{credentials_validation_error, user_validation_error};

/// Registration request body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = 36)]
    pub age: i32,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = CredentialsValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password, &value.name, value.age)
    }
}

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Acknowledgement body shared by endpoints without a resource payload.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn session_started(grant: &SessionGrant, secure: bool, message: &str) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(session_cookie(&grant.token, secure))
        .json(MessageResponse::new(message))
}

/// Create an account and start a session for it.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse,
            headers(("Set-Cookie" = String, description = "`jwt` session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email or name already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(credentials_validation_error)?;
    let grant = state.accounts.register(&registration).await?;
    info!(user_id = %grant.user.id(), "user registered");
    Ok(session_started(
        &grant,
        state.cookie_secure,
        "User registered successfully",
    ))
}

/// Authenticate with email and password and start a session.
///
/// Unknown emails and wrong passwords are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = MessageResponse,
            headers(("Set-Cookie" = String, description = "`jwt` session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(credentials_validation_error)?;
    let grant = state.accounts.login(&credentials).await?;
    info!(user_id = %grant.user.id(), "user logged in");
    Ok(session_started(
        &grant,
        state.cookie_secure,
        "User logged in successfully",
    ))
}

/// Clear the session cookie. Succeeds whether or not a session exists.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session cleared", body = MessageResponse,
            headers(("Set-Cookie" = String, description = "Expired `jwt` cookie")))
    ),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cleared_session_cookie(state.cookie_secure))
        .json(MessageResponse::new("User logged out successfully"))
}

/// List every registered user. Requires a session.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use todo_backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _identity: Identity,
) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

/// Look up a single user by exact name. Requires a session.
#[utoipa::path(
    get,
    path = "/users/{name}",
    params(("name" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserByName"
)]
#[get("/users/{name}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _identity: Identity,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let name = UserName::new(path.into_inner()).map_err(user_validation_error)?;
    let user = state.users.find_by_name(&name).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

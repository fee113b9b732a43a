//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: account, user directory, todo and health endpoints
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`ErrorCodeSchema`],
//!   [`UserSchema`], [`TodoSchema`], [`TodoStatusSchema`]) that provide OpenAPI
//!   definitions without coupling domain types to the utoipa framework
//! - **Security**: the `jwt` session cookie
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, TodoSchema, TodoStatusSchema, UserSchema,
};
use crate::inbound::http::todos::CreateTodoRequest;
use crate::inbound::http::users::{LoginRequest, MessageResponse, RegisterRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "jwt",
                "Signed session token issued by POST /register and POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Todo backend API",
        description = "Multi-user todo lists behind cookie-borne session tokens."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::complete_todo,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        TodoSchema,
        TodoStatusSchema,
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        CreateTodoRequest,
        MessageResponse
    )),
    tags(
        (name = "users", description = "Registration, login and the user directory"),
        (name = "todos", description = "Todo items owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

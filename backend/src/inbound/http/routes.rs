//! Route table for the HTTP adapter.
//!
//! ```text
//! POST /register              public
//! POST /login                 public
//! POST /logout                public
//! GET  /users                 session
//! GET  /users/{name}          session
//! POST /todos                 session
//! GET  /todos                 session
//! POST /todos/{id}/complete   session
//! ```
//!
//! Extractor failures are routed through the shared error handlers so every
//! rejection uses the API error schema.

use actix_web::web;

use super::error::{json_error_handler, path_error_handler};
use super::{todos, users};

/// Register API handlers and extractor configuration.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use todo_backend::inbound::http::routes::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::list_users)
        .service(users::get_user)
        .service(todos::create_todo)
        .service(todos::list_todos)
        .service(todos::complete_todo);
}

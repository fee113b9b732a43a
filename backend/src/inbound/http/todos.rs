//! Todo handlers. Every route requires a session and is scoped to its owner.
//!
//! ```text
//! POST /todos {"title":"buy milk"}
//! GET  /todos
//! POST /todos/{id}/complete
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Error, Todo, TodoId, TodoTitle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::schemas::{ErrorSchema, TodoSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::MessageResponse;
use crate::inbound::http::validation::todo_validation_error;

/// Request body for `POST /todos`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[schema(example = "buy milk")]
    pub title: String,
}

/// Create a todo owned by the caller.
#[utoipa::path(
    post,
    path = "/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 200, description = "Created todo", body = TodoSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Title already used", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<CreateTodoRequest>,
) -> ApiResult<web::Json<Todo>> {
    let title = TodoTitle::new(payload.into_inner().title).map_err(todo_validation_error)?;
    let todo = state.todos.create(identity.user_id(), title).await?;
    info!(todo_id = %todo.id(), user_id = %identity.user_id(), "todo created");
    Ok(web::Json(todo))
}

/// List the caller's todos in creation order.
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 200, description = "Caller's todos", body = [TodoSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "listTodos"
)]
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<Todo>>> {
    let todos = state.todos_query.list_todos(identity.user_id()).await?;
    Ok(web::Json(todos))
}

/// Mark one of the caller's todos as complete.
///
/// Todos owned by someone else are reported as missing.
#[utoipa::path(
    post,
    path = "/todos/{id}/complete",
    params(("id" = i32, Path, description = "Todo identifier")),
    responses(
        (status = 200, description = "Todo completed", body = MessageResponse),
        (status = 400, description = "Non-numeric identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "completeTodo"
)]
#[post("/todos/{id}/complete")]
pub async fn complete_todo(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    // Non-positive ids cannot exist.
    let id = TodoId::new(raw).map_err(|_| Error::not_found(format!("todo {raw} not found")))?;
    state.todos.mark_complete(identity.user_id(), id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Todo marked as complete")))
}

#[cfg(test)]
#[path = "todos_tests.rs"]
mod tests;

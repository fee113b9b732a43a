//! Tests for todo HTTP handlers.

use super::*;
use crate::domain::{TodoStatus, UserId};
use crate::inbound::http::test_utils::{MockPorts, authenticated, sample_user, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn todo(id: i32, title: &str, status: TodoStatus, owner: i32) -> Todo {
    Todo::new(
        TodoId::new(id).expect("valid id"),
        TodoTitle::new(title).expect("valid title"),
        status,
        UserId::new(owner).expect("valid owner"),
    )
}

#[rstest]
#[case(actix_test::TestRequest::post().uri("/todos").set_json(json!({"title": "x"})))]
#[case(actix_test::TestRequest::get().uri("/todos"))]
#[case(actix_test::TestRequest::post().uri("/todos/1/complete"))]
#[actix_web::test]
async fn todo_routes_require_identity(#[case] req: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(MockPorts::new().into_state())).await;
    let res = actix_test::call_service(&app, req.to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn create_todo_returns_created_item() {
    let caller = sample_user(1, "ada");
    let mut ports = MockPorts::new();
    ports
        .todos
        .expect_create()
        .withf(|owner, title| owner.get() == 1 && title.as_ref() == "buy milk")
        .times(1)
        .returning(|owner, title| {
            Ok(Todo::new(
                TodoId::new(7).expect("valid id"),
                title,
                TodoStatus::Incomplete,
                owner,
            ))
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let req = authenticated(
        actix_test::TestRequest::post()
            .uri("/todos")
            .set_json(json!({"title": "  buy milk  "}))
            .to_request(),
        &caller,
    );
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"id": 7, "title": "buy milk", "status": "incomplete", "ownerId": 1})
    );
}

#[rstest]
#[case(json!({"title": ""}), StatusCode::BAD_REQUEST)]
#[case(json!({"title": "   "}), StatusCode::BAD_REQUEST)]
#[case(json!({}), StatusCode::BAD_REQUEST)]
#[case(json!({"title": 5}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn create_todo_rejects_bad_titles(#[case] payload: Value, #[case] status: StatusCode) {
    let caller = sample_user(1, "ada");
    let app = actix_test::init_service(test_app(MockPorts::new().into_state())).await;
    let req = authenticated(
        actix_test::TestRequest::post()
            .uri("/todos")
            .set_json(payload)
            .to_request(),
        &caller,
    );
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), status);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn create_todo_conflict_is_409() {
    let caller = sample_user(1, "ada");
    let mut ports = MockPorts::new();
    ports
        .todos
        .expect_create()
        .returning(|_, _| Err(Error::conflict("title already used")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let req = authenticated(
        actix_test::TestRequest::post()
            .uri("/todos")
            .set_json(json!({"title": "taken"}))
            .to_request(),
        &caller,
    );
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn list_todos_is_scoped_to_caller() {
    let caller = sample_user(2, "grace");
    let mut ports = MockPorts::new();
    ports
        .todos_query
        .expect_list_todos()
        .withf(|owner| owner.get() == 2)
        .returning(|owner| {
            Ok(vec![
                todo(3, "walk dog", TodoStatus::Incomplete, owner.get()),
                todo(5, "file taxes", TodoStatus::Complete, owner.get()),
            ])
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let req = authenticated(
        actix_test::TestRequest::get().uri("/todos").to_request(),
        &caller,
    );
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let statuses: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|item| item["status"].as_str())
        .collect();
    assert_eq!(statuses, ["incomplete", "complete"]);
}

#[actix_web::test]
async fn complete_todo_confirms() {
    let caller = sample_user(1, "ada");
    let mut ports = MockPorts::new();
    ports
        .todos
        .expect_mark_complete()
        .withf(|owner, id| owner.get() == 1 && id.get() == 7)
        .times(1)
        .returning(|owner, id| Ok(todo(id.get(), "buy milk", TodoStatus::Complete, owner.get())));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let req = authenticated(
        actix_test::TestRequest::post()
            .uri("/todos/7/complete")
            .to_request(),
        &caller,
    );
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"message": "Todo marked as complete"}));
}

#[actix_web::test]
async fn complete_foreign_todo_is_not_found() {
    let caller = sample_user(1, "ada");
    let mut ports = MockPorts::new();
    ports
        .todos
        .expect_mark_complete()
        .returning(|_, id| Err(Error::not_found(format!("todo {id} not found"))));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let req = authenticated(
        actix_test::TestRequest::post()
            .uri("/todos/9/complete")
            .to_request(),
        &caller,
    );
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/todos/abc/complete", StatusCode::BAD_REQUEST)]
#[case("/todos/0/complete", StatusCode::NOT_FOUND)]
#[case("/todos/-4/complete", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn complete_todo_checks_identifier(#[case] uri: &str, #[case] status: StatusCode) {
    let caller = sample_user(1, "ada");
    let app = actix_test::init_service(test_app(MockPorts::new().into_state())).await;
    let req = authenticated(
        actix_test::TestRequest::post().uri(uri).to_request(),
        &caller,
    );
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), status);
}

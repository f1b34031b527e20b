use super::test_util::prepare_db_and_test;
use crate::api::test_util::{body_text, deserialize_body};
use crate::{SharedData, dto, persistence, routes};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

fn app(db: PgPool) -> Router {
    routes::build_router(Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db),
    }))
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json_body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request should build");

    router
        .clone()
        .oneshot(request)
        .await
        .expect("router should always produce a response")
}

async fn create(router: &Router, title: &str, text: &str) -> dto::Todo {
    let response = send(
        router,
        Method::POST,
        "/todos",
        Some(json!({ "title": title, "text": text })),
    )
    .await;
    assert_eq!(StatusCode::CREATED, response.status());

    deserialize_body(response.into_body()).await
}

async fn count(router: &Router) -> usize {
    let response = send(router, Method::GET, "/todos", None).await;
    assert_eq!(StatusCode::OK, response.status());

    let todos: Vec<dto::Todo> = deserialize_body(response.into_body()).await;
    todos.len()
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn todo_lifecycle() {
    prepare_db_and_test(|db| async move {
        let router = app(db);

        let create_response = send(
            &router,
            Method::POST,
            "/todos",
            Some(json!({ "title": "todo_title", "text": "todo_text" })),
        )
        .await;
        assert_eq!(StatusCode::CREATED, create_response.status());
        let create_body = body_text(create_response.into_body()).await;
        let created: dto::Todo =
            serde_json::from_str(&create_body).expect("create response should be a todo");
        assert_eq!("todo_title", created.title);
        assert_eq!("todo_text", created.text);
        assert!(!create_body.contains("updated_at"));

        let uri = format!("/todos/{}", created.id);
        let show_response = send(&router, Method::GET, &uri, None).await;
        assert_eq!(StatusCode::OK, show_response.status());
        assert_eq!(create_body, body_text(show_response.into_body()).await);

        assert_eq!(1, count(&router).await);

        let update_response = send(
            &router,
            Method::PATCH,
            &uri,
            Some(json!({ "title": "new_title", "text": "new_text" })),
        )
        .await;
        assert_eq!(StatusCode::OK, update_response.status());
        let updated: dto::Todo = deserialize_body(update_response.into_body()).await;
        assert_eq!(created.id, updated.id);
        assert_eq!("new_title", updated.title);
        assert_eq!("new_text", updated.text);
        assert_eq!(created.created_at, updated.created_at);

        let delete_response = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(StatusCode::OK, delete_response.status());
        let deleted: dto::Todo = deserialize_body(delete_response.into_body()).await;
        assert_eq!(updated, deleted);

        let gone_response = send(&router, Method::GET, &uri, None).await;
        assert_eq!(StatusCode::NOT_FOUND, gone_response.status());
        assert_eq!(0, count(&router).await);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn create_increases_count_by_one() {
    prepare_db_and_test(|db| async move {
        let router = app(db);
        create(&router, "title1", "text1").await;
        let before = count(&router).await;

        create(&router, "title2", "text2").await;

        assert_eq!(before + 1, count(&router).await);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn list_is_oldest_first() {
    prepare_db_and_test(|db| async move {
        let router = app(db);
        let first = create(&router, "title1", "text1").await;
        let second = create(&router, "title2", "text2").await;
        let third = create(&router, "title3", "text3").await;

        let response = send(&router, Method::GET, "/todos", None).await;
        let todos: Vec<dto::Todo> = deserialize_body(response.into_body()).await;

        assert_eq!(vec![first, second, third], todos);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn partial_update_keeps_other_field() {
    prepare_db_and_test(|db| async move {
        let router = app(db);
        let created = create(&router, "todo_title", "todo_text").await;

        let response = send(
            &router,
            Method::PATCH,
            &format!("/todos/{}", created.id),
            Some(json!({ "text": "new_text" })),
        )
        .await;
        assert_eq!(StatusCode::OK, response.status());

        let updated: dto::Todo = deserialize_body(response.into_body()).await;
        assert_eq!("todo_title", updated.title);
        assert_eq!("new_text", updated.text);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn rejects_empty_fields_without_storing() {
    prepare_db_and_test(|db| async move {
        let router = app(db);

        let response = send(
            &router,
            Method::POST,
            "/todos",
            Some(json!({ "title": "", "text": "todo_text" })),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        let body: Value = deserialize_body(response.into_body()).await;
        assert_eq!("invalid_input", body["error_code"]);

        let response = send(
            &router,
            Method::POST,
            "/todos",
            Some(json!({ "title": "todo_title" })),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());

        let response = send(
            &router,
            Method::POST,
            "/todos",
            Some(json!({ "title": "   ", "text": "\n\t" })),
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status());

        assert_eq!(0, count(&router).await);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn rejects_malformed_json() {
    prepare_db_and_test(|db| async move {
        let router = app(db);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/todos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title": "todo_title","#))
            .expect("request should build");

        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router should always produce a response");
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        let body: Value = deserialize_body(response.into_body()).await;
        assert_eq!("invalid_json", body["error_code"]);

        assert_eq!(0, count(&router).await);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn unknown_ids_are_not_found() {
    prepare_db_and_test(|db| async move {
        let router = app(db);
        let missing = format!("/todos/{}", uuid::Uuid::new_v4());

        for method in [Method::GET, Method::DELETE] {
            let response = send(&router, method, &missing, None).await;
            assert_eq!(StatusCode::NOT_FOUND, response.status());
        }
        let response = send(
            &router,
            Method::PATCH,
            &missing,
            Some(json!({ "title": "new_title" })),
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());

        let response = send(&router, Method::GET, "/todos/not-a-uuid", None).await;
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        let body: Value = deserialize_body(response.into_body()).await;
        assert_eq!("not_found", body["error_code"]);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn serves_openapi_document() {
    prepare_db_and_test(|db| async move {
        let router = app(db);

        let response = send(&router, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(StatusCode::OK, response.status());
        let docs: Value = deserialize_body(response.into_body()).await;
        assert!(docs["paths"]["/todos/{todo_id}"].is_object());
    });
}

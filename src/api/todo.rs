use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoPort;
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    BasicErrorResponse, DomainErrorResponse, ExtraInfo, Json, Path, ValidationErrorSchema,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::get;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use uuid::Uuid;

#[derive(OpenApi)]
#[openapi(
    paths(list_todos, create_todo, get_todo, update_todo, delete_todo),
    components(
        schemas(ExtraInfo, ValidationErrorSchema),
        responses(BasicErrorResponse),
    ),
)]
/// Defines the OpenAPI documentation for the todo API
pub struct TodoApi;

/// Builds a router for all the todo routes, meant to be nested under "/todos"
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService;
                let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

                list_todos(&mut ext_cxn, &todo_service, &todo_reader).await
            })
            .post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    create_todo(new_todo, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
        .route(
            "/:todo_id",
            get(
                |State(app_state): AppState, Path(todo_id): Path<Uuid>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;
                    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

                    get_todo(todo_id, &mut ext_cxn, &todo_service, &todo_reader).await
                },
            )
            .patch(
                |State(app_state): AppState,
                 Path(todo_id): Path<Uuid>,
                 Json(update): Json<dto::UpdateTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    update_todo(todo_id, update, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(todo_id): Path<Uuid>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;
                    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

                    delete_todo(todo_id, &mut ext_cxn, &todo_service, &todo_writer).await
                },
            ),
        )
}

/// Logs a failed todo operation. Communication failures are errors, anything else is info.
fn log_failure(action: &str, err: &domain::Error) {
    match err {
        domain::Error::RetrieveFailure { .. } => error!("Failed to {action}: {err}"),
        _ => info!("Could not {action}: {err}"),
    }
}

#[utoipa::path(
    get,
    path = "/todos",
    tag = "Todos",
    responses(
        (status = 200, description = "Every todo, oldest first", body = [dto::Todo]),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves every todo
async fn list_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
) -> Result<Json<Vec<dto::Todo>>, ErrorResponse> {
    info!("Requested todos");
    let todos = todo_service
        .list_todos(&mut *ext_cxn, todo_reader)
        .await
        .inspect_err(|err| log_failure("list todos", err))
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(todos.into_iter().map(dto::Todo::from).collect()))
}

#[utoipa::path(
    post,
    path = "/todos",
    tag = "Todos",
    request_body = dto::NewTodo,
    responses(
        (status = 201, description = "Todo was created", body = dto::Todo),
        (status = 400, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Creates a todo
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<(StatusCode, Json<dto::Todo>), ErrorResponse> {
    info!("Attempt to create todo: {new_todo}");
    let domain_todo = domain::todo::NewTodo::from(new_todo);

    let created = todo_service
        .create_todo(&domain_todo, &mut *ext_cxn, todo_writer)
        .await
        .inspect_err(|err| log_failure("create todo", err))
        .map_err(DomainErrorResponse::from)?;

    Ok((StatusCode::CREATED, Json(dto::Todo::from(created))))
}

#[utoipa::path(
    get,
    path = "/todos/{todo_id}",
    tag = "Todos",
    params(
        ("todo_id" = Uuid, Path, description = "The ID of the todo to fetch"),
    ),
    responses(
        (status = 200, description = "The requested todo", body = dto::Todo),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves a single todo
async fn get_todo(
    todo_id: Uuid,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_reader: &impl TodoReader,
) -> Result<Json<dto::Todo>, ErrorResponse> {
    info!("Get todo {todo_id}");
    let todo = todo_service
        .todo_by_id(todo_id, &mut *ext_cxn, todo_reader)
        .await
        .inspect_err(|err| log_failure(&format!("get todo {todo_id}"), err))
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(dto::Todo::from(todo)))
}

#[utoipa::path(
    patch,
    path = "/todos/{todo_id}",
    tag = "Todos",
    request_body = dto::UpdateTodo,
    params(
        ("todo_id" = Uuid, Path, description = "The ID of the todo to update"),
    ),
    responses(
        (status = 200, description = "The todo after the update", body = dto::Todo),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Updates the title and/or text of a todo
async fn update_todo(
    todo_id: Uuid,
    update: dto::UpdateTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<Json<dto::Todo>, ErrorResponse> {
    info!("Updating todo {todo_id}");
    let domain_update = domain::todo::UpdateTodo::from(update);

    let updated = todo_service
        .update_todo(todo_id, &domain_update, &mut *ext_cxn, todo_writer)
        .await
        .inspect_err(|err| log_failure(&format!("update todo {todo_id}"), err))
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(dto::Todo::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/todos/{todo_id}",
    tag = "Todos",
    params(
        ("todo_id" = Uuid, Path, description = "The ID of the todo to delete"),
    ),
    responses(
        (status = 200, description = "The todo as it was right before deletion", body = dto::Todo),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Deletes a todo
async fn delete_todo(
    todo_id: Uuid,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
    todo_writer: &impl TodoWriter,
) -> Result<Json<dto::Todo>, ErrorResponse> {
    info!("Deleting todo {todo_id}");
    let deleted = todo_service
        .delete_todo(todo_id, &mut *ext_cxn, todo_writer)
        .await
        .inspect_err(|err| log_failure(&format!("delete todo {todo_id}"), err))
        .map_err(DomainErrorResponse::from)?;

    Ok(Json(dto::Todo::from(deleted)))
}

use crate::{SharedData, api, logging};
use axum::Router;
use std::sync::Arc;

/// Assembles every route the service exposes on top of the given shared state
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let router = Router::new()
        .nest("/todos", api::todo::todo_routes())
        .merge(api::swagger_main::build_documentation());

    logging::attach_tracing_http(router).with_state(shared_data)
}

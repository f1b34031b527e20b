use utoipa::OpenApi;

mod todo;

pub use todo::*;

/// Collects the OpenAPI schemas for every DTO so they can be merged into the main API document
#[derive(OpenApi)]
#[openapi(components(schemas(Todo, NewTodo, UpdateTodo)))]
pub struct OpenApiSchemas;

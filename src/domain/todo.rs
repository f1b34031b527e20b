use crate::domain;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::external_connections::ExternalConnectivity;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A persisted todo item
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The content of a todo item that's about to be created. Both fields must contain something
/// other than whitespace.
#[derive(Debug, Validate)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct NewTodo {
    #[validate(custom = "not_blank")]
    pub title: String,
    #[validate(custom = "not_blank")]
    pub text: String,
}

/// A partial change to a todo item. Fields left as [None] keep their current value,
/// fields that are set must not be blank.
#[derive(Debug, Default, Validate)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct UpdateTodo {
    #[validate(custom = "not_blank")]
    pub title: Option<String>,
    #[validate(custom = "not_blank")]
    pub text: Option<String>,
}

/// Rejects empty and whitespace-only strings
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}

pub mod driven_ports {
    use super::*;
    use crate::domain::DrivenPortError;

    pub trait TodoReader {
        /// Fetches every todo, oldest first
        async fn all_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Todo>, anyhow::Error>;
        async fn todo_by_id(
            &self,
            id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;
    }

    /// Writes todo items. Implementations own identity and timestamps: `create_todo` assigns
    /// the id and both timestamps, `update_todo` refreshes `updated_at`.
    pub trait TodoWriter {
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Todo, anyhow::Error>;

        async fn update_todo(
            &self,
            id: Uuid,
            update: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Todo, DrivenPortError>;

        /// Removes a todo, returning what it looked like right before removal
        async fn delete_todo(
            &self,
            id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Todo, DrivenPortError>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait TodoPort {
        async fn list_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<Todo>, domain::Error>;
        async fn todo_by_id(
            &self,
            id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Todo, domain::Error>;
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, domain::Error>;
        async fn update_todo(
            &self,
            id: Uuid,
            update: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, domain::Error>;
        async fn delete_todo(
            &self,
            id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, domain::Error>;
    }
}

pub struct TodoService;

impl driving_ports::TodoPort for TodoService {
    async fn list_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<Todo>, domain::Error> {
        todo_read
            .all_todos(&mut *ext_cxn)
            .await
            .map_err(|err| domain::Error::retrieve_failure("list todos", err))
    }

    async fn todo_by_id(
        &self,
        id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Todo, domain::Error> {
        let todo = todo_read
            .todo_by_id(id, &mut *ext_cxn)
            .await
            .map_err(|err| domain::Error::retrieve_failure("fetch a todo", err))?;

        todo.ok_or(domain::Error::DoesNotExist)
    }

    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, domain::Error> {
        new_todo.validate()?;

        todo_write
            .create_todo(new_todo, &mut *ext_cxn)
            .await
            .map_err(|err| domain::Error::retrieve_failure("create a todo", err))
    }

    async fn update_todo(
        &self,
        id: Uuid,
        update: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, domain::Error> {
        update.validate()?;

        todo_write
            .update_todo(id, update, &mut *ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("update a todo"))
    }

    async fn delete_todo(
        &self,
        id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, domain::Error> {
        todo_write
            .delete_todo(id, &mut *ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("delete a todo"))
    }
}

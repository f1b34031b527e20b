use crate::domain;
use crate::domain::DrivenPortError;
use crate::domain::todo::{NewTodo, Todo, UpdateTodo};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, query_as};
use uuid::Uuid;

#[derive(FromRow)]
struct TodoRow {
    id: Uuid,
    title: String,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for domain::todo::Todo {
    fn from(value: TodoRow) -> Self {
        Todo {
            id: value.id,
            title: value.title,
            text: value.text,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

pub struct DbTodoReader;

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn all_todos(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos: Vec<Todo> = query_as::<_, TodoRow>(
            "SELECT id, title, text, created_at, updated_at FROM todos ORDER BY created_at, id",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all todos")?
        .into_iter()
        .map(Todo::from)
        .collect();

        Ok(todos)
    }

    async fn todo_by_id(
        &self,
        id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo = query_as::<_, TodoRow>(
            "SELECT id, title, text, created_at, updated_at FROM todos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to fetch a todo by ID")?
        .map(Todo::from);

        Ok(todo)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Todo, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let created = query_as::<_, TodoRow>(
            "INSERT INTO todos (id, title, text, created_at, updated_at) VALUES ($1, $2, $3, now(), now()) \
             RETURNING id, title, text, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new_todo.title)
        .bind(&new_todo.text)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(created.into())
    }

    async fn update_todo(
        &self,
        id: Uuid,
        update: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Todo, DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let updated = query_as::<_, TodoRow>(
            "UPDATE todos SET title = COALESCE($2, title), text = COALESCE($3, text), updated_at = now() \
             WHERE id = $1 RETURNING id, title, text, created_at, updated_at",
        )
        .bind(id)
        .bind(update.title.as_deref())
        .bind(update.text.as_deref())
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a todo in the database")?;

        updated.map(Todo::from).ok_or(DrivenPortError::DoesNotExist)
    }

    async fn delete_todo(
        &self,
        id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Todo, DrivenPortError> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let deleted = query_as::<_, TodoRow>(
            "DELETE FROM todos WHERE id = $1 RETURNING id, title, text, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to remove a todo from the database")?;

        deleted.map(Todo::from).ok_or(DrivenPortError::DoesNotExist)
    }
}

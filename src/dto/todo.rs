use crate::domain;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// DTO for a todo returned on the API. Only these four fields are ever exposed, in this order.
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct Todo {
    #[schema(example = "1f0ca7a4-3c52-4b8e-9b1e-5a1d9d1a8f5e")]
    pub id: Uuid,
    #[schema(example = "todo_title")]
    pub title: String,
    #[schema(example = "todo_text")]
    pub text: String,
    #[schema(example = "2018-06-27T10:03:32.123Z")]
    pub created_at: DateTime<Utc>,
}

impl From<domain::todo::Todo> for Todo {
    fn from(value: domain::todo::Todo) -> Self {
        Todo {
            id: value.id,
            title: value.title,
            text: value.text,
            created_at: value.created_at,
        }
    }
}

/// DTO for creating a new todo via the API. Missing fields come through as empty strings
/// so they're reported by validation rather than as a JSON parse failure.
#[derive(Deserialize, Display, ToSchema)]
#[display("{title}")]
#[cfg_attr(test, derive(Serialize))]
pub struct NewTodo {
    #[serde(default)]
    #[schema(example = "todo_title")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "todo_text")]
    pub text: String,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            title: value.title,
            text: value.text,
        }
    }
}

/// DTO for updating a todo via the API. Omitted fields are left unchanged.
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize, Debug))]
pub struct UpdateTodo {
    #[schema(example = "new_title")]
    pub title: Option<String>,
    #[schema(example = "new_text")]
    pub text: Option<String>,
}

impl From<UpdateTodo> for domain::todo::UpdateTodo {
    fn from(value: UpdateTodo) -> Self {
        domain::todo::UpdateTodo {
            title: value.title,
            text: value.text,
        }
    }
}

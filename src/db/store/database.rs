use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{StoreError, StoreResult, TodoStore};
use crate::{
    db::{
        dao::{DaoContext, DaoLayerError, TodoDao},
        entities::todo,
    },
    todos::{Category, Pos, Priority, Status, Todo},
};

pub struct DatabaseTodoStore {
    dao: TodoDao,
}

impl DatabaseTodoStore {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            dao: DaoContext::new(db).todo(),
        }
    }
}

#[async_trait]
impl TodoStore for DatabaseTodoStore {
    fn backend(&self) -> &'static str {
        "database"
    }

    async fn list_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Todo>> {
        self.dao
            .list_by_owner(owner_id)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        self.dao.find_by_id(id).await?.map(to_domain).transpose()
    }

    async fn insert(&self, todo: Todo) -> StoreResult<Todo> {
        let model = self.dao.insert(to_active_model(&todo)).await?;
        to_domain(model)
    }

    async fn replace(&self, todo: Todo) -> StoreResult<Option<Todo>> {
        match self.dao.update(todo.id, to_active_model(&todo)).await {
            Ok(model) => to_domain(model).map(Some),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_owned(&self, id: Uuid, owner_id: &str) -> StoreResult<bool> {
        Ok(self.dao.delete_owned(id, owner_id).await?)
    }
}

fn invalid_row(id: Uuid, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidRow {
        id,
        reason: reason.into(),
    }
}

fn to_domain(model: todo::Model) -> StoreResult<Todo> {
    let id = model.id;
    let priority = Priority::try_from(model.priority.as_str())
        .map_err(|_| invalid_row(id, format!("unknown priority '{}'", model.priority)))?;
    let status = Status::try_from(model.status.as_str())
        .map_err(|_| invalid_row(id, format!("unknown status '{}'", model.status)))?;
    let category = Category::try_from(model.category.as_str())
        .map_err(|_| invalid_row(id, format!("unknown category '{}'", model.category)))?;
    let assignees: Vec<String> = serde_json::from_value(model.assignees)
        .map_err(|err| invalid_row(id, format!("assignees: {err}")))?;
    let pos = model
        .pos
        .filter(|value| !value.is_null())
        .map(serde_json::from_value::<Pos>)
        .transpose()
        .map_err(|err| invalid_row(id, format!("pos: {err}")))?;

    Ok(Todo {
        id,
        owner_id: model.owner_id,
        name: model.name,
        priority,
        deadline: model.deadline.map(|deadline| deadline.with_timezone(&Utc)),
        description: model.description,
        status,
        category,
        assignees,
        pos,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn to_active_model(todo: &Todo) -> todo::ActiveModel {
    todo::ActiveModel {
        id: Set(todo.id),
        owner_id: Set(todo.owner_id.clone()),
        name: Set(todo.name.clone()),
        priority: Set(todo.priority.as_str().to_string()),
        deadline: Set(todo.deadline.map(|deadline| deadline.fixed_offset())),
        description: Set(todo.description.clone()),
        status: Set(todo.status.as_str().to_string()),
        category: Set(todo.category.as_str().to_string()),
        assignees: Set(Value::from(todo.assignees.clone())),
        pos: Set(todo
            .pos
            .map(|pos| json!({ "x": pos.x, "y": pos.y, "z": pos.z }))),
        created_at: Set(todo.created_at.fixed_offset()),
        updated_at: Set(todo.updated_at.fixed_offset()),
    }
}

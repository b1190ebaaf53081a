use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::store::TodoStore,
    error::AppError,
    todos::{
        CreateTodoRequest, ListFilter, Todo, UpdateTodoRequest, apply_update, new_record,
        owner_listing,
    },
};

/// Same message for missing and foreign-owned records.
pub const TODO_NOT_FOUND: &str = "Todo not found";

/// Owner-scoped todo operations. Every method takes the caller id and never
/// reveals whether a record owned by someone else exists.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, owner_id: &str, filter: &ListFilter) -> Result<Vec<Todo>, AppError> {
        let records = self.store.list_by_owner(owner_id).await?;
        Ok(owner_listing(records, owner_id, filter))
    }

    pub async fn get(&self, owner_id: &str, id: Uuid) -> Result<Todo, AppError> {
        self.require_owned(owner_id, id).await
    }

    pub async fn create(
        &self,
        owner_id: &str,
        request: CreateTodoRequest,
    ) -> Result<Todo, AppError> {
        let todo = new_record(owner_id, request, Utc::now());
        let stored = self.store.insert(todo).await?;
        info!(todo_id = %stored.id, owner_id, "todo created");
        Ok(stored)
    }

    pub async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        update: UpdateTodoRequest,
    ) -> Result<Todo, AppError> {
        let existing = self.require_owned(owner_id, id).await?;
        let merged = apply_update(existing, update, Utc::now());
        let stored = self
            .store
            .replace(merged)
            .await?
            .ok_or_else(|| AppError::not_found(TODO_NOT_FOUND))?;
        info!(todo_id = %stored.id, owner_id, "todo updated");
        Ok(stored)
    }

    pub async fn delete(&self, owner_id: &str, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_owned(id, owner_id).await? {
            return Err(AppError::not_found(TODO_NOT_FOUND));
        }
        info!(todo_id = %id, owner_id, "todo deleted");
        Ok(())
    }

    async fn require_owned(&self, owner_id: &str, id: Uuid) -> Result<Todo, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .filter(|todo| todo.is_owned_by(owner_id))
            .ok_or_else(|| AppError::not_found(TODO_NOT_FOUND))
    }
}

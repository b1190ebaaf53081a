use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    model::Todo,
    validation::{CreateTodoRequest, UpdateTodoRequest},
};

/// Builds a fresh record for `owner_id`, filling defaults for omitted fields.
pub fn new_record(owner_id: &str, request: CreateTodoRequest, now: DateTime<Utc>) -> Todo {
    let CreateTodoRequest {
        name,
        priority,
        deadline,
        description,
        status,
        category,
        assignees,
        pos,
    } = request;

    Todo {
        id: Uuid::new_v4(),
        owner_id: owner_id.to_string(),
        name,
        priority,
        deadline,
        description,
        status: status.unwrap_or_default(),
        category: category.unwrap_or_default(),
        assignees: assignees.unwrap_or_default(),
        pos,
        created_at: now,
        updated_at: now,
    }
}

/// Overwrites exactly the fields present in `update`; `id`, `owner_id` and
/// `created_at` are never touched.
pub fn apply_update(mut todo: Todo, update: UpdateTodoRequest, now: DateTime<Utc>) -> Todo {
    let UpdateTodoRequest {
        name,
        priority,
        deadline,
        description,
        status,
        category,
        assignees,
        pos,
    } = update;

    if let Some(name) = name {
        todo.name = name;
    }
    if let Some(priority) = priority {
        todo.priority = priority;
    }
    if let Some(deadline) = deadline {
        todo.deadline = deadline;
    }
    if let Some(description) = description {
        todo.description = description;
    }
    if let Some(status) = status {
        todo.status = status;
    }
    if let Some(category) = category {
        todo.category = category;
    }
    if let Some(assignees) = assignees {
        todo.assignees = assignees;
    }
    if let Some(pos) = pos {
        todo.pos = pos;
    }

    // updated_at never moves backwards, even if the wall clock does.
    todo.updated_at = now.max(todo.updated_at);
    todo
}

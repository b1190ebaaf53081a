use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::Caller,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, TodoService, todo_service::TODO_NOT_FOUND},
    state::AppState,
    todos::{
        CreateTodoRequest, FieldError, FieldErrorCode, FieldErrors, ListFilter, Todo,
        UpdateTodoRequest,
    },
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Todo>> {
    let filter = ListFilter::from_query(&params)
        .map_err(|details| AppError::validation("Invalid query parameters", details))?;
    let todos = todo_service(&state).list(&caller.id, &filter).await?;
    JsonApiResponse::ok(todos)
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Todo> {
    let payload = json_payload(body)?;
    let request = CreateTodoRequest::from_json(&payload).map_err(invalid_body)?;
    let todo = todo_service(&state).create(&caller.id, request).await?;
    JsonApiResponse::with_status(StatusCode::CREATED, todo)
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Todo> {
    let id = parse_todo_id(&id)?;
    let todo = todo_service(&state).get(&caller.id, id).await?;
    JsonApiResponse::ok(todo)
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Todo> {
    let id = parse_todo_id(&id)?;
    let payload = json_payload(body)?;
    let update = UpdateTodoRequest::from_json(&payload).map_err(invalid_body)?;
    let todo = todo_service(&state).update(&caller.id, id, update).await?;
    JsonApiResponse::ok(todo)
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    let id = parse_todo_id(&id)?;
    todo_service(&state).delete(&caller.id, id).await?;
    JsonApiResponse::ok(DeleteResponse { success: true })
}

fn todo_service(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}

// a malformed id can never name a stored record
fn parse_todo_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(TODO_NOT_FOUND))
}

fn json_payload(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(payload)| payload).map_err(|rejection| {
        AppError::validation(
            "Invalid request body",
            vec![FieldError::new(
                "",
                rejection.body_text(),
                FieldErrorCode::InvalidType,
            )],
        )
    })
}

fn invalid_body(details: FieldErrors) -> AppError {
    AppError::validation("Invalid request body", details)
}

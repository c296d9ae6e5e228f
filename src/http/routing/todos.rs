use axum::{extract::{Path, State, rejection::JsonRejection}, routing::{get, patch}, Router, Json};
use axum::http::StatusCode;

use crate::application::todo_service::TodoService;
use crate::domain::todo::{CreateTodo, Todo, TodoId};
use crate::http::types::{ApiError, DeletedResponse};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/api/todos/:id", patch(complete_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, payload: Result<Json<CreateTodo>, JsonRejection>) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(input) = payload?;
    let todo = state.service.create(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn complete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id, "Invalid id")?;
    Ok(Json(state.service.complete(id).await?))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<DeletedResponse>, ApiError> {
    let id = parse_id(&id, "Invalid todo id")?;
    let todos = state.service.delete(id).await?;
    Ok(Json(DeletedResponse { todos, msg: "Todo deleted".into() }))
}

fn parse_id(raw: &str, message: &'static str) -> Result<TodoId, ApiError> {
    raw.parse().map_err(|err| {
        tracing::debug!(id = raw, error = %err, "rejected identifier");
        ApiError::bad_request(message)
    })
}

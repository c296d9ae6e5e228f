use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::todo_service::TodoError;
use crate::domain::todo::Todo;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody { pub error: String }

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub todos: Vec<Todo>,
    pub msg: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        if err.is_client_error() {
            return Self::bad_request(err.to_string());
        }
        match (&err, err.cause()) {
            (TodoError::Missing(id), _) => tracing::warn!(%id, "todo not found after update"),
            (_, Some(cause)) => tracing::error!(error = %format!("{cause:#}"), "{err}"),
            (_, None) => tracing::error!("{err}"),
        }
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: err.to_string() }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self { status: rejection.status(), message: rejection.body_text() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(ErrorBody { error: self.message })).into_response()
    }
}

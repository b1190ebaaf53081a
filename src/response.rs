use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    error::{AppError, ErrorCode},
    todos::FieldError,
};

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// Successful JSON response: the body is `data` itself, sent with `status`.
#[derive(Debug)]
pub struct JsonApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub data: T,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn with_status(status: StatusCode, data: T) -> ApiResult<T> {
        Ok(Self { status, data })
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.data)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorPayload {
                code,
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        Self {
            error: ErrorPayload {
                code: err.code(),
                message: err.client_message().to_string(),
                details: err.details().map(<[FieldError]>::to_vec),
            },
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log_app_error(&self);
        ErrorBody::from_error(&self).into_response_with(self.status())
    }
}

pub fn log_app_error(err: &AppError) {
    match err {
        AppError::Internal { message, source } => match source {
            Some(source) => tracing::error!(error = %source, "{message}"),
            None => tracing::error!("{message}"),
        },
        other => tracing::debug!(code = ?other.code(), "{}", other.message()),
    }
}

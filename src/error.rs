use std::error::Error as StdError;

use axum::http::StatusCode;
use serde::Serialize;

use crate::todos::FieldError;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    ValidationError,
    NotFound,
    InternalError,
}

#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    Validation {
        message: String,
        details: Vec<FieldError>,
    },
    NotFound(String),
    Internal {
        message: String,
        source: Option<BoxError>,
    },
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Server-side message. For internal errors this is never sent to clients.
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(message)
            | Self::Validation { message, .. }
            | Self::NotFound(message)
            | Self::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn client_message(&self) -> &str {
        match self {
            Self::Internal { .. } => INTERNAL_ERROR_MESSAGE,
            other => other.message(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Internal { .. } => ErrorCode::InternalError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            Self::Validation { details, .. } => Some(details),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal {
                message,
                source: Some(source),
            } => write!(f, "{message}: {source}"),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Internal {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<crate::db::store::StoreError> for AppError {
    fn from(err: crate::db::store::StoreError) -> Self {
        AppError::internal_with_source("todo store failure", err)
    }
}

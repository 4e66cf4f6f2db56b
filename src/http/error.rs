//! HTTP-facing error types and mapping to response status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::error::PollboxError;

/// API error types with detailed context.
///
/// `QuestionNotFound` covers both a missing question and an embargoed one;
/// the two are deliberately indistinguishable to callers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Question not found: {id}")]
    QuestionNotFound { id: String },

    #[error("No choice selected")]
    NoChoiceSelected,

    #[error("Choice {choice_id} does not belong to question {question_id}")]
    InvalidChoice {
        question_id: String,
        choice_id: String,
    },

    #[error("Validation failed for field '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl ApiError {
    /// Get the HTTP status code for this error type.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::QuestionNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::NoChoiceSelected
            | ApiError::InvalidChoice { .. }
            | ApiError::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::StorageError { .. } | ApiError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type name for the response payload.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::QuestionNotFound { .. } => "QuestionNotFound",
            ApiError::NoChoiceSelected => "NoChoiceSelected",
            ApiError::InvalidChoice { .. } => "InvalidChoice",
            ApiError::ValidationFailed { .. } => "ValidationFailed",
            ApiError::StorageError { .. } => "StorageError",
            ApiError::InternalError { .. } => "InternalError",
        }
    }
}

impl From<PollboxError> for ApiError {
    fn from(err: PollboxError) -> Self {
        match err {
            PollboxError::QuestionNotFound(id) => ApiError::QuestionNotFound { id },
            PollboxError::ChoiceNotFound(id) => ApiError::ValidationFailed {
                field: "choice_id".to_string(),
                message: format!("unknown choice: {}", id),
            },
            PollboxError::InvalidChoice {
                question_id,
                choice_id,
            } => ApiError::InvalidChoice {
                question_id,
                choice_id,
            },
            PollboxError::NoChoiceSelected => ApiError::NoChoiceSelected,
            PollboxError::Validation { field, message } => {
                ApiError::ValidationFailed { field, message }
            }
            PollboxError::NotInitialized | PollboxError::AlreadyInitialized => {
                ApiError::StorageError {
                    message: err.to_string(),
                }
            }
            PollboxError::Storage(message) => ApiError::StorageError { message },
            PollboxError::Io(e) => ApiError::InternalError {
                message: format!("IO error: {}", e),
            },
            PollboxError::Json(e) => ApiError::InternalError {
                message: format!("JSON error: {}", e),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error_type": self.error_type(),
            "message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}

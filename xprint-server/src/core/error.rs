use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::printing::{DispatchError, PrintServiceError};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<PrintServiceError> for ServerError {
    fn from(err: PrintServiceError) -> Self {
        match err {
            PrintServiceError::Dispatch(e) => Self::Dispatch(e),
            PrintServiceError::Task(e) => Self::Internal(e.into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        // Every print failure is a server-side failure; the classification
        // in `error` tells clients which stage gave up.
        let (status, error_type, message) = match &self {
            ServerError::Dispatch(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.kind(),
                err.to_string(),
            ),
            ServerError::Internal(err) => {
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, ServerError>;

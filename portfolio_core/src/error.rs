//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use crate::models::contact::{ContactResponse, INVALID_PAYLOAD, MISSING_FIELDS, SAVE_FAILED};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Fixture(msg) => {
                tracing::error!("Fixture error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            // Only reachable from server-side data (fixtures), never from request bodies.
            AppError::JsonError(err) => {
                tracing::error!("JSON error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

/// Client-visible failures of `POST /api/contact`. Each variant renders the
/// contact envelope `{"success": false, "message": ...}`.
#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),

    #[error("Could not save message: {0}")]
    Persistence(#[source] AppError),
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ContactError::MissingFields => (StatusCode::BAD_REQUEST, MISSING_FIELDS),
            ContactError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, INVALID_PAYLOAD),
            ContactError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED),
        };

        (status, Json(ContactResponse::failure(message))).into_response()
    }
}

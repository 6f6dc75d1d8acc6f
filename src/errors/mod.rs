//! Error handling module for the HR directory backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CREATE_FAILED: &str = "CREATE_FAILED";
    pub const UPDATE_FAILED: &str = "UPDATE_FAILED";
    pub const DELETE_FAILED: &str = "DELETE_FAILED";
    pub const TRANSPORT_FAILURE: &str = "TRANSPORT_FAILURE";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// No record matches the requested id
    #[error("{0}")]
    NotFound(String),
    /// Caller supplied an invalid payload
    #[error("{0}")]
    Validation(String),
    /// No record of a create batch succeeded
    #[error("{message}")]
    CreateFailed {
        message: String,
        details: Vec<String>,
    },
    /// No record of an update batch succeeded
    #[error("{message}")]
    UpdateFailed {
        message: String,
        details: Vec<String>,
    },
    /// At least one id could not be deleted
    #[error("{message}")]
    DeleteFailed {
        message: String,
        details: Vec<String>,
    },
    /// Record store unreachable or answered with something unusable
    #[error("{0}")]
    Transport(String),
    /// Invalid configuration
    #[error("{0}")]
    Config(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::CreateFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::UpdateFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::DeleteFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::CreateFailed { .. } => codes::CREATE_FAILED,
            AppError::UpdateFailed { .. } => codes::UPDATE_FAILED,
            AppError::DeleteFailed { .. } => codes::DELETE_FAILED,
            AppError::Transport(_) => codes::TRANSPORT_FAILURE,
            AppError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Per-record failure messages collected from a batch write.
    pub fn details(&self) -> &[String] {
        match self {
            AppError::CreateFailed { details, .. }
            | AppError::UpdateFailed { details, .. }
            | AppError::DeleteFailed { details, .. } => details,
            _ => &[],
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Record store transport error: {:?}", err);
        AppError::Transport(format!("Record store unreachable: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Transport(format!("Malformed record store response: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let details = match error.details() {
            [] => None,
            details => Some(details.to_vec()),
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.to_string(),
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

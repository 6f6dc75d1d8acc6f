//! REST API module.
//!
//! Contains all API routes and handlers consumed by the HR front-end.

mod departments;
mod employees;

pub use departments::*;
pub use employees::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Envelope, Notice};

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    /// Messages for the front-end to show, e.g. a list that failed to load
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notice>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(envelope: Envelope<T>) -> Self {
        Self {
            success: true,
            data: envelope.data,
            notifications: envelope.notices,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(envelope: Envelope<T>) -> ApiResult<T> {
    Ok(ApiResponse::new(envelope))
}

/// Coerce a path id to the store's numeric identity. A non-numeric id can never exist.
pub fn parse_id(raw: &str, label: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(format!("{} {} not found", label, raw)))
}

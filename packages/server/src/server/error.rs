//! API error handling.
//!
//! Every error body carries a `message`; validation failures add a
//! field-keyed `errors` map.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domains::scrape_jobs::ValidationErrors;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Per-field messages (validation failures only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// API error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Job not found")]
    NotFound,

    #[error("{0}")]
    Validation(ValidationErrors),

    /// Body was not usable JSON
    #[error("{0}")]
    Json(#[from] JsonRejection),

    /// Store or scheduling failure; details stay in the logs
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Json(rejection) => rejection.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound => ApiErrorResponse {
                message: "Job not found".to_string(),
                errors: None,
            },
            ApiError::Validation(errors) => ApiErrorResponse {
                message: errors.message(),
                errors: Some(errors.errors().clone()),
            },
            ApiError::Json(rejection) => ApiErrorResponse {
                message: rejection.body_text(),
                errors: None,
            },
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                ApiErrorResponse {
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

//! Error handling - RFC 7807 compliant responses.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::ApiError;
use blog_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest {
        entity_name: &'static str,
        error_key: &'static str,
        detail: String,
    },
    Internal(String),
}

impl AppError {
    /// Map a storage failure for `entity_name` onto an HTTP error.
    pub fn from_api(entity_name: &'static str, err: ApiError) -> Self {
        match err {
            ApiError::Status { status: 404, message } => AppError::NotFound(message),
            ApiError::Status { status: 400, message } | ApiError::Invalid(message) => {
                AppError::BadRequest {
                    entity_name,
                    error_key: error_key(&message),
                    detail: message,
                }
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Short key of a bad request, matching the backend's translation keys.
fn error_key(message: &str) -> &'static str {
    if message.contains("cannot already have an ID") {
        "idexists"
    } else if message.contains("id") {
        "idnull"
    } else {
        "badrequest"
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest { detail, .. } => write!(f, "Bad request: {}", detail),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest {
                entity_name,
                error_key,
                detail,
            } => ErrorResponse::bad_request(detail).with_entity(*entity_name, *error_key),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type("application/problem+json")
            .json(error)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

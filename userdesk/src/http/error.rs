//! HTTP mapping for service failures.
//!
//! Every error leaves the server as `{"error": "...", "details": [...]}`, where
//! `details` only appears for validation failures. Store failures are logged and
//! answered with a generic message.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::{
    service::UserServiceError,
    validation::{FieldError, ValidationErrors},
};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

const STORE_FAILURE: &str = "store operation failed";

/// JSON error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: errors.to_string(),
            details: Some(errors.0),
        }
    }

    /// Maps a failed list. Store failures answer 500.
    pub fn on_read(err: UserServiceError) -> Self {
        Self::from_service(err, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Maps a failed create, update or delete. Store failures answer 400.
    pub fn on_write(err: UserServiceError) -> Self {
        Self::from_service(err, StatusCode::BAD_REQUEST)
    }

    fn from_service(err: UserServiceError, store_status: StatusCode) -> Self {
        match err {
            UserServiceError::Validation(errors) => Self::validation(errors),
            err @ UserServiceError::InvalidId(_) => Self::bad_request(err.to_string()),
            err @ UserServiceError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            UserServiceError::Store(source) => {
                error!(error = %source, status = store_status.as_u16(), "store operation failed");
                Self::new(store_status, STORE_FAILURE)
            }
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
            details: self.details.clone(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

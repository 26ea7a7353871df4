//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{StatsError, UnknownColumn};

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body rejected by the JSON extractor
    #[error("Validation error: {}", .0.body_text())]
    Validation(#[from] JsonRejection),

    /// Column outside the allow-list
    #[error("{0}")]
    NotFound(#[from] UnknownColumn),

    /// Statistic could not be computed over the loaded data
    #[error("Error calculating statistics: {0}")]
    Statistics(#[from] StatsError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
///
/// `error` is a plain message so clients can show it as-is.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub request_id: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            // 400 for bad syntax, 422 for a wrong shape, 415 for a wrong content type
            ApiError::Validation(rejection) => (rejection.status(), "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "COLUMN_NOT_FOUND"),
            ApiError::Statistics(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STATISTICS_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = UnknownColumn("Foo".to_string()).into();
        assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Column 'Foo' not found or not allowed");

        let err: ApiError = StatsError::Empty("Age".to_string()).into();
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Error calculating statistics: column 'Age' has no values"
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

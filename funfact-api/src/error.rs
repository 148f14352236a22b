//! Error Types for the Fun Fact API
//!
//! - [`ErrorCode`] categorizes failures and picks the HTTP status
//! - [`ApiError`] is returned by every handler and renders as
//!   `{"detail": "..."}`
//!
//! Domain errors are logged in full when converted and reach the client
//! only as a sanitized message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use funfact_core::{FunFactError, LlmError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No fact for the requested day (yet)
    FactNotFound,

    /// Request contains invalid input data
    InvalidInput,

    /// Unexpected server-side failure
    InternalError,

    /// Fact store or lock backend failed
    StorageFailure,

    /// Text generation backend failed
    GenerationFailure,

    /// Text generation backend is throttling us
    UpstreamRateLimited,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::FactNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::UpstreamRateLimited => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError
            | ErrorCode::StorageFailure
            | ErrorCode::GenerationFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::FactNotFound => "Fun fact not found",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageFailure => "Fun fact storage is unavailable",
            ErrorCode::GenerationFailure => "Fun fact generation failed",
            ErrorCode::UpstreamRateLimited => "Fun fact generation is rate limited, try again later",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error for API operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Category; decides the status code and is logged, not serialized
    pub code: ErrorCode,

    /// Human-readable message sent to the client
    pub detail: String,
}

/// Wire shape of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    /// Create an error with the code's default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    /// The 404 returned while today's fact does not exist.
    pub fn fact_not_found() -> Self {
        Self::from_code(ErrorCode::FactNotFound)
    }

    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, detail)
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, detail)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.detail)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            detail: self.detail,
        };
        (status, Json(body)).into_response()
    }
}

impl From<FunFactError> for ApiError {
    fn from(err: FunFactError) -> Self {
        let code = match &err {
            FunFactError::Storage(_) => ErrorCode::StorageFailure,
            FunFactError::Llm(LlmError::RateLimited { .. }) => ErrorCode::UpstreamRateLimited,
            FunFactError::Llm(_) => ErrorCode::GenerationFailure,
            FunFactError::Config(_) => ErrorCode::InternalError,
        };
        tracing::error!(error = %err, code = %code, "Request failed");
        Self::from_code(code)
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use funfact_core::StorageError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::FactNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::StorageFailure.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::GenerationFailure.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::UpstreamRateLimited.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_domain_errors_are_sanitized() {
        let err: ApiError =
            FunFactError::from(StorageError::unavailable("get", "redis://admin:pw@db")).into();
        assert_eq!(err.code, ErrorCode::StorageFailure);
        assert!(!err.detail.contains("pw"));

        let err: ApiError = FunFactError::from(LlmError::RateLimited {
            provider: "mistral".to_string(),
            retry_after_ms: 100,
        })
        .into();
        assert_eq!(err.code, ErrorCode::UpstreamRateLimited);

        let err: ApiError = FunFactError::from(LlmError::ProviderNotConfigured).into();
        assert_eq!(err.code, ErrorCode::GenerationFailure);
    }

    #[test]
    fn test_body_has_only_detail() -> Result<(), String> {
        let body = ErrorBody {
            detail: ApiError::fact_not_found().detail,
        };
        let json = serde_json::to_value(&body).map_err(|e| e.to_string())?;
        assert_eq!(json, serde_json::json!({"detail": "Fun fact not found"}));
        Ok(())
    }
}

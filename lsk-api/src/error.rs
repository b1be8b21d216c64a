//! Transport-level error envelope.
//!
//! Wraps `lsk_core::ResolutionError` (plus request-shape errors the
//! engine never sees) into the `{code, message, details}` body Axum
//! handlers return.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lsk_core::ResolutionError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    InvalidPlaceholder,
    UnresolvedReference,
    AllocationFailed,
    AuditWriteFailed,
    Unauthorized,
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidArgument | ErrorCode::InvalidPlaceholder | ErrorCode::UnresolvedReference => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::AllocationFailed | ErrorCode::AuditWriteFailed | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(%message, "internal error");
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ResolutionError> for ApiError {
    fn from(err: ResolutionError) -> Self {
        let code = match &err {
            ResolutionError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            ResolutionError::InvalidPlaceholder(_) => ErrorCode::InvalidPlaceholder,
            ResolutionError::UnresolvedReference(_) => ErrorCode::UnresolvedReference,
            ResolutionError::AllocationFailed(_) => ErrorCode::AllocationFailed,
            ResolutionError::AuditWriteFailed(_) => ErrorCode::AuditWriteFailed,
            ResolutionError::Internal(_) => ErrorCode::InternalError,
        };

        if !err.is_caller_error() {
            tracing::error!(error = %err, "resolution failed");
        }

        Self::new(code, err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        tracing::error!(error = %err, "connection pool error");
        Self::new(ErrorCode::InternalError, "database connection pool error")
    }
}

impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        tracing::error!(error = %err, "database error");
        Self::new(ErrorCode::InternalError, "database operation failed")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

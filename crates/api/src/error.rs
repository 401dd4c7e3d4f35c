//! JSON error responses.
//!
//! Handlers return `ApiResult<T>`; every repository and domain error converts
//! into `ApiError` through `AppError`, and the response body is always
//! `{"error": code, "message": text}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iltizam_core::auth::PasswordError;
use iltizam_core::commitment::NumberingError;
use iltizam_core::ledger::LedgerError;
use iltizam_db::repositories::{CommitmentError, DirectoryError, PaymentError};
use iltizam_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Shorthand for a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }

    /// Shorthand for a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// Shorthand for an authentication error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// Shorthand for an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self(AppError::Internal(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.0.message().to_string()
        };

        let body = json!({
            "error": self.0.error_code().to_ascii_lowercase(),
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<NumberingError> for ApiError {
    fn from(err: NumberingError) -> Self {
        Self::validation(err.to_string())
    }
}

macro_rules! via_app_error {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self(err.into())
                }
            }
        )+
    };
}

via_app_error!(
    CommitmentError,
    PaymentError,
    DirectoryError,
    LedgerError,
    PasswordError,
);

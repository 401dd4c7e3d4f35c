//! Errors shared by the master directory repositories.

use iltizam_core::auth::PasswordError;
use iltizam_shared::AppError;
use sea_orm::{DbErr, SqlErr};

/// Error types for company, user, currency and registration operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Record not found.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Lookup key.
        key: String,
    },

    /// A unique key is already taken.
    #[error("{entity} '{key}' already exists")]
    AlreadyExists {
        /// Kind of record.
        entity: &'static str,
        /// Conflicting key.
        key: String,
    },

    /// Other records still reference this one.
    #[error("{0}")]
    InUse(String),

    /// Input refers to something that does not exist or is malformed.
    #[error("{0}")]
    Invalid(String),

    /// The record is protected from this operation.
    #[error("{0}")]
    Protected(String),

    /// Password policy or hashing failure.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DirectoryError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Maps a unique violation on insert/update to `AlreadyExists`.
    pub(crate) fn on_unique(entity: &'static str, key: impl ToString) -> impl FnOnce(DbErr) -> Self {
        move |err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::AlreadyExists {
                entity,
                key: key.to_string(),
            },
            _ => Self::Database(err),
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            DirectoryError::AlreadyExists { .. } | DirectoryError::InUse(_) => {
                Self::Conflict(err.to_string())
            }
            DirectoryError::Invalid(_) => Self::Validation(err.to_string()),
            DirectoryError::Protected(_) => Self::BusinessRule(err.to_string()),
            DirectoryError::Password(e) => e.into(),
            DirectoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

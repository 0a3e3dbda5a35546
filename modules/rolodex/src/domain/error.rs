use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Domain error taxonomy. Handlers map these to problem+json responses;
/// nothing below this layer speaks HTTP.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<DbErr> for DomainError {
    fn from(err: DbErr) -> Self {
        // A unique-index hit is contention on user data, not an internal
        // fault; it includes the exhausted-retry path of tag find-or-create.
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            return Self::Conflict {
                message: err.to_string(),
            };
        }
        match err {
            DbErr::Conn(e) => Self::Unavailable {
                message: e.to_string(),
            },
            DbErr::ConnectionAcquire(e) => Self::Unavailable {
                message: e.to_string(),
            },
            other => Self::Database {
                message: other.to_string(),
            },
        }
    }
}

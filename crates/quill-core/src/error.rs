//! Domain-level error types.

use thiserror::Error;

use crate::ports::AuthError;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(AuthError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity_type: &'static str, id: i64) -> Self {
        Self::NotFound { entity_type, id }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(msg) | AuthError::TokenCreation(msg) => Self::Internal(msg),
            other => Self::Auth(other),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Referenced {} does not exist", .0.entity_type())]
    MissingReference(Reference),
}

/// The parent record a foreign key points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    User,
    Post,
}

impl Reference {
    pub fn entity_type(self) -> &'static str {
        match self {
            Reference::User => "User",
            Reference::Post => "Post",
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => Self::Conflict(msg),
            RepoError::NotFound => Self::Storage("row disappeared during the operation".into()),
            RepoError::MissingReference(reference) => {
                Self::Storage(format!("dangling {} reference", reference.entity_type()))
            }
            RepoError::Connection(msg) | RepoError::Query(msg) => Self::Storage(msg),
        }
    }
}

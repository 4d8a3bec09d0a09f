use sea_orm::{DbErr, SqlErr};

use quill_core::error::{Reference, RepoError};

/// Classify a SeaORM error, keeping unique violations distinct.
pub(crate) fn repo_error(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = err.sql_err() {
        return RepoError::Constraint(msg);
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

/// Like [`repo_error`], for inserts whose only foreign key points at `reference`.
///
/// Backends do not reliably name the violated column, so the caller says
/// which parent is meant.
pub(crate) fn insert_error(reference: Reference) -> impl Fn(DbErr) -> RepoError {
    move |err| match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => RepoError::MissingReference(reference),
        _ => repo_error(err),
    }
}

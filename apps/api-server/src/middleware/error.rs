//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode};
use quill_core::DomainError;
use quill_core::ports::AuthError;
use quill_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(AuthError),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(err) => write!(f, "Unauthorized: {}", err),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn body(&self) -> ErrorResponse {
        match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(err) => match err {
                AuthError::InvalidCredentials => {
                    ErrorResponse::unauthorized("Invalid username or password.")
                }
                AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                    .with_detail("Your authentication token has expired. Please login again."),
                AuthError::InvalidToken(msg) => {
                    ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
                }
                AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                    .with_detail("Please provide a valid Bearer token in the Authorization header."),
                other => ErrorResponse::unauthorized(other.to_string()),
            },
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(_) => ErrorResponse::internal_error(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        HttpResponse::build(status).json(self.body())
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Auth(err) => AppError::Unauthorized(err),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Storage(msg) => AppError::Internal(format!("storage: {}", msg)),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        DomainError::from(err).into()
    }
}

/// `JsonConfig` error handler: malformed bodies become 400 problem responses.
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

/// `QueryConfig` error handler: malformed query strings become 400 problem responses.
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::validation("title is required"), 400),
            (DomainError::Auth(AuthError::MissingAuth), 401),
            (DomainError::Forbidden("not yours".into()), 403),
            (DomainError::not_found("Post", 9), 404),
            (DomainError::Conflict("taken".into()), 409),
            (DomainError::Storage("boom".into()), 500),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code().as_u16(), status);
        }
    }

    #[test]
    fn test_storage_detail_is_hidden() {
        let err = AppError::from(DomainError::Storage("password=hunter2".into()));
        assert!(err.body().detail.is_none());
    }

    #[test]
    fn test_hashing_failure_is_internal() {
        let err = AppError::from(AuthError::HashingError("bad salt".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_detail_names_entity() {
        let err = AppError::from(DomainError::not_found("Post", 4));
        assert_eq!(err.body().detail.as_deref(), Some("Post with id 4 not found"));
    }
}

//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use postboard_types::error::{AuthError, ContactError, PostError, RepositoryError, UserError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Post(PostError),
    Contact(ContactError),
    User(UserError),
    /// Authentication failure before any service was reached.
    Unauthorized(String),
    Validation(String),
    Internal(String),
}

impl From<PostError> for AppError {
    fn from(e: PostError) -> Self {
        AppError::Post(e)
    }
}

impl From<ContactError> for AppError {
    fn from(e: ContactError) -> Self {
        AppError::Contact(e)
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        AppError::User(e)
    }
}

fn auth_status(e: &AuthError) -> (StatusCode, &'static str) {
    match e {
        AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        AuthError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        AuthError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        AuthError::Lookup(e) => storage_status(e),
    }
}

fn storage_status(e: &RepositoryError) -> (StatusCode, &'static str) {
    match e {
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        RepositoryError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
        RepositoryError::Connection | RepositoryError::Query(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
        }
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Post(PostError::NotFound) => (StatusCode::NOT_FOUND, "POST_NOT_FOUND"),
            AppError::Post(PostError::InvalidInput(_)) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Post(PostError::Auth(e)) => auth_status(e),
            AppError::Post(PostError::Storage(e)) => storage_status(e),
            AppError::Contact(ContactError::NotFound) => (StatusCode::NOT_FOUND, "CONTACT_NOT_FOUND"),
            AppError::Contact(ContactError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Contact(ContactError::Auth(e)) => auth_status(e),
            AppError::Contact(ContactError::Storage(e)) => storage_status(e),
            AppError::User(UserError::NotFound) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            AppError::User(UserError::UsernameConflict(_)) => (StatusCode::CONFLICT, "USERNAME_CONFLICT"),
            AppError::User(UserError::InvalidInput(_)) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::User(UserError::Storage(e)) => storage_status(e),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Post(e) => e.to_string(),
            AppError::Contact(e) => e.to_string(),
            AppError::User(e) => e.to_string(),
            AppError::Unauthorized(msg) | AppError::Validation(msg) | AppError::Internal(msg) => {
                msg.clone()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        (status, ApiResponse::failure(code, message).into_json()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_distinct_statuses() {
        let cases = [
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (AuthError::NotFound, StatusCode::NOT_FOUND),
            (AuthError::Lookup(RepositoryError::Connection), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (auth, expected) in cases {
            let err = AppError::from(PostError::Auth(auth));
            assert_eq!(err.status_and_code().0, expected);
        }
    }

    #[test]
    fn test_storage_errors_keep_their_meaning() {
        let err = AppError::from(PostError::Storage(RepositoryError::Conflict("dup".into())));
        assert_eq!(err.status_and_code(), (StatusCode::CONFLICT, "CONFLICT"));

        let err = AppError::from(UserError::UsernameConflict("ada".into()));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
